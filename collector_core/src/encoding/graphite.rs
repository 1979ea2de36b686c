use super::{admitted, format_value, Encoder};
use crate::debug::DEBUG;
use crate::{SampleSet, SeriesFilter};

/// Encodes series as Graphite plaintext: `{prefix}{name} {value} {timestamp}\n`.
///
/// Graphite has no tags here, so every label except the name is dropped.
pub struct GraphiteEncoder;

impl Encoder for GraphiteEncoder {
    fn encode_at(
        &self,
        samples: &SampleSet,
        filter: &SeriesFilter,
        name_prefix: &str,
        timestamp: i64,
    ) -> String {
        let mut output = String::new();
        for (name, series) in admitted(samples, filter) {
            output.push_str(&format!(
                "{}{} {} {}\n",
                name_prefix,
                name,
                format_value(series.value),
                timestamp
            ));
            DEBUG.records_emitted(1);
        }
        output
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{series, FilterPolicy};

    #[test]
    fn encodes_name_value_and_timestamp() {
        let samples: SampleSet = vec![series(&[("__name__", "up"), ("job", "node")], 1.0)]
            .into_iter()
            .collect();
        let filter = SeriesFilter::default();
        assert_eq!(
            GraphiteEncoder.encode_at(&samples, &filter, "", 1395066363),
            "up 1 1395066363\n"
        );
        assert_eq!(
            GraphiteEncoder.encode_at(&samples, &filter, "myapp.", 1395066363),
            "myapp.up 1 1395066363\n"
        );
    }

    #[test]
    fn preserves_order_and_filters_by_base_name() {
        let samples: SampleSet = vec![
            series(&[("__name__", "c")], 3.5),
            series(&[("__name__", "a")], 1.0),
            series(&[("__name__", "go_threads")], 8.0),
            series(&[("__name__", "b")], 0.125),
        ]
        .into_iter()
        .collect();

        // The prefix never takes part in filtering
        let filter: SeriesFilter = FilterPolicy::from_config("", "go_,app.").into();
        assert_eq!(
            GraphiteEncoder.encode_at(&samples, &filter, "app.", 7),
            "app.c 3.5 7\napp.a 1 7\napp.b 0.125 7\n"
        );
    }

    #[test]
    fn stamps_the_current_time() {
        let samples: SampleSet = vec![series(&[("__name__", "up")], 1.0)].into_iter().collect();
        let before = chrono::Utc::now().timestamp();
        let output = GraphiteEncoder.encode(&samples, &SeriesFilter::default(), "");
        let after = chrono::Utc::now().timestamp();

        let timestamp: i64 = output.trim_end().rsplit(' ').next().unwrap().parse().unwrap();
        assert!(before <= timestamp && timestamp <= after);
    }
}
