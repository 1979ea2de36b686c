use super::{admitted, format_value, Encoder};
use crate::debug::DEBUG;
use crate::{SampleSet, SeriesFilter};

/// Encodes series as InfluxDB line protocol:
/// `{prefix}{name},tag=value,... value={value} {timestamp}\n`.
///
/// Labels are written unescaped, so two checks keep a bad label from
/// breaking the line structure:
///  - a tag is omitted if it contains a newline or doesn't have exactly one `=`
///  - a line is omitted if it doesn't split into exactly three space separated fields
pub struct InfluxEncoder;

impl Encoder for InfluxEncoder {
    fn encode_at(
        &self,
        samples: &SampleSet,
        filter: &SeriesFilter,
        name_prefix: &str,
        timestamp: i64,
    ) -> String {
        let mut output = String::new();
        for (name, series) in admitted(samples, filter) {
            let mut line = format!("{}{}", name_prefix, name);
            for (tag_name, tag_value) in series.tags() {
                let tag = format!(",{}={}", tag_name, tag_value);
                if !tag.contains('\n') && tag.matches('=').count() == 1 {
                    line.push_str(&tag);
                } else {
                    DEBUG.tag_malformed();
                    tracing::debug!(metric = name, tag = tag_name, "omitting malformed tag");
                }
            }

            // A prefix or label name may still carry a newline
            line.retain(|ch| ch != '\n');

            line.push_str(&format!(" value={} {}\n", format_value(series.value), timestamp));
            if line.split(' ').count() == 3 {
                output.push_str(&line);
                DEBUG.records_emitted(1);
            } else {
                DEBUG.record_malformed();
                tracing::debug!(metric = name, "omitting malformed line");
            }
        }
        output
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{series, FilterPolicy};

    const TS: i64 = 1395066363;

    fn encode(samples: Vec<crate::Series>, prefix: &str) -> String {
        let samples: SampleSet = samples.into_iter().collect();
        InfluxEncoder.encode_at(&samples, &SeriesFilter::default(), prefix, TS)
    }

    #[test]
    fn encodes_tags_after_the_name() {
        let output = encode(vec![series(&[("__name__", "up"), ("job", "node")], 1.0)], "");
        assert_eq!(output, "up,job=node value=1 1395066363\n");

        let output = encode(vec![series(&[("__name__", "up"), ("job", "node")], 1.0)], "myapp.");
        assert_eq!(output, "myapp.up,job=node value=1 1395066363\n");
    }

    #[test]
    fn encodes_untagged_series() {
        let output = encode(vec![series(&[("__name__", "go_goroutines")], 42.0)], "");
        assert_eq!(output, "go_goroutines value=42 1395066363\n");
    }

    #[test]
    fn tag_order_is_not_part_of_the_contract() {
        let output = encode(
            vec![series(&[("__name__", "up"), ("job", "node"), ("instance", "a:9100")], 1.0)],
            "",
        );
        let fields = output.split(' ').collect::<Vec<_>>();
        assert_eq!(fields.len(), 3);
        let mut tags = fields[0].split(',').collect::<Vec<_>>();
        assert_eq!(tags.remove(0), "up");
        tags.sort_unstable();
        assert_eq!(tags, vec!["instance=a:9100", "job=node"]);
    }

    #[test]
    fn omits_malformed_tags() {
        let output = encode(
            vec![series(
                &[("__name__", "up"), ("bad", "x=y\nz"), ("job", "node"), ("eq", "a=b")],
                1.0,
            )],
            "",
        );
        assert_eq!(output, "up,job=node value=1 1395066363\n");

        let output = encode(
            vec![series(&[("__name__", "up"), ("multi", "line\nvalue")], 0.5)],
            "",
        );
        assert_eq!(output, "up value=0.5 1395066363\n");
    }

    #[test]
    fn strips_newlines_from_the_name() {
        let output = encode(vec![series(&[("__name__", "up")], 1.0)], "my\napp.");
        assert_eq!(output, "myapp.up value=1 1395066363\n");
    }

    #[test]
    fn omits_lines_with_stray_spaces() {
        let output = encode(
            vec![
                series(&[("__name__", "a")], 1.0),
                series(&[("__name__", "b"), ("path", "C:\\Program Files")], 2.0),
                series(&[("__name__", "c")], 3.0),
            ],
            "",
        );
        assert_eq!(output, "a value=1 1395066363\nc value=3 1395066363\n");

        let output = encode(vec![series(&[("__name__", "up")], 1.0)], "my app.");
        assert_eq!(output, "");
    }

    #[test]
    fn filters_by_unprefixed_name() {
        let samples: SampleSet = vec![
            series(&[("__name__", "up"), ("job", "node")], 1.0),
            series(&[("__name__", "go_gc_duration"), ("quantile", "0.5")], 0.001),
        ]
        .into_iter()
        .collect();
        let filter: SeriesFilter = FilterPolicy::from_config("", "go_").into();
        assert_eq!(
            InfluxEncoder.encode_at(&samples, &filter, "go_", TS),
            "go_up,job=node value=1 1395066363\n"
        );
    }
}
