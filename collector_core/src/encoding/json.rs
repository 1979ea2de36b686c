use serde::{Serialize, Serializer};

use super::{admitted, Encoder};
use crate::debug::DEBUG;
use crate::{SampleSet, SeriesFilter};

#[derive(Serialize)]
struct Tag<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct Metric<'a> {
    tags: Vec<Tag<'a>>,
    #[serde(serialize_with = "serialize_value")]
    value: f64,
}

/// Integral values are written without a fractional part, e.g. `1` not `1.0`
fn serialize_value<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Every integer below 2^53 is exactly representable as an f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Encodes series as a JSON array of `{"tags": [{"name", "value"}..], "value"}`.
///
/// Every label is a tag, `__name__` included. The name prefix is ignored
/// because no metric name is synthesized.
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode_at(
        &self,
        samples: &SampleSet,
        filter: &SeriesFilter,
        _name_prefix: &str,
        _timestamp: i64,
    ) -> String {
        let metrics = admitted(samples, filter)
            .map(|(_, series)| Metric {
                tags: series
                    .labels
                    .iter()
                    .map(|(name, value)| Tag { name, value })
                    .collect(),
                value: series.value,
            })
            .collect::<Vec<_>>();
        if metrics.is_empty() {
            return String::new();
        }

        match serde_json::to_string(&metrics) {
            Ok(output) => {
                DEBUG.records_emitted(metrics.len());
                output
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize metrics as json");
                String::new()
            }
        }
    }
}
