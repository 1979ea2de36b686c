//! Serializers for the supported downstream record formats.

mod graphite;
mod influx;
mod json;

pub use graphite::GraphiteEncoder;
pub use influx::InfluxEncoder;
pub use json::JsonEncoder;

use chrono::prelude::*;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::debug::DEBUG;
use crate::{SampleSet, Series, SeriesFilter};

/// Serializes a sample set into one text payload.
///
/// Series are visited in sample set order, and only those whose base name
/// passes the filter are encoded. Malformed series are dropped rather than
/// failing the batch. An empty payload is returned when nothing is encoded.
pub trait Encoder {
    /// Encodes with an explicit unix timestamp (seconds) for every record
    fn encode_at(
        &self,
        samples: &SampleSet,
        filter: &SeriesFilter,
        name_prefix: &str,
        timestamp: i64,
    ) -> String;

    /// Encodes with the current time shared by every record in the batch
    fn encode(&self, samples: &SampleSet, filter: &SeriesFilter, name_prefix: &str) -> String {
        let timestamp = Utc::now().timestamp();
        self.encode_at(samples, filter, name_prefix, timestamp)
    }
}

/// Iterates the series admitted by `filter`, paired with their base name
pub(crate) fn admitted<'a>(
    samples: &'a SampleSet,
    filter: &'a SeriesFilter,
) -> impl Iterator<Item = (&'a str, &'a Series)> + 'a {
    samples.iter().filter_map(move |series| {
        let name = series.name()?;
        if filter.allows(name) {
            Some((name, series))
        } else {
            DEBUG.series_filtered();
            None
        }
    })
}

/// Formats a value as the shortest decimal string that round-trips,
/// never in scientific notation.
pub(crate) fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// The output formats which can be selected by name
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Graphite,
    Influx,

    /// Any other name. Encodes to an empty payload instead of failing,
    /// so existing check definitions with a typo keep "succeeding".
    Unrecognized(String),
}

impl OutputFormat {
    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Graphite => "graphite",
            OutputFormat::Influx => "influx",
            OutputFormat::Unrecognized(name) => name,
        }
    }

    /// The encoder for this format, or `None` if the format is unrecognized
    pub fn encoder(&self) -> Option<&'static dyn Encoder> {
        match self {
            OutputFormat::Json => Some(&JsonEncoder),
            OutputFormat::Graphite => Some(&GraphiteEncoder),
            OutputFormat::Influx => Some(&InfluxEncoder),
            OutputFormat::Unrecognized(_) => None,
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Influx
    }
}

impl FromStr for OutputFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "json" => OutputFormat::Json,
            "graphite" => OutputFormat::Graphite,
            "influx" => OutputFormat::Influx,
            _ => OutputFormat::Unrecognized(s.to_string()),
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
