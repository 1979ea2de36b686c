use std::io::{self, Write};

use crate::debug::DEBUG;
use crate::encoding::OutputFormat;
use crate::filter::{FilterPolicy, SeriesFilter};
use crate::SampleSet;

/// Encodes a sample set into the configured output format
#[derive(Clone, Debug)]
pub struct Pipeline {
    format: OutputFormat,
    name_prefix: String,
    filter: SeriesFilter,
}

impl Pipeline {
    /// Creates a pipeline from comma separated include and exclude prefix lists
    pub fn new(format: OutputFormat, name_prefix: &str, include: &str, exclude: &str) -> Self {
        Pipeline {
            format,
            name_prefix: name_prefix.to_string(),
            filter: FilterPolicy::from_config(include, exclude).into(),
        }
    }

    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    pub fn filter(&self) -> &SeriesFilter {
        &self.filter
    }

    /// Encodes the samples, yielding an empty payload for an unrecognized format
    pub fn render(&self, samples: &SampleSet) -> String {
        let output = match self.format.encoder() {
            Some(encoder) => encoder.encode(samples, &self.filter, &self.name_prefix),
            None => {
                tracing::warn!(format = %self.format, "unrecognized output format, nothing will be written");
                String::new()
            }
        };
        DEBUG.publish();
        output
    }

    /// Encodes the samples and writes the payload as-is
    pub fn write_to<W: Write>(&self, samples: &SampleSet, mut out: W) -> io::Result<()> {
        let output = self.render(samples);
        out.write_all(output.as_bytes())?;
        out.flush()
    }
}
