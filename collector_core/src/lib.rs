pub mod debug;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod source;

use indexmap::IndexMap; // hash table w/ fast iter preserving insertion order

pub use encoding::OutputFormat;
pub use filter::{FilterPolicy, SeriesFilter};
pub use pipeline::Pipeline;

use crate::debug::DEBUG;

/// The label which holds a series' metric name.
pub const NAME_LABEL: &str = "__name__";

/// Label names mapped to label values.
///
/// Iteration follows the order labels were discovered in, but that order is
/// not part of any output contract; consumers may only rely on the label set.
pub type Labels = IndexMap<String, String>;

/// A single observed metric instance
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub labels: Labels,
    pub value: f64,
}

impl Series {
    pub fn new(labels: Labels, value: f64) -> Self {
        Series { labels, value }
    }

    /// The metric's base name, if the series has a non-empty `__name__` label.
    pub fn name(&self) -> Option<&str> {
        self.labels
            .get(NAME_LABEL)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Iterate over every label except `__name__`
    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .filter(|(name, _)| name.as_str() != NAME_LABEL)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// An ordered snapshot of series captured at one instant.
///
/// Every series in a sample set has a non-empty `__name__` label;
/// series without one are dropped when the set is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSet {
    series: Vec<Series>,
}

impl SampleSet {
    pub fn new() -> Self {
        SampleSet::default()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }
}

impl std::iter::FromIterator<Series> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        let mut series = Vec::new();
        for item in iter {
            if item.name().is_none() {
                DEBUG.series_dropped();
                tracing::debug!(labels = ?item.labels, "dropping series without a metric name");
                continue;
            }
            series.push(item);
        }
        DEBUG.series_fetched(series.len());
        SampleSet { series }
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

#[cfg(test)]
pub(crate) fn series(labels: &[(&str, &str)], value: f64) -> Series {
    let labels = labels
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    Series::new(labels, value)
}
