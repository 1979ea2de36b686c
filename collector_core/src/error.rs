use thiserror::Error;

/// A line of exposition text which couldn't be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    /// The 1-based line number of the offending line
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, reason: impl Into<String>) -> Self {
        ParseError {
            line,
            reason: reason.into(),
        }
    }
}

/// Failures while fetching a sample set; all of them are fatal to a run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    // Surf's error doesn't impl std::error::Error, so it can't be a `#[source]`
    #[error("request failed: {0}")]
    Transport(surf::Error),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected HTTP response status: {0}")]
    UnexpectedStatus(surf::StatusCode),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("query failed ({error_type}): {error}")]
    Api { error_type: String, error: String },
    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),
    #[error("failed to parse exposition text")]
    Parse(#[from] ParseError),
}
