use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::{parse_url, with_timeout, Source};
use crate::error::SourceError;
use crate::{parser, SampleSet};

/// Scrapes a `/metrics` endpoint serving the Prometheus text exposition format
pub struct ExporterScrape {
    /// The url to be scraped.
    ///
    /// e.g. http://10.0.15.15:9025/metrics
    url: Url,
    timeout: Option<Duration>,
}

impl ExporterScrape {
    pub fn new(url: &str) -> Result<Self, SourceError> {
        Ok(ExporterScrape {
            url: parse_url(url)?,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Make a request to the exporter and return the response body
    async fn scrape(&self) -> Result<String, SourceError> {
        let mut response = surf::get(self.url.as_str())
            .await
            .map_err(SourceError::Transport)?;
        if response.status() != surf::StatusCode::Ok {
            return Err(SourceError::UnexpectedStatus(response.status()));
        }
        response.body_string().await.map_err(SourceError::Transport)
    }
}

#[async_trait(?Send)]
impl Source for ExporterScrape {
    async fn fetch(&self) -> Result<SampleSet, SourceError> {
        tracing::debug!(url = %self.url, "scraping exporter");
        let input = with_timeout(self.timeout, self.scrape()).await?;
        let series = parser::parse(&input)?;
        Ok(series.into_iter().collect())
    }
}
