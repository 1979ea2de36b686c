//! Sources which collect a sample set from a Prometheus server or exporter.

mod exporter;
mod prometheus_api;

pub use exporter::ExporterScrape;
pub use prometheus_api::PrometheusQuery;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::error::SourceError;
use crate::SampleSet;

/// A Source must be implemented by each strategy that can produce a sample set.
///
/// Each call performs exactly one request; there are no retries.
#[async_trait(?Send)]
pub trait Source {
    async fn fetch(&self) -> Result<SampleSet, SourceError>;
}

pub(crate) fn parse_url(url: &str) -> Result<Url, SourceError> {
    Url::parse(url).map_err(|source| SourceError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Run a request, failing with `SourceError::Timeout` if it takes longer than `timeout`
pub(crate) async fn with_timeout<T, F>(timeout: Option<Duration>, request: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match timeout {
        Some(timeout) => async_std::future::timeout(timeout, request)
            .await
            .map_err(|_| SourceError::Timeout)?,
        None => request.await,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_std::net::TcpListener;
    use async_std::prelude::*;
    use async_std::task::{self, JoinHandle};
    use std::time::Duration;

    /// Serves a single HTTP response, returning the base url and a handle
    /// which resolves to the request line that was received.
    pub async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: String,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = task::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                content_type,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
            let request = String::from_utf8_lossy(&request);
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}", addr), handle)
    }

    /// Accepts a connection and never answers it
    pub async fn serve_nothing() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        task::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            task::sleep(Duration::from_secs(30)).await;
        });
        format!("http://{}", addr)
    }
}
