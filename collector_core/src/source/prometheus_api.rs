use async_trait::async_trait;
use chrono::prelude::*;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{parse_url, with_timeout, Source};
use crate::error::SourceError;
use crate::{Labels, SampleSet, Series};

/// The response envelope of the Prometheus HTTP api
#[derive(Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(rename = "errorType", default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct QueryData {
    #[serde(rename = "resultType")]
    result_type: String,
    result: serde_json::Value,
}

/// An element of an instant vector, e.g. `{"metric": {...}, "value": [1435781451.781, "1"]}`
#[derive(Deserialize)]
struct VectorSample {
    #[serde(default)]
    metric: Labels,
    value: (f64, String),
}

/// Evaluates an instant PromQL query, which must result in a vector
pub struct PrometheusQuery {
    url: Url,
    query: String,
    timeout: Option<Duration>,
}

impl PrometheusQuery {
    pub fn new(prom_url: &str, query: impl Into<String>) -> Result<Self, SourceError> {
        Ok(PrometheusQuery {
            url: parse_url(prom_url)?,
            query: query.into(),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_url(&self, time: DateTime<Utc>) -> Url {
        let mut url = self.url.clone();
        let path = format!("{}/api/v1/query", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut()
            .append_pair("query", &self.query)
            .append_pair("time", &time.timestamp().to_string());
        url
    }

    async fn query(&self) -> Result<ApiResponse, SourceError> {
        let request_url = self.request_url(Utc::now());
        let mut response = surf::get(request_url.as_str())
            .await
            .map_err(SourceError::Transport)?;
        let status = response.status();
        let body = response.body_string().await.map_err(SourceError::Transport)?;

        // Failed queries still have a json body explaining the failure
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(err) if status.is_success() => Err(err.into()),
            Err(_) => Err(SourceError::UnexpectedStatus(status)),
        }
    }
}

/// Converts a decoded api response into a sample set, if it holds a vector
fn into_sample_set(response: ApiResponse) -> Result<SampleSet, SourceError> {
    if response.status != "success" {
        return Err(SourceError::Api {
            error_type: response.error_type.unwrap_or_else(|| "unknown".into()),
            error: response.error.unwrap_or_default(),
        });
    }
    let data = response
        .data
        .ok_or_else(|| SourceError::UnexpectedResponseShape("missing data".into()))?;
    if data.result_type != "vector" {
        return Err(SourceError::UnexpectedResponseShape(format!(
            "expected a vector result, got {:?}",
            data.result_type
        )));
    }

    let vector: Vec<VectorSample> = serde_json::from_value(data.result)?;
    let mut series = Vec::with_capacity(vector.len());
    for sample in vector {
        let (_, value_str) = sample.value;
        let value = match value_str.as_str() {
            "+Inf" | "Inf" => f64::INFINITY,
            "-Inf" => f64::NEG_INFINITY,
            "NaN" => f64::NAN,
            _ => value_str.parse().map_err(|_| {
                SourceError::UnexpectedResponseShape(format!("invalid sample value {:?}", value_str))
            })?,
        };
        series.push(Series::new(sample.metric, value));
    }
    Ok(series.into_iter().collect())
}

#[async_trait(?Send)]
impl Source for PrometheusQuery {
    async fn fetch(&self) -> Result<SampleSet, SourceError> {
        tracing::debug!(url = %self.url, query = %self.query, "querying prometheus");
        let response = with_timeout(self.timeout, self.query()).await?;
        into_sample_set(response)
    }
}
