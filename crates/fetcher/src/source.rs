//! Upstream breeds API client
//!
//! Fetches the breed list from the public dog API and reduces the
//! envelope shapes it is known to answer with to a flat record list.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::FetchError;
use dog_breeds_common::config::SourceConfig;

/// Source seam for the breed list
#[async_trait]
pub trait BreedSource: Send + Sync {
    async fn fetch_breeds(&self) -> Result<Vec<Value>, FetchError>;
}

/// Client for the external breeds API
pub struct BreedApiClient {
    http: Client,
    url: String,
}

impl BreedApiClient {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self {
            http,
            url: config.breeds_url.clone(),
        })
    }

    /// Fetch the current breed list
    ///
    /// Network errors, timeouts, and non-2xx answers are hard failures.
    /// The scheduler owns the retry policy, not this client.
    pub async fn fetch_breeds(&self) -> Result<Vec<Value>, FetchError> {
        info!(url = %self.url, "Fetching dog breeds");

        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let records = normalize_envelope(payload)?;

        debug!(count = records.len(), "Breed records received");
        Ok(records)
    }
}

#[async_trait]
impl BreedSource for BreedApiClient {
    async fn fetch_breeds(&self) -> Result<Vec<Value>, FetchError> {
        BreedApiClient::fetch_breeds(self).await
    }
}

/// Reduce the known envelope shapes to a record list
///
/// `{"data": [...]}` unwraps the array, a bare array passes through,
/// and any other payload counts as a single record. A `data` key that
/// holds a non-array is rejected.
pub fn normalize_envelope(payload: Value) -> Result<Vec<Value>, FetchError> {
    match payload {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(FetchError::Payload(format!(
                "data key holds a non-array value: {}",
                other
            ))),
            None => Ok(vec![Value::Object(map)]),
        },
        Value::Array(records) => Ok(records),
        single => Ok(vec![single]),
    }
}
