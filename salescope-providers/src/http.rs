//! HTTP client abstraction and utilities

use crate::constants::DEFAULT_TIMEOUT_SECS;
use crate::error;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use salescope_core::Error;
use serde_json::Value;

/// HTTP client abstraction
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a POST request with a JSON body and decode the JSON reply
    ///
    /// A non-success status is returned as [`Error::Provider`] carrying the
    /// status code; transport failures are [`Error::Network`].
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<Value, Error>;
}

/// Default HTTP client implementation using reqwest
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(error::network_error)?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<Value, Error> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(error::network_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "provider returned an error status");
            return Err(error::provider_error(
                "http",
                format!("HTTP {}: {}", status, text),
                Some(status.as_u16()),
            ));
        }

        response.json().await.map_err(error::network_error)
    }
}

/// Headers for a JSON request
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
