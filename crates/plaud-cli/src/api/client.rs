//! HTTP API client for the Plaud cloud
//!
//! Every call to the API host carries `Authorization: Bearer <token>`.
//! Presigned download links point at a storage host and are fetched without it.

use crate::api::{endpoints, types::*, PlaudApi};
use crate::config::Config;
use crate::error::{CliError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for API requests in seconds.
/// Can be overridden via PLAUD_API_TIMEOUT_SECS environment variable.
/// Set to 5 minutes to accommodate large audio downloads.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 300;

/// Longest error body carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// API client for the Plaud cloud
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(region: &Region, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CliError::config("Bearer token is empty"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("plaud-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: region.base_url().to_string(),
            token,
        })
    }

    /// Create from a resolved configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.bearer_token.as_deref().ok_or_else(|| {
            CliError::config("No bearer token set. Export PLAUD_BEARER_TOKEN or pass --token")
        })?;

        Self::new(&config.region, token, config.timeout)
    }

    /// Check whether the token is accepted by the API
    pub async fn check_credentials(&self) -> Result<bool> {
        let url = endpoints::device_list_url(&self.base_url);

        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;
        debug!(url = %url, status = %response.status(), "Credential check");

        Ok(response.status().is_success())
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send an authenticated request and decode the JSON body
    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = %status, "Plaud API response");

        let body = response.text().await?;

        if !status.is_success() {
            return Err(CliError::api(status.as_u16(), truncate(&body)));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[async_trait]
impl PlaudApi for ApiClient {
    async fn list_devices(&self) -> Result<Value> {
        let url = endpoints::device_list_url(&self.base_url);
        self.send_json(self.client.get(url)).await
    }

    async fn list_recordings(&self, query: &RecordingQuery) -> Result<Value> {
        let url = endpoints::recordings_url(&self.base_url);
        debug!(skip = query.skip, limit = query.limit, "Requesting recordings page");

        self.send_json(self.client.get(url).query(&query.to_query_pairs()))
            .await
    }

    async fn temp_url(&self, recording_id: &str, format: Format) -> Result<TempUrlResponse> {
        let url = endpoints::temp_url_url(&self.base_url, recording_id);
        let is_opus = if format == Format::Opus { "1" } else { "0" };

        let body = self
            .send_json(self.client.get(url).query(&[("is_opus", is_opus)]))
            .await?;

        Ok(serde_json::from_value(body)?)
    }

    async fn update_filename(&self, recording_id: &str, filename: &str) -> Result<Value> {
        let url = endpoints::file_url(&self.base_url, recording_id);

        self.send_json(self.client.patch(url).json(&json!({ "filename": filename })))
            .await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CliError::api(status.as_u16(), truncate(&body)));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
