//! API client module
//!
//! HTTP collaborator for the Plaud cloud API. The rest of the crate talks to
//! it through the [`PlaudApi`] trait so fetchers, actions and the trigger can
//! be exercised against scripted fakes.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Operations the bridge needs from the Plaud API
#[async_trait]
pub trait PlaudApi: Send + Sync {
    /// `GET /device/list`, raw envelope
    async fn list_devices(&self) -> Result<Value>;

    /// `GET /file/simple/web`, raw envelope for one page
    async fn list_recordings(&self, query: &RecordingQuery) -> Result<Value>;

    /// `GET /file/temp-url/{id}`
    async fn temp_url(&self, recording_id: &str, format: Format) -> Result<TempUrlResponse>;

    /// `PATCH /file/{id}` with a new filename, raw response
    async fn update_filename(&self, recording_id: &str, filename: &str) -> Result<Value>;

    /// Fetch the bytes behind a presigned download link (no bearer token)
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}
