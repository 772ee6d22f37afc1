//! API request and response types
//!
//! Records and devices are kept as raw `serde_json::Value`s: the upstream
//! shapes are undocumented, so only the handful of fields the bridge reads
//! are typed here.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regional API endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Region {
    /// Europe, `https://api-euc1.plaud.ai`
    #[default]
    Eu,
    /// United States, `https://api.plaud.ai`
    Us,
    /// Asia Pacific, `https://api-apac.plaud.ai`
    Apac,
    /// Any other base URL (proxies, mock servers)
    Custom(String),
}

impl Region {
    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        match self {
            Region::Eu => "https://api-euc1.plaud.ai",
            Region::Us => "https://api.plaud.ai",
            Region::Apac => "https://api-apac.plaud.ai",
            Region::Custom(url) => url.trim_end_matches('/'),
        }
    }
}

impl FromStr for Region {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "eu" | "euc1" | "europe" => Ok(Region::Eu),
            "us" | "usa" => Ok(Region::Us),
            "apac" | "asia" => Ok(Region::Apac),
            lower if lower.starts_with("http://") || lower.starts_with("https://") => {
                Ok(Region::Custom(trimmed.to_string()))
            },
            _ => Err(CliError::config(format!(
                "Unknown region '{}'. Use eu, us, apac or a full https:// URL",
                s
            ))),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_url())
    }
}

/// Field the list endpoint sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Filename,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Filename => "filename",
        }
    }
}

/// Audio format offered by the temp-url endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Format the device recorded in
    #[default]
    Original,
    /// Opus-compressed transcode
    Opus,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Original => "original",
            Format::Opus => "opus",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Format::Original => "wav",
            Format::Opus => "opus",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Original => "audio/wav",
            Format::Opus => "audio/opus",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters forwarded to the recordings list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingFilters {
    pub include_trash: bool,
    pub sort_by: SortField,
    pub descending: bool,
}

impl Default for RecordingFilters {
    fn default() -> Self {
        Self {
            include_trash: false,
            sort_by: SortField::CreatedAt,
            descending: true,
        }
    }
}

/// One page request against `GET /file/simple/web`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingQuery {
    pub skip: usize,
    pub limit: usize,
    pub filters: RecordingFilters,
}

impl RecordingQuery {
    /// Query-string pairs in the form the API expects (booleans as 0/1)
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("skip", self.skip.to_string()),
            ("limit", self.limit.to_string()),
            ("is_trash", flag(self.filters.include_trash)),
            ("sort_by", self.filters.sort_by.as_str().to_string()),
            ("is_desc", flag(self.filters.descending)),
        ]
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Response of `GET /file/temp-url/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempUrlResponse {
    #[serde(default)]
    pub temp_url: Option<String>,
    #[serde(default)]
    pub temp_url_opus: Option<String>,
}

impl TempUrlResponse {
    /// Link for the requested format, if the API offered one
    pub fn url_for(&self, format: Format) -> Option<&str> {
        match format {
            Format::Original => self.temp_url.as_deref(),
            Format::Opus => self.temp_url_opus.as_deref(),
        }
        .filter(|url| !url.is_empty())
    }
}
