//! Configuration management for the Plaud CLI
//!
//! Handles the bearer token, region, state directory and request timeout.
//! Values come from the environment first and are then overridden by
//! command-line flags.

use crate::api::client::DEFAULT_API_TIMEOUT_SECS;
use crate::api::Region;
use crate::error::{CliError, Result};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Directory name under the platform data dir holding trigger state
pub const STATE_DIR_NAME: &str = "plaud";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Regional API endpoint
    pub region: Region,

    /// Bearer token; required by every API command
    pub bearer_token: Option<String>,

    /// Directory holding persisted poll state
    pub state_dir: PathBuf,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Result<Self> {
        let state_dir = dirs::data_dir()
            .ok_or_else(|| CliError::config("Could not determine data directory"))?
            .join(STATE_DIR_NAME);

        Ok(Self {
            region: Region::default(),
            bearer_token: None,
            state_dir,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        })
    }

    /// Load config from environment variables
    ///
    /// - `PLAUD_BEARER_TOKEN`
    /// - `PLAUD_REGION` (eu, us, apac or a URL)
    /// - `PLAUD_STATE_DIR`
    /// - `PLAUD_API_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(token) = std::env::var("PLAUD_BEARER_TOKEN") {
            config.set_bearer_token(token);
        }

        if let Ok(region) = std::env::var("PLAUD_REGION") {
            config.region = region.parse()?;
        }

        if let Ok(dir) = std::env::var("PLAUD_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }

        if let Ok(secs) = std::env::var("PLAUD_API_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                CliError::config(format!("PLAUD_API_TIMEOUT_SECS must be a number, got '{}'", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the bearer token, stripping a pasted "Bearer " prefix
    pub fn set_bearer_token(&mut self, token: String) {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        self.bearer_token = (!token.is_empty()).then(|| token.to_string());
    }

    /// Set the region
    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    /// Set the state directory
    pub fn set_state_dir(&mut self, dir: PathBuf) {
        self.state_dir = dir;
    }
}

impl Default for Config {
    fn default() -> Self {
        // If we can't determine the data directory, fall back to a local directory
        Self::new().unwrap_or_else(|_| Self {
            region: Region::default(),
            bearer_token: None,
            state_dir: PathBuf::from(".plaud-state"),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        })
    }
}
