//! `plaud check` command implementation
//!
//! Verifies the bearer token against the device list endpoint.

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{CliError, Result};
use colored::Colorize;

/// Check the configured credentials
pub async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    if !client.check_credentials().await? {
        return Err(CliError::config(format!(
            "the bearer token was rejected by {}. Copy a fresh token from the web app",
            client.base_url()
        )));
    }

    eprintln!("{} Token accepted by {}", "✓".green(), client.base_url());
    Ok(())
}
