//! Error types for the Plaud CLI
//!
//! User-facing error type with messages that say what went wrong and, where
//! possible, what to do about it.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// The Plaud API answered with a non-success status
    #[error("Plaud API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP request failed before a response was received
    #[error("Network request failed: {0}. Check your internet connection and region.")]
    Http(#[from] reqwest::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    /// Persisted trigger state could not be read or written
    #[error("Trigger state error: {0}. Run 'plaud poll --reset' to start from a fresh baseline.")]
    State(String),

    /// A parameter value is out of range or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The temp-url endpoint returned no link for the requested format
    #[error("No download URL available for format: {0}")]
    NoDownloadUrl(String),

    /// A poll cycle failed as a whole
    #[error("Failed to poll Plaud API: {0}")]
    Poll(String),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create an API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a trigger state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Wrap any error as a failed poll cycle
    pub fn poll(source: &CliError) -> Self {
        Self::Poll(source.to_string())
    }
}
