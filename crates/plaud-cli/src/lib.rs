//! Plaud CLI Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Bridge between the Plaud recording cloud and workflow tooling.
//!
//! # Overview
//!
//! - **Devices**: list devices linked to the account (`plaud devices`)
//! - **Recordings**: list, fetch download links, rename and download
//!   (`plaud recordings ...`)
//! - **Trigger**: poll for recordings uploaded since the last poll and emit
//!   them as JSON lines (`plaud poll`)
//! - **Credentials**: verify the bearer token (`plaud check`)

pub mod actions;
pub mod api;
pub mod commands;
pub mod config;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod progress;
pub mod trigger;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod testing;

// Re-export commonly used types
pub use error::{CliError, Result};

use api::{Format, SortField};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Plaud - recordings bridge for automation workflows
#[derive(Parser, Debug)]
#[command(name = "plaud")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token (the Authorization header value without "Bearer ")
    #[arg(long, env = "PLAUD_BEARER_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// API region: eu, us, apac, or a full base URL
    #[arg(long, env = "PLAUD_REGION", global = true)]
    pub region: Option<String>,

    /// Directory for persisted trigger state
    #[arg(long, env = "PLAUD_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Emit an error item for a failing input instead of aborting
    #[arg(long, global = true)]
    pub continue_on_fail: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the bearer token is accepted
    Check,

    /// List devices linked to the account
    Devices,

    /// Work with recordings
    Recordings {
        #[command(subcommand)]
        command: RecordingCommand,
    },

    /// Poll for recordings added since the previous poll
    Poll(PollArgs),
}

/// Recording subcommands
#[derive(Subcommand, Debug)]
pub enum RecordingCommand {
    /// List recordings
    List {
        /// Return every recording (up to 1000)
        #[arg(long)]
        all: bool,

        /// Maximum number of recordings to return
        #[arg(short, long, default_value_t = actions::DEFAULT_LIMIT)]
        limit: usize,

        /// Include recordings in the trash
        #[arg(long)]
        include_trash: bool,

        /// Field to sort by
        #[arg(long, value_enum, default_value_t = SortField::CreatedAt)]
        sort_by: SortField,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
    },

    /// Get temporary download URLs
    Url {
        /// Recording IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Audio format
        #[arg(short, long, value_enum, default_value_t = Format::Original)]
        format: Format,
    },

    /// Rename a recording
    Rename {
        /// Recording ID
        id: String,

        /// New filename
        new_filename: String,
    },

    /// Download recordings to disk
    Download {
        /// Recording IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Audio format
        #[arg(short, long, value_enum, default_value_t = Format::Original)]
        format: Format,

        /// Directory to write files into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Options for `plaud poll`
#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// Maximum new recordings emitted per poll (1-100)
    #[arg(short, long, default_value_t = trigger::poller::DEFAULT_MAX_RECORDINGS)]
    pub max_recordings: usize,

    /// Name scoping the persisted seen-set
    #[arg(long, default_value = "default")]
    pub trigger_id: String,

    /// Emit the newest recording without touching the seen-set
    #[arg(long, conflicts_with = "watch")]
    pub manual: bool,

    /// Forget the seen-set before polling
    #[arg(long)]
    pub reset: bool,

    /// Keep polling until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between polls in watch mode
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

impl Cli {
    /// Resolve configuration: environment first, then flags
    pub fn config(&self) -> Result<config::Config> {
        let mut config = config::Config::from_env()?;

        if let Some(token) = &self.token {
            config.set_bearer_token(token.clone());
        }

        if let Some(region) = &self.region {
            config.set_region(region.parse()?);
        }

        if let Some(dir) = &self.state_dir {
            config.set_state_dir(dir.clone());
        }

        Ok(config)
    }
}
