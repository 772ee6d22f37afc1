//! Plaud Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Ambient utilities shared by the Plaud bridge workspace members.
//!
//! # Overview
//!
//! - **Logging**: tracing subscriber configuration and initialization
//!
//! # Example
//!
//! ```no_run
//! use plaud_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     let _guard = init_logging(&config)?;
//!     Ok(())
//! }
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig};
