//! Persistence for trigger state
//!
//! A [`StateStore`] holds the [`PollState`] of exactly one trigger instance.
//! Reads and writes are not atomic with respect to each other: callers must
//! not run two polls for the same instance at once.

use crate::error::{CliError, Result};
use crate::trigger::seen::PollState;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Key-value state scoped to one trigger instance (dependency injection)
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state; a store that was never written yields the default
    async fn load(&self) -> Result<PollState>;

    /// Replace the stored state
    async fn save(&self, state: &PollState) -> Result<()>;

    /// Forget everything, so the next poll records a fresh baseline
    async fn clear(&self) -> Result<()>;
}

/// In-process store (tests, one-shot runs)
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<PollState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Result<PollState> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|_| CliError::state("state lock poisoned"))
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<PollState> {
        self.snapshot()
    }

    async fn save(&self, state: &PollState) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| CliError::state("state lock poisoned"))?;
        *guard = state.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.save(&PollState::default()).await
    }
}

/// One JSON file per trigger instance: `<state_dir>/triggers/<id>.json`
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Store for trigger `trigger_id` under `state_dir`
    pub fn new(state_dir: &Path, trigger_id: &str) -> Result<Self> {
        let valid = !trigger_id.is_empty()
            && trigger_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(CliError::invalid_input(format!(
                "trigger id '{}' may only contain letters, digits, '-' and '_'",
                trigger_id
            )));
        }

        Ok(Self {
            path: state_dir.join("triggers").join(format!("{}.json", trigger_id)),
        })
    }

    /// Location of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<PollState> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PollState::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw).map_err(|e| {
            CliError::state(format!("{} is not valid trigger state: {}", self.path.display(), e))
        })
    }

    async fn save(&self, state: &PollState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let written = match tokio::fs::write(&tmp, serde_json::to_vec_pretty(state)?).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                debug!(path = %tmp.display(), error = %cleanup, "Temp state file not removed");
            }
            return Err(e.into());
        }

        debug!(path = %self.path.display(), seen = state.seen_ids.len(), "Saved trigger state");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
