//! New-recording trigger
//!
//! One call to [`RecordingTrigger::poll`] is one poll cycle:
//!
//! ```text
//! fetch 2 x max_recordings newest recordings
//!   ├─ none upstream          -> EmptyUpstream  (no output)
//!   ├─ manual mode            -> Manual         (newest record, state untouched)
//!   ├─ no baseline yet        -> FirstRun       (store baseline, no output)
//!   ├─ nothing unseen         -> NoNewItems     (no output)
//!   └─ unseen ids             -> NewItems       (newest first, at most max_recordings)
//! ```
//!
//! Cycles for one trigger instance must not overlap; the scheduler driving
//! `poll` is responsible for that.

use crate::api::{PlaudApi, RecordingFilters, SortField};
use crate::envelope::record_id;
use crate::error::{CliError, Result};
use crate::fetch::fetch_records;
use crate::trigger::store::StateStore;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default cap on recordings emitted per cycle
pub const DEFAULT_MAX_RECORDINGS: usize = 10;

/// Largest accepted `max_recordings`
pub const MAX_RECORDINGS_LIMIT: usize = 100;

/// How many recordings a cycle fetches per emitted slot
const FETCH_MULTIPLIER: usize = 2;

/// How the cycle was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    /// Regular scheduled poll
    #[default]
    Scheduled,
    /// Interactive test: emit the newest recording, ignore the seen-set
    Manual,
}

/// Result of one poll cycle
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The account has no recordings
    EmptyUpstream,
    /// Manual mode preview of the newest recording
    Manual(Value),
    /// Baseline recorded with this many ids
    FirstRun { baseline: usize },
    /// Nothing unseen since the last cycle
    NoNewItems,
    /// Newly observed recordings, newest first
    NewItems(Vec<Value>),
}

impl PollOutcome {
    /// Items to hand to the workflow, or `None` for "no output"
    pub fn into_items(self) -> Option<Vec<Value>> {
        match self {
            PollOutcome::Manual(record) => Some(vec![record]),
            PollOutcome::NewItems(records) => Some(records),
            PollOutcome::EmptyUpstream | PollOutcome::FirstRun { .. } | PollOutcome::NoNewItems => {
                None
            },
        }
    }
}

/// Trigger parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    max_recordings: usize,
}

impl TriggerConfig {
    /// Validate `max_recordings` (1..=100)
    pub fn new(max_recordings: usize) -> Result<Self> {
        if !(1..=MAX_RECORDINGS_LIMIT).contains(&max_recordings) {
            return Err(CliError::invalid_input(format!(
                "max recordings must be between 1 and {}, got {}",
                MAX_RECORDINGS_LIMIT, max_recordings
            )));
        }
        Ok(Self { max_recordings })
    }

    pub fn max_recordings(&self) -> usize {
        self.max_recordings
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            max_recordings: DEFAULT_MAX_RECORDINGS,
        }
    }
}

/// Polls the recordings list and reports recordings not seen before
pub struct RecordingTrigger {
    api: Arc<dyn PlaudApi>,
    store: Arc<dyn StateStore>,
    config: TriggerConfig,
}

impl RecordingTrigger {
    pub fn new(api: Arc<dyn PlaudApi>, store: Arc<dyn StateStore>, config: TriggerConfig) -> Self {
        Self { api, store, config }
    }

    /// Run one poll cycle
    #[instrument(level = "info", skip(self), fields(max = self.config.max_recordings))]
    pub async fn poll(&self, mode: PollMode) -> Result<PollOutcome> {
        let target = self.config.max_recordings * FETCH_MULTIPLIER;
        let filters = RecordingFilters {
            include_trash: false,
            sort_by: SortField::CreatedAt,
            descending: true,
        };

        // One request of `target` records, same as a single page
        let records = fetch_records(self.api.as_ref(), target, target, filters)
            .await
            .map_err(|e| CliError::poll(&e))?;

        if records.is_empty() {
            debug!("No recordings upstream");
            return Ok(PollOutcome::EmptyUpstream);
        }

        if mode == PollMode::Manual {
            let newest = records.into_iter().next().unwrap_or(Value::Null);
            return Ok(PollOutcome::Manual(newest));
        }

        let current_ids: Vec<String> = records.iter().filter_map(record_id).collect();
        let mut state = self.store.load().await?;

        if state.is_first_run() {
            let baseline = current_ids.len();
            state.record_initial_snapshot(current_ids, Utc::now());
            self.store.save(&state).await?;

            info!(baseline, "Recorded initial baseline");
            return Ok(PollOutcome::FirstRun { baseline });
        }

        let new_ids = state.diff_and_update(&current_ids, Utc::now());
        self.store.save(&state).await?;

        if new_ids.is_empty() {
            debug!(seen = state.seen_ids.len(), "No new recordings");
            return Ok(PollOutcome::NoNewItems);
        }

        let mut pending: HashSet<String> = new_ids.into_iter().collect();
        let fresh: Vec<Value> = records
            .into_iter()
            .filter(|record| record_id(record).is_some_and(|id| pending.remove(&id)))
            .take(self.config.max_recordings)
            .collect();

        info!(count = fresh.len(), "New recordings found");
        Ok(PollOutcome::NewItems(fresh))
    }
}
