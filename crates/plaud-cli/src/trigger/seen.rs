//! Seen-set tracking across poll cycles
//!
//! The persisted [`PollState`] remembers which recording ids earlier polls
//! have already observed. It is bounded to [`MAX_SEEN_IDS`] entries, keeping
//! the most recently observed ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper bound on remembered ids
pub const MAX_SEEN_IDS: usize = 500;

/// State persisted for one trigger instance between poll cycles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollState {
    /// Ids observed so far, freshest first
    #[serde(default)]
    pub seen_ids: Vec<String>,

    /// When the seen-set was last updated
    #[serde(default)]
    pub last_poll_time: Option<DateTime<Utc>>,
}

impl PollState {
    /// True until a baseline has been recorded
    pub fn is_first_run(&self) -> bool {
        self.seen_ids.is_empty()
    }

    /// Adopt the current snapshot as the baseline without reporting anything
    pub fn record_initial_snapshot(&mut self, current_ids: Vec<String>, now: DateTime<Utc>) {
        self.seen_ids = current_ids;
        self.seen_ids.truncate(MAX_SEEN_IDS);
        self.last_poll_time = Some(now);
    }

    /// Return the ids in `current_ids` not seen before, in `current_ids` order,
    /// and merge the snapshot into the seen-set.
    ///
    /// The merged set lists the snapshot first, then the older entries not in
    /// it, and is cut to [`MAX_SEEN_IDS`].
    pub fn diff_and_update(&mut self, current_ids: &[String], now: DateTime<Utc>) -> Vec<String> {
        let seen: HashSet<&str> = self.seen_ids.iter().map(String::as_str).collect();

        let mut emitted = HashSet::new();
        let new_ids: Vec<String> = current_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !seen.contains(id) && emitted.insert(*id))
            .map(str::to_string)
            .collect();

        let mut kept = HashSet::new();
        let merged: Vec<String> = current_ids
            .iter()
            .chain(self.seen_ids.iter())
            .map(String::as_str)
            .filter(|id| kept.insert(*id))
            .take(MAX_SEEN_IDS)
            .map(str::to_string)
            .collect();

        self.seen_ids = merged;
        self.last_poll_time = Some(now);

        new_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_first_run_detection() {
        let mut state = PollState::default();
        assert!(state.is_first_run());

        state.record_initial_snapshot(ids(&["a", "b", "c"]), Utc::now());

        assert!(!state.is_first_run());
        assert_eq!(state.seen_ids, ids(&["a", "b", "c"]));
        assert!(state.last_poll_time.is_some());
    }

    #[test]
    fn test_new_id_detected_and_merged() {
        let mut state = PollState::default();
        state.record_initial_snapshot(ids(&["a", "b", "c"]), Utc::now());

        let new_ids = state.diff_and_update(&ids(&["d", "a", "b", "c"]), Utc::now());

        assert_eq!(new_ids, ids(&["d"]));
        assert_eq!(state.seen_ids, ids(&["d", "a", "b", "c"]));
    }

    #[test]
    fn test_no_new_ids() {
        let mut state = PollState::default();
        state.record_initial_snapshot(ids(&["a", "b"]), Utc::now());

        assert!(state.diff_and_update(&ids(&["a", "b"]), Utc::now()).is_empty());
        assert_eq!(state.seen_ids, ids(&["a", "b"]));
    }

    #[test]
    fn test_new_ids_keep_snapshot_order() {
        let mut state = PollState::default();
        state.record_initial_snapshot(ids(&["old"]), Utc::now());

        let new_ids = state.diff_and_update(&ids(&["n3", "old", "n2", "n1"]), Utc::now());

        assert_eq!(new_ids, ids(&["n3", "n2", "n1"]));
    }

    #[test]
    fn test_duplicate_ids_in_snapshot_reported_once() {
        let mut state = PollState::default();
        state.record_initial_snapshot(ids(&["a"]), Utc::now());

        let new_ids = state.diff_and_update(&ids(&["x", "x", "a"]), Utc::now());

        assert_eq!(new_ids, ids(&["x"]));
        assert_eq!(state.seen_ids, ids(&["x", "a"]));
    }

    #[test]
    fn test_seen_set_never_exceeds_bound() {
        let mut state = PollState::default();
        state.record_initial_snapshot(ids(&["seed"]), Utc::now());

        for batch in 0..6 {
            let snapshot: Vec<String> = (0..100).map(|i| format!("id-{batch}-{i}")).collect();
            state.diff_and_update(&snapshot, Utc::now());
            assert!(state.seen_ids.len() <= MAX_SEEN_IDS);
        }

        assert_eq!(state.seen_ids.len(), MAX_SEEN_IDS);
        // Freshest snapshot leads, the oldest batches fell off
        assert_eq!(state.seen_ids[0], "id-5-0");
        assert!(!state.seen_ids.iter().any(|id| id == "seed"));
        assert!(!state.seen_ids.iter().any(|id| id.starts_with("id-0-")));
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let json = r#"{"seen_ids":["a"],"last_poll_time":"2025-03-01T10:00:00Z"}"#;
        let state: PollState = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(state.seen_ids, ids(&["a"]));
        assert!(state.last_poll_time.is_some());

        let empty: PollState = serde_json::from_str("{}").unwrap_or_default();
        assert!(empty.is_first_run());
    }
}
