//! Polling trigger for newly uploaded recordings
//!
//! - [`seen`]: the bounded seen-set and its diffing rules
//! - [`store`]: where that state lives between cycles
//! - [`poller`]: the per-cycle decision logic

pub mod poller;
pub mod seen;
pub mod store;

pub use poller::{PollMode, PollOutcome, RecordingTrigger, TriggerConfig};
pub use seen::{PollState, MAX_SEEN_IDS};
pub use store::{FileStateStore, MemoryStateStore, StateStore};
