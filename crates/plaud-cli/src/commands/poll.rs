//! `plaud poll` command implementation
//!
//! One-shot mode runs a single cycle and returns its error, if any. Watch
//! mode runs a cycle per interval tick until Ctrl-C; a failed cycle is logged
//! and the next tick retries. Ticks that fall behind are delayed, so cycles
//! never overlap.

use crate::api::ApiClient;
use crate::commands::write_json_lines;
use crate::config::Config;
use crate::error::Result;
use crate::trigger::{FileStateStore, PollMode, PollOutcome, RecordingTrigger, StateStore, TriggerConfig};
use crate::PollArgs;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Poll for new recordings
pub async fn run(config: &Config, args: &PollArgs) -> Result<()> {
    let trigger_config = TriggerConfig::new(args.max_recordings)?;
    let store = Arc::new(FileStateStore::new(&config.state_dir, &args.trigger_id)?);

    if args.reset {
        store.clear().await?;
        info!(path = %store.path().display(), "Cleared trigger state");
    }

    let api = Arc::new(ApiClient::from_config(config)?);
    let trigger = RecordingTrigger::new(api, store, trigger_config);
    let mode = if args.manual {
        PollMode::Manual
    } else {
        PollMode::Scheduled
    };

    if !args.watch {
        let items = run_cycle(&trigger, mode).await?;
        return emit(&items);
    }

    watch(&trigger, Duration::from_secs(args.interval), emit, ctrl_c()).await
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

/// Run a cycle per tick until `shutdown` resolves, passing emitted items to
/// `sink`. A cycle is awaited inside its tick, so cycles never overlap.
async fn watch<S, F>(trigger: &RecordingTrigger, period: Duration, mut sink: S, shutdown: F) -> Result<()>
where
    S: FnMut(&[Value]) -> Result<()>,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(interval_secs = period.as_secs(), "Watching for new recordings");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_cycle(trigger, PollMode::Scheduled).await {
                    Ok(items) => sink(&items)?,
                    Err(e) => error!(error = %e, "Poll cycle failed"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping");
                return Ok(());
            }
        }
    }
}

/// Run one cycle, returning the items it emits
async fn run_cycle(trigger: &RecordingTrigger, mode: PollMode) -> Result<Vec<Value>> {
    let outcome = trigger.poll(mode).await?;

    match &outcome {
        PollOutcome::FirstRun { baseline } => {
            info!(baseline, "Baseline stored; recordings uploaded from now on will be emitted");
        },
        PollOutcome::EmptyUpstream | PollOutcome::NoNewItems => {
            info!("No new recordings");
        },
        PollOutcome::Manual(_) | PollOutcome::NewItems(_) => {},
    }

    Ok(outcome.into_items().unwrap_or_default())
}

fn emit(items: &[Value]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    write_json_lines(&mut std::io::stdout().lock(), items)
}
