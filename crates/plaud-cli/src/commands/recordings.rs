//! `plaud recordings` command implementations
//!
//! List, link, rename and download recordings.

use crate::actions::{execute_batch, Action, InputItem, OutputItem, DEFAULT_BINARY_PROPERTY};
use crate::api::{ApiClient, Format, RecordingFilters, SortField};
use crate::commands::print_items;
use crate::config::Config;
use crate::error::Result;
use crate::progress::{create_spinner, format_bytes};
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// `plaud recordings list`
pub async fn list(
    config: &Config,
    all: bool,
    limit: usize,
    include_trash: bool,
    sort_by: SortField,
    ascending: bool,
) -> Result<()> {
    let filters = RecordingFilters {
        include_trash,
        sort_by,
        descending: !ascending,
    };
    let action = Action::get_many(all, limit, filters)?;
    let client = ApiClient::from_config(config)?;

    let items = execute_batch(&client, &action, &[InputItem::default()], false).await?;

    print_items(&items)
}

/// `plaud recordings url`
pub async fn url(config: &Config, ids: &[String], format: Format, continue_on_fail: bool) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let action = Action::GetDownloadUrl { format };

    let items = execute_batch(&client, &action, &input_items(ids), continue_on_fail).await?;

    print_items(&items)
}

/// `plaud recordings rename`
pub async fn rename(config: &Config, id: &str, new_filename: &str) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let action = Action::UpdateFilename {
        new_filename: new_filename.to_string(),
    };

    let items = execute_batch(&client, &action, &[InputItem::for_recording(id)], false).await?;

    print_items(&items)
}

/// `plaud recordings download`
pub async fn download(
    config: &Config,
    ids: &[String],
    format: Format,
    output_dir: &Path,
    continue_on_fail: bool,
) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let action = Action::Download {
        format,
        binary_property: DEFAULT_BINARY_PROPERTY.to_string(),
    };

    let spinner = create_spinner(&format!("Downloading {} recording(s)...", ids.len()));
    let result = execute_batch(&client, &action, &input_items(ids), continue_on_fail).await;
    spinner.finish_and_clear();

    let mut items = result?;
    tokio::fs::create_dir_all(output_dir).await?;

    for item in &mut items {
        if let Some(path) = save_binary(item, output_dir).await? {
            if let Value::Object(map) = &mut item.json {
                map.insert("path".to_string(), Value::String(path.display().to_string()));
            }
        }
    }

    print_items(&items)
}

fn input_items(ids: &[String]) -> Vec<InputItem> {
    ids.iter().map(InputItem::for_recording).collect()
}

/// Write an item's binary part into `dir`, returning the file path
async fn save_binary(item: &OutputItem, dir: &Path) -> Result<Option<PathBuf>> {
    let Some(binary) = &item.binary else {
        return Ok(None);
    };

    let path = dir.join(&binary.file_name);
    tokio::fs::write(&path, &binary.bytes).await?;

    info!(path = %path.display(), mime = %binary.mime_type, "Saved recording");
    eprintln!(
        "{} {} ({})",
        "✓".green(),
        path.display(),
        format_bytes(binary.bytes.len() as u64)
    );

    Ok(Some(path))
}
