//! Action surface: devices and recordings
//!
//! An [`Action`] is chosen once per batch; each [`InputItem`] then runs it
//! with its own recording id. Output items remember which input produced
//! them. With `continue_on_fail`, a failing input yields an error item and
//! the rest of the batch still runs.

use crate::api::{Format, PlaudApi, RecordingFilters};
use crate::envelope::unwrap_devices;
use crate::error::{CliError, Result};
use crate::fetch::{fetch_records, DEFAULT_PAGE_SIZE};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Target used by "return all"
pub const RETURN_ALL_LIMIT: usize = 1000;

/// Default and maximum `limit` for get-many
pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Binary property used when none is given
pub const DEFAULT_BINARY_PROPERTY: &str = "data";

/// Resource x operation, with its batch-level parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// device: list
    ListDevices,
    /// recording: get many
    GetManyRecordings {
        return_all: bool,
        limit: usize,
        filters: RecordingFilters,
    },
    /// recording: get download URL
    GetDownloadUrl { format: Format },
    /// recording: update filename
    UpdateFilename { new_filename: String },
    /// recording: download
    Download {
        format: Format,
        binary_property: String,
    },
}

impl Action {
    /// Get-many with `limit` validated unless `return_all` is set
    pub fn get_many(return_all: bool, limit: usize, filters: RecordingFilters) -> Result<Self> {
        if !return_all && !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CliError::invalid_input(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }

        Ok(Action::GetManyRecordings {
            return_all,
            limit,
            filters,
        })
    }
}

/// Per-item parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputItem {
    pub recording_id: Option<String>,
}

impl InputItem {
    pub fn for_recording(id: impl Into<String>) -> Self {
        Self {
            recording_id: Some(id.into()),
        }
    }

    /// The recording id, which also names downloaded files and so may not
    /// contain path separators
    fn require_recording_id(&self) -> Result<&str> {
        let id = self
            .recording_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CliError::invalid_input("recording id is required"))?;

        if id.contains(['/', '\\']) {
            return Err(CliError::invalid_input(format!(
                "recording id '{}' must not contain path separators",
                id
            )));
        }

        Ok(id)
    }
}

/// Downloaded file attached to an output item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData {
    pub property: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// One item produced by an action
#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub json: Value,
    pub binary: Option<BinaryData>,
    /// Index of the input item this came from
    pub paired_item: usize,
}

impl OutputItem {
    fn json(json: Value, paired_item: usize) -> Self {
        Self {
            json,
            binary: None,
            paired_item,
        }
    }

    /// Whether this item reports an isolated failure
    pub fn is_error(&self) -> bool {
        self.binary.is_none() && self.json.get("error").is_some_and(Value::is_string)
    }
}

/// Run `action` once per input item.
///
/// Without `continue_on_fail` the first failure aborts the whole batch.
pub async fn execute_batch<A>(
    api: &A,
    action: &Action,
    items: &[InputItem],
    continue_on_fail: bool,
) -> Result<Vec<OutputItem>>
where
    A: PlaudApi + ?Sized,
{
    let mut output = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match run_item(api, action, item, index).await {
            Ok(produced) => output.extend(produced),
            Err(e) if continue_on_fail => {
                warn!(item = index, error = %e, "Action failed, continuing with next item");
                output.push(OutputItem::json(json!({ "error": e.to_string() }), index));
            },
            Err(e) => return Err(e),
        }
    }

    Ok(output)
}

async fn run_item<A>(api: &A, action: &Action, item: &InputItem, index: usize) -> Result<Vec<OutputItem>>
where
    A: PlaudApi + ?Sized,
{
    match action {
        Action::ListDevices => {
            let devices = unwrap_devices(api.list_devices().await?);
            debug!(count = devices.len(), "Listed devices");
            Ok(devices.into_iter().map(|d| OutputItem::json(d, index)).collect())
        },

        Action::GetManyRecordings {
            return_all,
            limit,
            filters,
        } => {
            let target = if *return_all { RETURN_ALL_LIMIT } else { *limit };
            let records = fetch_records(api, target, DEFAULT_PAGE_SIZE, *filters).await?;
            debug!(count = records.len(), "Fetched recordings");
            Ok(records.into_iter().map(|r| OutputItem::json(r, index)).collect())
        },

        Action::GetDownloadUrl { format } => {
            let recording_id = item.require_recording_id()?;
            let urls = api.temp_url(recording_id, *format).await?;

            Ok(vec![OutputItem::json(
                json!({
                    "recordingId": recording_id,
                    "format": format.as_str(),
                    "downloadUrl": urls.url_for(*format),
                    "tempUrl": urls.temp_url,
                    "tempUrlOpus": urls.temp_url_opus,
                }),
                index,
            )])
        },

        Action::UpdateFilename { new_filename } => {
            let recording_id = item.require_recording_id()?;
            if new_filename.trim().is_empty() {
                return Err(CliError::invalid_input("new filename must not be empty"));
            }

            let response = api.update_filename(recording_id, new_filename).await?;

            Ok(vec![OutputItem::json(
                json!({
                    "recordingId": recording_id,
                    "newFilename": new_filename,
                    "success": rename_succeeded(&response),
                    "message": response.get("message").cloned().unwrap_or(Value::Null),
                    "data": response.get("data").cloned().unwrap_or(Value::Null),
                }),
                index,
            )])
        },

        Action::Download {
            format,
            binary_property,
        } => {
            let recording_id = item.require_recording_id()?;
            let urls = api.temp_url(recording_id, *format).await?;
            let url = urls
                .url_for(*format)
                .ok_or_else(|| CliError::NoDownloadUrl(format.to_string()))?;

            let bytes = api.download(url).await?;
            let file_name = format!("recording_{}.{}", recording_id, format.file_extension());
            debug!(recording_id, size = bytes.len(), "Downloaded recording");

            Ok(vec![OutputItem {
                json: json!({
                    "recordingId": recording_id,
                    "format": format.as_str(),
                    "fileName": file_name,
                }),
                binary: Some(BinaryData {
                    property: binary_property.clone(),
                    file_name,
                    mime_type: format.mime_type().to_string(),
                    bytes,
                }),
                paired_item: index,
            }])
        },
    }
}

/// The rename endpoint reports success as `"success"` or as the number 200
fn rename_succeeded(response: &Value) -> bool {
    match response.get("status") {
        Some(Value::String(s)) => s == "success",
        Some(Value::Number(n)) => n.as_u64() == Some(200),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::TempUrlResponse;
    use crate::testing::{numbered, FakeApi};

    fn api_with_urls() -> FakeApi {
        let mut api = FakeApi::with_recordings(numbered("r", 5));
        api.temp_urls.insert(
            "rec-1".to_string(),
            TempUrlResponse {
                temp_url: Some("https://s3.example/rec-1.wav".to_string()),
                temp_url_opus: None,
            },
        );
        api
    }

    #[tokio::test]
    async fn test_list_devices_unwraps_envelope() {
        let mut api = FakeApi::with_recordings(Vec::new());
        api.devices = json!({ "data": [{ "sn": "A1" }, { "sn": "B2" }] });

        let out = execute_batch(&api, &Action::ListDevices, &[InputItem::default()], false)
            .await
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].json["sn"], "B2");
    }

    #[tokio::test]
    async fn test_list_devices_unknown_shape_passes_through() {
        let mut api = FakeApi::with_recordings(Vec::new());
        api.devices = json!({ "status": 0, "msg": "ok" });

        let out = execute_batch(&api, &Action::ListDevices, &[InputItem::default()], false)
            .await
            .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].json, json!({ "status": 0, "msg": "ok" }));
    }

    #[tokio::test]
    async fn test_get_many_respects_limit() {
        let api = FakeApi::with_recordings(numbered("r", 5));
        let action = Action::get_many(false, 3, RecordingFilters::default()).unwrap();

        let out = execute_batch(&api, &action, &[InputItem::default()], false)
            .await
            .unwrap();

        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|o| o.paired_item == 0));
    }

    #[tokio::test]
    async fn test_get_many_return_all_targets_thousand() {
        let api = FakeApi::with_recordings(numbered("r", 5));
        let action = Action::get_many(true, 0, RecordingFilters::default()).unwrap();

        let out = execute_batch(&api, &action, &[InputItem::default()], false)
            .await
            .unwrap();

        assert_eq!(out.len(), 5);
        assert_eq!(api.queries()[0].limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_get_many_limit_validation() {
        assert!(Action::get_many(false, 0, RecordingFilters::default()).is_err());
        assert!(Action::get_many(false, 101, RecordingFilters::default()).is_err());
        assert!(Action::get_many(true, 5000, RecordingFilters::default()).is_ok());
    }

    #[tokio::test]
    async fn test_download_url_output() {
        let api = api_with_urls();
        let action = Action::GetDownloadUrl {
            format: Format::Original,
        };

        let out = execute_batch(&api, &action, &[InputItem::for_recording("rec-1")], false)
            .await
            .unwrap();

        assert_eq!(
            out[0].json,
            json!({
                "recordingId": "rec-1",
                "format": "original",
                "downloadUrl": "https://s3.example/rec-1.wav",
                "tempUrl": "https://s3.example/rec-1.wav",
                "tempUrlOpus": null,
            })
        );
    }

    #[tokio::test]
    async fn test_update_filename_success_flag() {
        let mut api = FakeApi::with_recordings(Vec::new());
        api.rename_response = json!({ "status": 200, "message": "updated", "data": { "id": "r1" } });
        let action = Action::UpdateFilename {
            new_filename: "Weekly sync".to_string(),
        };

        let out = execute_batch(&api, &action, &[InputItem::for_recording("r1")], false)
            .await
            .unwrap();

        assert_eq!(out[0].json["success"], true);
        assert_eq!(out[0].json["message"], "updated");
        assert_eq!(api.renames(), vec![("r1".to_string(), "Weekly sync".to_string())]);
    }

    #[test]
    fn test_rename_success_detection() {
        assert!(rename_succeeded(&json!({ "status": "success" })));
        assert!(rename_succeeded(&json!({ "status": 200 })));
        assert!(!rename_succeeded(&json!({ "status": "error" })));
        assert!(!rename_succeeded(&json!({ "status": 500 })));
        assert!(!rename_succeeded(&json!({})));
    }

    #[tokio::test]
    async fn test_download_packages_binary() {
        let api = api_with_urls();
        let action = Action::Download {
            format: Format::Original,
            binary_property: DEFAULT_BINARY_PROPERTY.to_string(),
        };

        let out = execute_batch(&api, &action, &[InputItem::for_recording("rec-1")], false)
            .await
            .unwrap();

        let binary = out[0].binary.as_ref().unwrap();
        assert_eq!(binary.file_name, "recording_rec-1.wav");
        assert_eq!(binary.mime_type, "audio/wav");
        assert_eq!(binary.property, "data");
        assert_eq!(binary.bytes, b"bytes of https://s3.example/rec-1.wav".to_vec());
        assert_eq!(out[0].json["fileName"], "recording_rec-1.wav");
    }

    #[tokio::test]
    async fn test_download_without_url_for_format_fails() {
        let api = api_with_urls();
        let action = Action::Download {
            format: Format::Opus,
            binary_property: DEFAULT_BINARY_PROPERTY.to_string(),
        };

        let err = execute_batch(&api, &action, &[InputItem::for_recording("rec-1")], false)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No download URL available for format: opus");
        assert!(api.downloads().is_empty());
    }

    #[tokio::test]
    async fn test_continue_on_fail_isolates_items() {
        let api = api_with_urls();
        let action = Action::GetDownloadUrl {
            format: Format::Original,
        };
        let items = vec![
            InputItem::for_recording("missing"),
            InputItem::for_recording("rec-1"),
            InputItem::default(),
        ];

        let out = execute_batch(&api, &action, &items, true).await.unwrap();

        assert_eq!(out.len(), 3);
        assert!(out[0].is_error());
        assert_eq!(out[0].paired_item, 0);
        assert!(!out[1].is_error());
        assert_eq!(out[1].paired_item, 1);
        assert!(out[2].is_error());
        assert_eq!(out[2].json["error"], "Invalid input: recording id is required");
    }

    #[tokio::test]
    async fn test_failure_aborts_without_continue_on_fail() {
        let api = api_with_urls();
        let action = Action::GetDownloadUrl {
            format: Format::Original,
        };
        let items = vec![InputItem::for_recording("missing"), InputItem::for_recording("rec-1")];

        let err = execute_batch(&api, &action, &items, false).await.unwrap_err();

        assert!(matches!(err, CliError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_download_rejects_ids_with_path_separators() {
        let mut api = api_with_urls();
        api.temp_urls.insert(
            "../escape".to_string(),
            TempUrlResponse {
                temp_url: Some("https://s3.example/escape.wav".to_string()),
                temp_url_opus: None,
            },
        );
        let action = Action::Download {
            format: Format::Original,
            binary_property: DEFAULT_BINARY_PROPERTY.to_string(),
        };
        let items = vec![
            InputItem::for_recording("../escape"),
            InputItem::for_recording("nested\\name"),
            InputItem::for_recording("rec-1"),
        ];

        let out = execute_batch(&api, &action, &items, true).await.unwrap();

        assert!(out[0].is_error());
        assert!(out[0].json["error"].as_str().unwrap().contains("path separators"));
        assert!(out[1].is_error());
        assert_eq!(out[2].binary.as_ref().unwrap().file_name, "recording_rec-1.wav");
        assert_eq!(api.downloads(), vec!["https://s3.example/rec-1.wav".to_string()]);
    }
}
