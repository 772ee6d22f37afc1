//! Scripted [`PlaudApi`] fake shared by unit tests

use crate::api::{Format, PlaudApi, RecordingQuery, TempUrlResponse};
use crate::error::{CliError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Records `{ "id": "<prefix>1" } .. { "id": "<prefix>n" }`
pub fn numbered(prefix: &str, n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| json!({ "id": format!("{prefix}{i}"), "filename": format!("Recording {i}") }))
        .collect()
}

/// Records with the given ids, in order
pub fn with_ids(ids: &[&str]) -> Vec<Value> {
    ids.iter().map(|id| json!({ "id": id })).collect()
}

enum Recordings {
    /// Slices of a dataset honoring skip/limit, wrapped as `{"data": [...]}`
    Dataset(Vec<Value>),
    /// Envelopes returned one per call, `[]` once exhausted
    Pages(VecDeque<Value>),
    /// Every call fails with this status
    Failing(u16),
}

pub struct FakeApi {
    recordings: Mutex<Recordings>,
    queries: Mutex<Vec<RecordingQuery>>,
    failures_left: Mutex<usize>,
    pub devices: Value,
    pub temp_urls: HashMap<String, TempUrlResponse>,
    pub rename_response: Value,
    renames: Mutex<Vec<(String, String)>>,
    downloads: Mutex<Vec<String>>,
}

impl FakeApi {
    fn new(recordings: Recordings) -> Self {
        Self {
            recordings: Mutex::new(recordings),
            queries: Mutex::new(Vec::new()),
            failures_left: Mutex::new(0),
            devices: json!([]),
            temp_urls: HashMap::new(),
            rename_response: json!({ "status": "success" }),
            renames: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_recordings(records: Vec<Value>) -> Self {
        Self::new(Recordings::Dataset(records))
    }

    pub fn with_pages(pages: Vec<Value>) -> Self {
        Self::new(Recordings::Pages(pages.into()))
    }

    pub fn failing(status: u16) -> Self {
        Self::new(Recordings::Failing(status))
    }

    /// Replace the dataset served by later list calls
    pub fn set_recordings(&self, records: Vec<Value>) {
        *self.recordings.lock().unwrap() = Recordings::Dataset(records);
    }

    /// Make the next `n` list calls fail with a 503
    pub fn fail_next(&self, n: usize) {
        *self.failures_left.lock().unwrap() = n;
    }

    pub fn queries(&self) -> Vec<RecordingQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn renames(&self) -> Vec<(String, String)> {
        self.renames.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaudApi for FakeApi {
    async fn list_devices(&self) -> Result<Value> {
        Ok(self.devices.clone())
    }

    async fn list_recordings(&self, query: &RecordingQuery) -> Result<Value> {
        self.queries.lock().unwrap().push(*query);

        {
            let mut failures_left = self.failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(CliError::api(503, "scripted outage"));
            }
        }

        match &mut *self.recordings.lock().unwrap() {
            Recordings::Dataset(records) => {
                let page: Vec<Value> = records
                    .iter()
                    .skip(query.skip)
                    .take(query.limit)
                    .cloned()
                    .collect();
                Ok(json!({ "data": page }))
            },
            Recordings::Pages(pages) => Ok(pages.pop_front().unwrap_or_else(|| json!([]))),
            Recordings::Failing(status) => Err(CliError::api(*status, "scripted failure")),
        }
    }

    async fn temp_url(&self, recording_id: &str, _format: Format) -> Result<TempUrlResponse> {
        self.temp_urls
            .get(recording_id)
            .cloned()
            .ok_or_else(|| CliError::api(404, format!("file {recording_id} not found")))
    }

    async fn update_filename(&self, recording_id: &str, filename: &str) -> Result<Value> {
        self.renames
            .lock()
            .unwrap()
            .push((recording_id.to_string(), filename.to_string()));
        Ok(self.rename_response.clone())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.lock().unwrap().push(url.to_string());
        Ok(format!("bytes of {url}").into_bytes())
    }
}
