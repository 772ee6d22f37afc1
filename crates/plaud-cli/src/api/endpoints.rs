//! API endpoint URL builders

/// Device list endpoint, also used to check credentials
pub fn device_list_url(base_url: &str) -> String {
    format!("{}/device/list", base_url)
}

/// Paginated recordings list endpoint
pub fn recordings_url(base_url: &str) -> String {
    format!("{}/file/simple/web", base_url)
}

/// Temporary download link for one recording
pub fn temp_url_url(base_url: &str, recording_id: &str) -> String {
    format!("{}/file/temp-url/{}", base_url, urlencoding::encode(recording_id))
}

/// Single recording resource (PATCH to rename)
pub fn file_url(base_url: &str, recording_id: &str) -> String {
    format!("{}/file/{}", base_url, urlencoding::encode(recording_id))
}
