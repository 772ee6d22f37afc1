//! Paginated recording fetcher
//!
//! Walks `GET /file/simple/web` with an increasing `skip` offset until the
//! requested number of records is collected or the API runs dry. Pages are
//! fetched strictly one after another; any request failure aborts the fetch.

use crate::api::{PlaudApi, RecordingFilters, RecordingQuery};
use crate::envelope::unwrap_records;
use crate::error::{CliError, Result};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Hard stop on page requests per fetch, in case the API keeps answering
/// with full pages that never add up to the target
pub const MAX_PAGES: usize = 1000;

/// Fetch up to `target` records in upstream order.
///
/// Each page asks for `min(page_size, target - collected)` records. The loop
/// ends when a page comes back shorter than requested, when `target` records
/// have been collected, or after [`MAX_PAGES`] requests.
#[instrument(level = "debug", skip(api))]
pub async fn fetch_records<A>(
    api: &A,
    target: usize,
    page_size: usize,
    filters: RecordingFilters,
) -> Result<Vec<Value>>
where
    A: PlaudApi + ?Sized,
{
    if target == 0 || page_size == 0 {
        return Err(CliError::invalid_input(format!(
            "target and page size must be positive (target={}, page_size={})",
            target, page_size
        )));
    }

    let mut records: Vec<Value> = Vec::new();
    let mut skip = 0;

    for page in 0..MAX_PAGES {
        let limit = page_size.min(target - records.len());
        let query = RecordingQuery {
            skip,
            limit,
            filters,
        };

        let batch = unwrap_records(api.list_recordings(&query).await?);
        let received = batch.len();
        records.extend(batch);
        skip += page_size;

        debug!(page, skip = query.skip, limit, received, total = records.len(), "Fetched page");

        if received < limit || records.len() >= target {
            records.truncate(target);
            return Ok(records);
        }
    }

    warn!(
        pages = MAX_PAGES,
        collected = records.len(),
        target,
        "Page limit reached before the API signalled the end of the list"
    );
    records.truncate(target);
    Ok(records)
}
