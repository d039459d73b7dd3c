// ReadLog - Open Library Reading List Client
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Reading log retrieval
//!
//! # API Endpoint Reference
//! **Endpoint:** `GET https://openlibrary.org/people/{user_id}/books/already-read.json`
//!
//! The response wraps each logged book in an entry whose `work` object carries
//! the bibliographic fields:
//!
//! ```json
//! {
//!   "page": 1,
//!   "reading_log_entries": [
//!     {
//!       "work": {
//!         "title": "Good Omens",
//!         "key": "/works/OL453936W",
//!         "author_names": ["Terry Pratchett", "Neil Gaiman"],
//!         "first_publish_year": 1990,
//!         "cover_id": 8386405
//!       },
//!       "logged_date": "2023/10/02, 09:14:12"
//!     }
//!   ]
//! }
//! ```
//!
//! Entries arrive most recently read first. Only the first
//! [`READING_LOG_LIMIT`](super::client::READING_LOG_LIMIT) are kept; no further
//! pages are requested.

use crate::api::client::CatalogClient;
use crate::error::{ReadLogError, Result};
use crate::library::models::{BookRecord, RecordSource};
use serde::Deserialize;
use tracing::debug;

// ============================================================================
// API RESPONSE STRUCTURES
// ============================================================================

/// Reading log response container
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingLogResponse {
    /// Current page number (optional - not always included)
    #[serde(default)]
    pub page: Option<i32>,

    /// Logged books, most recent first
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reading_log_entries: Vec<ReadingLogEntry>,
}

/// One logged book
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingLogEntry {
    #[serde(default)]
    pub work: Option<ReadingLogWork>,

    /// Date the book was logged, as formatted by the catalog
    #[serde(default)]
    pub logged_date: Option<String>,
}

/// Bibliographic fields of a logged work
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingLogWork {
    #[serde(default)]
    pub title: Option<String>,

    /// Work key, e.g. "/works/OL453936W"
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub author_names: Option<Vec<String>>,

    #[serde(default)]
    pub first_publish_year: Option<i32>,

    #[serde(default)]
    pub cover_id: Option<i64>,
}

impl ReadingLogEntry {
    /// Normalize into the unified model (`status = Unread`)
    ///
    /// An entry without a `work` object still yields a record, with an empty
    /// title and every optional field absent.
    pub fn into_record(self) -> BookRecord {
        let work = self.work.unwrap_or_default();

        BookRecord::new(
            RecordSource::ReadingLog,
            work.title.unwrap_or_default(),
            work.author_names.unwrap_or_default(),
            work.first_publish_year,
            work.cover_id,
            work.key,
        )
    }
}

/// Keep the first `limit` entries, in server order, as unread records
pub fn normalize_reading_log(response: ReadingLogResponse, limit: usize) -> Vec<BookRecord> {
    response
        .reading_log_entries
        .into_iter()
        .take(limit)
        .map(ReadingLogEntry::into_record)
        .collect()
}

/// Treat an explicit JSON `null` list as empty
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Path of the already-read shelf for `user_id`
pub fn reading_log_endpoint(user_id: &str) -> String {
    format!(
        "/people/{}/books/already-read.json",
        urlencoding::encode(user_id)
    )
}

// ============================================================================
// CLIENT OPERATION
// ============================================================================

impl CatalogClient {
    /// Fetch the first entries of a user's already-read shelf
    ///
    /// Keeps at most `reading_log_limit` records (20 by default) in server order,
    /// each with `status = Unread`.
    ///
    /// # Errors
    /// Returns `ReadingLogFetchFailed` wrapping the transport, status or parse error.
    pub async fn fetch_reading_log(&self, user_id: &str) -> Result<Vec<BookRecord>> {
        if user_id.trim().is_empty() {
            return Err(ReadLogError::fetch_failed(
                user_id,
                ReadLogError::invalid_input("user id is empty"),
            ));
        }

        let endpoint = reading_log_endpoint(user_id);
        let response: ReadingLogResponse = self
            .get(&endpoint)
            .await
            .map_err(|e| ReadLogError::fetch_failed(user_id, e))?;

        let received = response.reading_log_entries.len();
        let records = normalize_reading_log(response, self.config().reading_log_limit);
        debug!(user_id, received, kept = records.len(), "reading log normalized");

        Ok(records)
    }
}
