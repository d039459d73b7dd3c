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


//! Unified book model
//!
//! Both catalog responses (reading log entries and search documents) are
//! normalized into [`BookRecord`] by the `api` module. Nothing downstream of
//! the API layer knows which shape a record came from, except through
//! [`RecordSource`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Default host serving cover images
pub const DEFAULT_COVERS_BASE_URL: &str = "https://covers.openlibrary.org";

/// Length of the synthetic record key in hex characters
const KEY_LEN: usize = 16;

// ============================================================================
// ENUMS
// ============================================================================

/// Local read status of a book
///
/// This is a derived field: the catalog has no notion of it. Every record
/// starts out `Unread` and only the store's toggle operations change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReadStatus {
    Read,
    #[default]
    Unread,
}

impl ReadStatus {
    /// The opposite status
    pub fn toggled(self) -> Self {
        match self {
            ReadStatus::Read => ReadStatus::Unread,
            ReadStatus::Unread => ReadStatus::Read,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::Read => "Read",
            ReadStatus::Unread => "Unread",
        }
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two displayed lists a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum ListKind {
    ReadingLog,
    SearchResults,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::ReadingLog => "reading log",
            ListKind::SearchResults => "search results",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog endpoint a record was normalized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSource {
    ReadingLog,
    Search,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::ReadingLog => "reading-log",
            RecordSource::Search => "search",
        }
    }
}

// ============================================================================
// BOOK RECORD
// ============================================================================

/// A book as the display layer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stable synthetic key, derived from source, catalog key, title and year
    pub key: String,

    pub title: String,

    /// Author names in catalog order (may be empty)
    pub author_names: Vec<String>,

    pub first_publish_year: Option<i32>,

    /// Cover image id; `None` means no cover is available
    pub cover_image_id: Option<i64>,

    /// Catalog work key (e.g. "/works/OL45804W") when the payload carried one
    pub catalog_key: Option<String>,

    pub source: RecordSource,

    /// Local read status, always `Unread` at creation
    pub status: ReadStatus,
}

impl BookRecord {
    /// Create a freshly normalized record with `status = Unread`
    pub fn new(
        source: RecordSource,
        title: String,
        author_names: Vec<String>,
        first_publish_year: Option<i32>,
        cover_image_id: Option<i64>,
        catalog_key: Option<String>,
    ) -> Self {
        let key = record_key(source, catalog_key.as_deref(), &title, first_publish_year);

        Self {
            key,
            title,
            author_names,
            first_publish_year,
            cover_image_id,
            catalog_key,
            source,
            status: ReadStatus::Unread,
        }
    }

    /// Medium-size cover URL on the default covers host
    pub fn cover_url(&self) -> Option<String> {
        self.cover_url_with_base(DEFAULT_COVERS_BASE_URL)
    }

    /// Medium-size cover URL on a custom covers host
    ///
    /// Returns `None` when the record has no cover id; no placeholder is substituted.
    pub fn cover_url_with_base(&self, covers_base_url: &str) -> Option<String> {
        self.cover_image_id
            .map(|id| cover_url_for(covers_base_url, id))
    }

    /// Authors joined for display, e.g. "Terry Pratchett, Neil Gaiman"
    pub fn author_line(&self) -> String {
        self.author_names.join(", ")
    }

    pub fn is_read(&self) -> bool {
        self.status == ReadStatus::Read
    }

    /// Flip the read status and return the new value
    pub fn toggle_status(&mut self) -> ReadStatus {
        self.status = self.status.toggled();
        self.status
    }
}

/// Build `{base}/b/id/{id}-M.jpg`
pub fn cover_url_for(covers_base_url: &str, cover_image_id: i64) -> String {
    format!(
        "{}/b/id/{}-M.jpg",
        covers_base_url.trim_end_matches('/'),
        cover_image_id
    )
}

/// First 16 hex chars of SHA-256 over `source|catalog_key|title|year`
fn record_key(
    source: RecordSource,
    catalog_key: Option<&str>,
    title: &str,
    first_publish_year: Option<i32>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(catalog_key.unwrap_or("").as_bytes());
    hasher.update(b"|");
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    if let Some(year) = first_publish_year {
        hasher.update(year.to_string().as_bytes());
    }

    let mut key = hex::encode(hasher.finalize());
    key.truncate(KEY_LEN);
    key
}
