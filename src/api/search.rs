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


//! Catalog title search
//!
//! **Endpoint:** `GET https://openlibrary.org/search.json?q={query}`
//!
//! Documents are flat, and use different field names than the reading log
//! (`author_name`, `cover_i`). Every returned document is kept; no paging
//! parameters are sent.

use crate::api::client::CatalogClient;
use crate::api::reading_log::null_as_empty;
use crate::error::{ReadLogError, Result};
use crate::library::models::{BookRecord, RecordSource};
use serde::Deserialize;
use tracing::debug;

pub const SEARCH_ENDPOINT: &str = "/search.json";

/// Search response container
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Total hits in the catalog (may exceed `docs.len()`)
    #[serde(default)]
    pub num_found: Option<u64>,

    /// Older spelling of `num_found`; the catalog still sends both
    #[serde(default, rename = "numFound")]
    pub num_found_legacy: Option<u64>,

    #[serde(default)]
    pub start: Option<u64>,

    /// Matching documents in relevance order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub docs: Vec<SearchDoc>,
}

impl SearchResponse {
    pub fn total_hits(&self) -> Option<u64> {
        self.num_found.or(self.num_found_legacy)
    }
}

/// One search hit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDoc {
    #[serde(default)]
    pub title: Option<String>,

    /// Work key, e.g. "/works/OL893415W"
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub author_name: Option<Vec<String>>,

    #[serde(default)]
    pub first_publish_year: Option<i32>,

    #[serde(default)]
    pub cover_i: Option<i64>,
}

impl SearchDoc {
    /// Normalize into the unified model (`status = Unread`)
    pub fn into_record(self) -> BookRecord {
        BookRecord::new(
            RecordSource::Search,
            self.title.unwrap_or_default(),
            self.author_name.unwrap_or_default(),
            self.first_publish_year,
            self.cover_i,
            self.key,
        )
    }
}

/// Search results together with the catalog's total hit count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub records: Vec<BookRecord>,
    pub num_found: Option<u64>,
}

/// One unread record per document, in server order
pub fn normalize_search(response: SearchResponse) -> Vec<BookRecord> {
    response
        .docs
        .into_iter()
        .map(SearchDoc::into_record)
        .collect()
}

impl CatalogClient {
    /// Search the catalog by free text and normalize every returned document
    ///
    /// # Errors
    /// Returns `SearchFailed` wrapping the transport, status or parse error.
    pub async fn search_by_title(&self, query: &str) -> Result<Vec<BookRecord>> {
        Ok(self.search(query).await?.records)
    }

    /// Like [`search_by_title`](Self::search_by_title), also reporting `num_found`
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let response: SearchResponse = self
            .get_with_query(SEARCH_ENDPOINT, &[("q", query)])
            .await
            .map_err(|e| ReadLogError::search_failed(query, e))?;

        let num_found = response.total_hits();
        let records = normalize_search(response);
        debug!(query, returned = records.len(), ?num_found, "search normalized");

        Ok(SearchOutcome { records, num_found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::models::ReadStatus;

    fn parse(json: &str) -> SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_dune() {
        let response = parse(
            r#"{
                "numFound": 1,
                "start": 0,
                "docs": [
                    {
                        "key": "/works/OL893415W",
                        "title": "Dune",
                        "author_name": ["Frank Herbert"],
                        "first_publish_year": 1965,
                        "cover_i": 123,
                        "edition_count": 120
                    }
                ]
            }"#,
        );
        assert_eq!(response.total_hits(), Some(1));

        let records = normalize_search(response);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Dune");
        assert_eq!(records[0].author_names, vec!["Frank Herbert"]);
        assert_eq!(records[0].first_publish_year, Some(1965));
        assert_eq!(records[0].cover_image_id, Some(123));
        assert_eq!(records[0].source, RecordSource::Search);
        assert_eq!(records[0].status, ReadStatus::Unread);
    }

    #[test]
    fn test_normalize_preserves_order_and_count() {
        let response = parse(
            r#"{"num_found": 3, "docs": [
                {"title": "Dune Messiah"},
                {"title": "Dune"},
                {"title": "Children of Dune", "cover_i": null}
            ]}"#,
        );

        let titles: Vec<String> = normalize_search(response)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Dune Messiah", "Dune", "Children of Dune"]);
    }

    #[test]
    fn test_both_hit_count_spellings_accepted() {
        let response = parse(r#"{"numFound": 42, "num_found": 42, "docs": []}"#);
        assert_eq!(response.total_hits(), Some(42));
    }

    #[test]
    fn test_doc_without_title_still_normalizes() {
        let records = normalize_search(parse(r#"{"docs": [{"cover_i": 7}]}"#));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].cover_image_id, Some(7));
        assert!(records[0].author_names.is_empty());
    }

    #[test]
    fn test_empty_docs() {
        assert!(normalize_search(parse(r#"{"numFound": 0, "docs": []}"#)).is_empty());
        assert!(normalize_search(parse("{}")).is_empty());
    }
}
