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

//! Session state for the reading list screen
//!
//! [`ReadingListStore`] owns the reading log, the latest search results, the
//! active query and the loading flag. The presentation layer drives it:
//!
//! - `load_initial()` once at mount
//! - `set_query(text)` on every keystroke
//! - `submit_search()` on enter / search icon
//! - `toggle_status(list, index)` on a row's status button
//!
//! # Concurrency
//! Network calls suspend the caller. The state lock is only held for the
//! short synchronous updates before and after a call, so a UI holding a
//! clone of the store can read `loading` while a request is in flight.
//! Overlapping requests are not serialized: whichever response lands last
//! replaces its list. `loading` stays set until every outstanding request
//! has answered.
//!
//! # Failure policy
//! Fetch and search failures are logged and recorded in `last_error`; the
//! previously loaded list stays in place and the request no longer counts
//! towards `loading`.
//! The store never retries on its own.

use crate::api::client::{CatalogClient, CatalogConfig, READING_LOG_LIMIT};
use crate::api::source::CatalogSource;
use crate::error::{ReadLogError, Result};
use crate::library::models::{BookRecord, ListKind, ReadStatus};
use crate::library::view;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

// ============================================================================
// STATE
// ============================================================================

/// Everything the reading list screen renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingListState {
    /// Already-read shelf, server order, capped
    pub reading_log: Vec<BookRecord>,

    /// Hits of the last successful search, relevance order
    pub search_results: Vec<BookRecord>,

    /// Active search text; empty shows the reading log
    pub query: String,

    /// At least one fetch or search is in flight
    pub loading: bool,

    /// Requests awaiting a response; `loading` mirrors `in_flight > 0`
    #[serde(skip)]
    pub(crate) in_flight: usize,

    /// Set once the reading log has been loaded successfully
    pub reading_log_loaded: bool,

    /// Message of the most recent failed fetch or search
    pub last_error: Option<String>,
}

impl ReadingListState {
    pub fn list(&self, kind: ListKind) -> &[BookRecord] {
        match kind {
            ListKind::ReadingLog => &self.reading_log,
            ListKind::SearchResults => &self.search_results,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<BookRecord> {
        match kind {
            ListKind::ReadingLog => &mut self.reading_log,
            ListKind::SearchResults => &mut self.search_results,
        }
    }

    pub fn active_list_kind(&self) -> ListKind {
        view::active_list_kind(&self.query)
    }

    fn begin_request(&mut self) {
        self.in_flight += 1;
        self.loading = true;
    }

    fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    /// Flip the status of `list[index]` in place
    ///
    /// # Errors
    /// `IndexOutOfRange` if `index` is past the end of `list`; nothing changes.
    pub fn toggle_status(&mut self, kind: ListKind, index: usize) -> Result<ReadStatus> {
        let list = self.list_mut(kind);
        let len = list.len();

        list.get_mut(index)
            .map(BookRecord::toggle_status)
            .ok_or(ReadLogError::IndexOutOfRange {
                list: kind,
                index,
                len,
            })
    }

    /// Flip the status of the first record carrying `key`
    ///
    /// The reading log is searched before the search results.
    pub fn toggle_status_by_key(&mut self, key: &str) -> Result<(ListKind, ReadStatus)> {
        for kind in [ListKind::ReadingLog, ListKind::SearchResults] {
            if let Some(record) = self.list_mut(kind).iter_mut().find(|r| r.key == key) {
                return Ok((kind, record.toggle_status()));
            }
        }

        Err(ReadLogError::RecordNotFound(key.to_string()))
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Single-session owner of the reading list state
///
/// Cloning the store yields another handle to the same session.
///
/// # Example
/// ```rust,no_run
/// use readlog_core::library::{ListKind, ReadingListStore};
///
/// # async fn example() -> readlog_core::error::Result<()> {
/// let store = ReadingListStore::from_config(Default::default())?;
/// store.load_initial().await?;
///
/// store.set_query("dune");
/// store.submit_search().await?;
/// store.toggle_status(ListKind::SearchResults, 0)?;
/// # Ok(())
/// # }
/// ```
pub struct ReadingListStore<S> {
    source: Arc<S>,
    user_id: String,
    reading_log_limit: usize,
    state: Arc<RwLock<ReadingListState>>,
}

impl<S> Clone for ReadingListStore<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            user_id: self.user_id.clone(),
            reading_log_limit: self.reading_log_limit,
            state: Arc::clone(&self.state),
        }
    }
}

impl ReadingListStore<CatalogClient> {
    /// Store backed by a real catalog client built from `config`
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        let user_id = config.user_id.clone();
        let limit = config.reading_log_limit;
        let client = CatalogClient::with_config(config)?;

        Ok(Self::new(client, user_id).with_reading_log_limit(limit))
    }
}

impl<S: CatalogSource> ReadingListStore<S> {
    pub fn new<U: Into<String>>(source: S, user_id: U) -> Self {
        Self {
            source: Arc::new(source),
            user_id: user_id.into(),
            reading_log_limit: READING_LOG_LIMIT,
            state: Arc::new(RwLock::new(ReadingListState::default())),
        }
    }

    pub fn with_reading_log_limit(mut self, limit: usize) -> Self {
        self.reading_log_limit = limit;
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    // ===== Network-backed operations =====

    /// Load the reading log for the configured user
    ///
    /// Runs once per session: after a successful load further calls return
    /// immediately. On failure the previous (possibly empty) reading log is
    /// kept and the error is returned after `loading` has been cleared.
    pub async fn load_initial(&self) -> Result<()> {
        {
            let mut state = self.write();
            if state.reading_log_loaded {
                debug!(user_id = %self.user_id, "reading log already loaded");
                return Ok(());
            }
            state.begin_request();
        }

        let result = self.source.fetch_reading_log(&self.user_id).await;

        let mut state = self.write();
        state.finish_request();

        match result {
            Ok(mut records) => {
                records.truncate(self.reading_log_limit);
                info!(user_id = %self.user_id, count = records.len(), "reading log loaded");

                state.reading_log = records;
                state.reading_log_loaded = true;
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %self.user_id, error = %e, "reading log fetch failed");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Set the active search text; never touches the network
    pub fn set_query<Q: Into<String>>(&self, text: Q) {
        self.write().query = text.into();
    }

    /// Search the catalog for the active query
    ///
    /// An empty query is a no-op. On success the search results are replaced
    /// wholesale; on failure they are left as they were.
    pub async fn submit_search(&self) -> Result<()> {
        let query = {
            let mut state = self.write();
            if state.query.is_empty() {
                debug!("empty query, search skipped");
                return Ok(());
            }
            state.begin_request();
            state.query.clone()
        };

        let result = self.source.search_by_title(&query).await;

        let mut state = self.write();
        state.finish_request();

        match result {
            Ok(records) => {
                info!(query = %query, count = records.len(), "search results loaded");
                state.search_results = records;
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(query = %query, error = %e, "search failed");
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ===== Local operations =====

    /// Flip a record's status between Read and Unread
    ///
    /// # Errors
    /// `IndexOutOfRange` when `index` does not address a record of `list`,
    /// typically a stale index from a list that has since been replaced.
    pub fn toggle_status(&self, list: ListKind, index: usize) -> Result<ReadStatus> {
        let result = self.write().toggle_status(list, index);
        if let Err(ref e) = result {
            error!(error = %e, "toggle addressed a missing record");
        }
        result
    }

    /// Toggle within whichever list is currently displayed
    pub fn toggle_active(&self, index: usize) -> Result<ReadStatus> {
        let list = self.active_list_kind();
        self.toggle_status(list, index)
    }

    /// Toggle the record with the given synthetic key
    pub fn toggle_status_by_key(&self, key: &str) -> Result<ReadStatus> {
        match self.write().toggle_status_by_key(key) {
            Ok((_, status)) => Ok(status),
            Err(e) => {
                error!(error = %e, "toggle addressed a missing record");
                Err(e)
            }
        }
    }

    // ===== Readers =====

    pub fn snapshot(&self) -> ReadingListState {
        self.read().clone()
    }

    pub fn reading_log(&self) -> Vec<BookRecord> {
        self.read().reading_log.clone()
    }

    pub fn search_results(&self) -> Vec<BookRecord> {
        self.read().search_results.clone()
    }

    pub fn query(&self) -> String {
        self.read().query.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    pub fn active_list_kind(&self) -> ListKind {
        self.read().active_list_kind()
    }

    /// Copy of the list the display layer should render
    pub fn active_list(&self) -> Vec<BookRecord> {
        view::active_list(&self.read()).to_vec()
    }

    // Updates are short and never panic halfway, so a poisoned lock still
    // holds consistent state.
    fn read(&self) -> RwLockReadGuard<'_, ReadingListState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ReadingListState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
