//! Reading list store scenarios
//!
//! Drives ReadingListStore through a scripted in-memory CatalogSource so the
//! session behaviour (loading flag, list replacement, failure handling,
//! toggling) can be checked without a network.

use async_trait::async_trait;
use readlog_core::api::CatalogSource;
use readlog_core::library::{
    BookRecord, ListKind, ReadStatus, ReadingListStore, RecordSource,
};
use readlog_core::{ReadLogError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Scripted source: each call pops the next canned result
#[derive(Default)]
struct ScriptedSource {
    log_results: Mutex<VecDeque<Result<Vec<BookRecord>>>>,
    search_results: Mutex<VecDeque<Result<Vec<BookRecord>>>>,
    fetch_calls: AtomicUsize,
    search_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
    /// When set, calls wait for a notification before answering
    gate: Option<Arc<Notify>>,
    /// Like `gate`, but only holds back reading log fetches
    log_gate: Option<Arc<Notify>>,
}

impl ScriptedSource {
    fn with_log(self, result: Result<Vec<BookRecord>>) -> Self {
        self.log_results.lock().unwrap().push_back(result);
        self
    }

    fn with_search(self, result: Result<Vec<BookRecord>>) -> Self {
        self.search_results.lock().unwrap().push_back(result);
        self
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn gated_log(mut self, gate: Arc<Notify>) -> Self {
        self.log_gate = Some(gate);
        self
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch_reading_log(&self, _user_id: &str) -> Result<Vec<BookRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        if let Some(gate) = &self.log_gate {
            gate.notified().await;
        }
        self.log_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<BookRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.wait_gate().await;
        self.search_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Shares the scripted source with the store so call counts stay visible
struct Shared(Arc<ScriptedSource>);

#[async_trait]
impl CatalogSource for Shared {
    async fn fetch_reading_log(&self, user_id: &str) -> Result<Vec<BookRecord>> {
        self.0.fetch_reading_log(user_id).await
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<BookRecord>> {
        self.0.search_by_title(query).await
    }
}

fn logged(count: usize) -> Vec<BookRecord> {
    (0..count)
        .map(|i| {
            BookRecord::new(
                RecordSource::ReadingLog,
                format!("Logged {}", i),
                vec![format!("Author {}", i)],
                Some(1990 + i as i32),
                Some(i as i64),
                None,
            )
        })
        .collect()
}

fn dune() -> BookRecord {
    BookRecord::new(
        RecordSource::Search,
        "Dune".to_string(),
        vec!["Frank Herbert".to_string()],
        Some(1965),
        Some(123),
        None,
    )
}

fn transport_error() -> ReadLogError {
    ReadLogError::network_error("connection reset by peer", true)
}

fn store_for(source: ScriptedSource) -> (ReadingListStore<Shared>, Arc<ScriptedSource>) {
    let source = Arc::new(source);
    let store = ReadingListStore::new(Shared(Arc::clone(&source)), "mekBot");
    (store, source)
}

#[tokio::test]
async fn test_load_initial_caps_reading_log() {
    let (store, _) = store_for(ScriptedSource::default().with_log(Ok(logged(25))));

    store.load_initial().await.unwrap();

    let log = store.reading_log();
    assert_eq!(log.len(), 20);
    assert!(log.iter().all(|r| r.status == ReadStatus::Unread));
    assert_eq!(log[0].title, "Logged 0");
    assert_eq!(log[19].title, "Logged 19");
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_search_dune_scenario() {
    let (store, source) = store_for(ScriptedSource::default().with_search(Ok(vec![dune()])));

    store.set_query("dune");
    store.submit_search().await.unwrap();

    let results = store.search_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Dune");
    assert_eq!(results[0].author_names, vec!["Frank Herbert"]);
    assert_eq!(results[0].first_publish_year, Some(1965));
    assert_eq!(results[0].cover_image_id, Some(123));
    assert_eq!(results[0].status, ReadStatus::Unread);
    assert_eq!(*source.queries.lock().unwrap(), vec!["dune".to_string()]);

    // Toggle twice restores the original status
    assert_eq!(store.toggle_status(ListKind::SearchResults, 0).unwrap(), ReadStatus::Read);
    assert_eq!(store.search_results()[0].status, ReadStatus::Read);
    assert_eq!(store.toggle_status(ListKind::SearchResults, 0).unwrap(), ReadStatus::Unread);
    assert_eq!(store.search_results()[0].status, ReadStatus::Unread);
}

#[tokio::test]
async fn test_empty_query_search_is_noop() {
    let (store, source) = store_for(
        ScriptedSource::default()
            .with_search(Ok(vec![dune()]))
            .with_search(Ok(Vec::new())),
    );

    store.set_query("dune");
    store.submit_search().await.unwrap();
    let before = store.search_results();

    store.set_query("");
    store.submit_search().await.unwrap();

    assert_eq!(store.search_results(), before);
    assert_eq!(source.search_calls.load(Ordering::SeqCst), 1);
    assert!(!store.is_loading());
    assert_eq!(store.active_list_kind(), ListKind::ReadingLog);
}

#[tokio::test]
async fn test_failed_search_keeps_previous_results() {
    let (store, _) = store_for(
        ScriptedSource::default()
            .with_search(Ok(vec![dune()]))
            .with_search(Err(ReadLogError::search_failed("dune messiah", transport_error()))),
    );

    store.set_query("dune");
    store.submit_search().await.unwrap();
    store.toggle_status(ListKind::SearchResults, 0).unwrap();
    let before = store.search_results();

    store.set_query("dune messiah");
    let err = store.submit_search().await.unwrap_err();

    assert!(matches!(err, ReadLogError::SearchFailed { .. }));
    assert!(!store.is_loading());
    assert_eq!(store.search_results(), before);
    assert!(store.last_error().unwrap().contains("dune messiah"));
}

#[tokio::test]
async fn test_failed_load_keeps_previous_log_and_allows_retry() {
    let (store, source) = store_for(
        ScriptedSource::default()
            .with_log(Err(ReadLogError::fetch_failed("mekBot", transport_error())))
            .with_log(Ok(logged(2))),
    );

    assert!(store.load_initial().await.is_err());
    assert!(store.reading_log().is_empty());
    assert!(!store.is_loading());
    assert!(store.last_error().is_some());

    store.load_initial().await.unwrap();
    assert_eq!(store.reading_log().len(), 2);
    assert_eq!(store.last_error(), None);
    assert_eq!(source.fetch_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_new_search_replaces_results_wholesale() {
    let (store, _) = store_for(
        ScriptedSource::default()
            .with_search(Ok(vec![dune(), dune()]))
            .with_search(Ok(vec![dune()])),
    );

    store.set_query("dune");
    store.submit_search().await.unwrap();
    store.toggle_status(ListKind::SearchResults, 1).unwrap();

    store.submit_search().await.unwrap();
    let results = store.search_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, ReadStatus::Unread);

    // Index 1 belonged to the replaced list
    let err = store.toggle_status(ListKind::SearchResults, 1).unwrap_err();
    assert!(matches!(
        err,
        ReadLogError::IndexOutOfRange { list: ListKind::SearchResults, index: 1, len: 1 }
    ));
}

#[tokio::test]
async fn test_out_of_range_toggle_leaves_lists_unchanged() {
    let (store, _) = store_for(
        ScriptedSource::default()
            .with_log(Ok(logged(3)))
            .with_search(Ok(vec![dune()])),
    );
    store.load_initial().await.unwrap();
    store.set_query("dune");
    store.submit_search().await.unwrap();
    let before = store.snapshot();

    assert!(store.toggle_status(ListKind::ReadingLog, 3).unwrap_err().is_index_error());
    assert!(store.toggle_status(ListKind::SearchResults, 7).unwrap_err().is_index_error());

    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn test_set_query_does_not_fetch() {
    let (store, source) = store_for(ScriptedSource::default());

    store.set_query("d");
    store.set_query("du");
    store.set_query("dune");

    assert_eq!(store.query(), "dune");
    assert_eq!(source.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.active_list_kind(), ListKind::SearchResults);
    assert!(store.active_list().is_empty());
}

#[tokio::test]
async fn test_loading_visible_while_request_in_flight() {
    let gate = Arc::new(Notify::new());
    let (store, source) = store_for(
        ScriptedSource::default()
            .with_log(Ok(logged(1)))
            .gated(Arc::clone(&gate)),
    );

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.load_initial().await }
    });

    while source.fetch_calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    assert!(store.is_loading());

    gate.notify_one();
    task.await.unwrap().unwrap();

    assert!(!store.is_loading());
    assert_eq!(store.reading_log().len(), 1);
}

#[tokio::test]
async fn test_loading_held_until_overlapping_requests_finish() {
    let gate = Arc::new(Notify::new());
    let (store, source) = store_for(
        ScriptedSource::default()
            .with_log(Ok(logged(3)))
            .with_search(Ok(vec![dune()]))
            .gated_log(Arc::clone(&gate)),
    );

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.load_initial().await }
    });

    while source.fetch_calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    store.set_query("dune");
    store.submit_search().await.unwrap();

    // The reading log fetch is still parked on the gate
    assert_eq!(store.search_results(), vec![dune()]);
    assert!(store.is_loading());

    gate.notify_one();
    task.await.unwrap().unwrap();

    assert!(!store.is_loading());
    assert_eq!(store.reading_log().len(), 3);
}

#[tokio::test]
async fn test_toggles_on_one_list_do_not_touch_the_other() {
    let (store, _) = store_for(
        ScriptedSource::default()
            .with_log(Ok(logged(2)))
            .with_search(Ok(vec![dune()])),
    );
    store.load_initial().await.unwrap();
    store.set_query("dune");
    store.submit_search().await.unwrap();

    store.toggle_status(ListKind::ReadingLog, 1).unwrap();

    assert_eq!(store.reading_log()[1].status, ReadStatus::Read);
    assert_eq!(store.reading_log()[0].status, ReadStatus::Unread);
    assert_eq!(store.search_results()[0].status, ReadStatus::Unread);
}
