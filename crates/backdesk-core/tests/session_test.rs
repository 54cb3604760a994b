#![allow(clippy::unwrap_used)]
// Table session behavior under virtual time: debounce, page-reset
// invariants, out-of-order response discard, failure handling, and the
// post-mutation backoff refresh. The list endpoint is a scripted stub
// so every timing assertion runs against tokio's paused clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use backdesk_api::{ListPage, ListQuery};
use backdesk_core::table::{
    FilterValue, ListSource, SessionOptions, TableEvent, TableSession, TableSnapshot,
};
use backdesk_core::{MemorySettings, Settings};
use tokio::sync::{mpsc, watch};

// ── Scripted list source ────────────────────────────────────────────

type ScriptEntry = (Duration, Result<ListPage<String>, backdesk_api::Error>);

#[derive(Clone, Default)]
struct StubSource {
    inner: Arc<StubInner>,
}

#[derive(Default)]
struct StubInner {
    queries: Mutex<Vec<ListQuery>>,
    script: Mutex<VecDeque<ScriptEntry>>,
}

impl StubSource {
    fn push_ok(&self, delay: Duration, rows: &[&str], total: u64) {
        self.inner.script.lock().unwrap().push_back((
            delay,
            Ok(ListPage {
                rows: rows.iter().map(|s| (*s).to_owned()).collect(),
                total_count: total,
            }),
        ));
    }

    fn push_err(&self, delay: Duration, message: &str) {
        self.inner.script.lock().unwrap().push_back((
            delay,
            Err(backdesk_api::Error::Api {
                message: message.to_owned(),
                status: 500,
            }),
        ));
    }

    fn queries(&self) -> Vec<ListQuery> {
        self.inner.queries.lock().unwrap().clone()
    }
}

impl ListSource for StubSource {
    type Row = String;

    fn fetch(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListPage<String>, backdesk_api::Error>> + Send {
        let inner = Arc::clone(&self.inner);
        async move {
            inner.queries.lock().unwrap().push(query);
            let (delay, result) = inner.script.lock().unwrap().pop_front().unwrap_or((
                Duration::ZERO,
                Ok(ListPage {
                    rows: Vec::new(),
                    total_count: 0,
                }),
            ));
            tokio::time::sleep(delay).await;
            result
        }
    }
}

type Harness = (
    StubSource,
    TableSession<StubSource>,
    watch::Receiver<TableSnapshot<String>>,
    mpsc::UnboundedReceiver<TableEvent>,
);

fn harness(options: SessionOptions) -> Harness {
    let stub = StubSource::default();
    let settings = Settings::new(Arc::new(MemorySettings::default()));
    let (session, snap_rx, events_rx) =
        TableSession::new(stub.clone(), "test", settings, options);
    (stub, session, snap_rx, events_rx)
}

/// Let spawned timers/tasks run without advancing the clock.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

async fn advance(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

// ── Debounce ────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn debounce_propagates_last_value_once_after_quiescence() {
    let (stub, session, _snap, _events) = harness(SessionOptions::default());

    // Keystrokes at t=0, t=100ms, t=150ms with a 300ms window.
    session.set_query_input("f");
    advance(100).await;
    session.set_query_input("fr");
    advance(50).await;
    session.set_query_input("fraud");

    // Nothing propagates before t=450ms.
    advance(299).await;
    assert!(stub.queries().is_empty());

    // Exactly one propagation, carrying the last value.
    advance(1).await;
    let queries = stub.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].q.as_deref(), Some("fraud"));

    // And it stays at one.
    advance(1000).await;
    assert_eq!(stub.queries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_query_is_omitted_not_sent_blank() {
    let (stub, session, _snap, _events) = harness(SessionOptions::default());

    session.set_query_input("x");
    advance(301).await;
    assert_eq!(stub.queries().len(), 1);

    session.set_query_input("");
    advance(301).await;

    let queries = stub.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].q, None);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_debounce() {
    let (stub, session, _snap, _events) = harness(SessionOptions::default());

    session.set_query_input("fraud");
    advance(100).await;
    session.shutdown();
    advance(1000).await;

    assert!(stub.queries().is_empty());
}

// ── Page-reset invariants ───────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn filter_mutations_reset_to_page_zero() {
    let (stub, session, _snap, _events) = harness(SessionOptions::default());

    session.set_page(3);
    advance(1).await;
    assert_eq!(stub.queries().last().unwrap().page, 4); // 1-based wire

    session.set_filter("status", FilterValue::Text("open".into()));
    advance(1).await;
    let last = stub.queries().last().unwrap().clone();
    assert_eq!(last.page, 1);
    assert_eq!(session.page().page, 0);

    session.set_page(5);
    advance(1).await;
    session.remove_filter("status");
    advance(1).await;
    assert_eq!(stub.queries().last().unwrap().page, 1);
}

#[tokio::test(start_paused = true)]
async fn sort_toggle_resets_page_and_sends_full_mapping() {
    let (stub, session, _snap, _events) = harness(SessionOptions::default());

    session.set_page(2);
    advance(1).await;

    session.toggle_sort("created_at");
    advance(1).await;
    let last = stub.queries().last().unwrap().clone();
    assert_eq!(last.page, 1);
    assert_eq!(last.sorting.get("created_at"), Some(&true));

    session.toggle_sort("created_at");
    advance(1).await;
    assert_eq!(
        stub.queries().last().unwrap().sorting.get("created_at"),
        Some(&false)
    );

    session.toggle_sort("created_at");
    advance(1).await;
    assert!(stub.queries().last().unwrap().sorting.is_empty());
}

// ── Out-of-order responses ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn stale_response_cannot_overwrite_newer_rows() {
    let (stub, session, snap, _events) = harness(SessionOptions::default());

    // First request is slow, second supersedes it and returns fast.
    stub.push_ok(Duration::from_millis(500), &["stale"], 1);
    stub.push_ok(Duration::from_millis(10), &["fresh"], 1);

    session.refresh();
    settle().await;
    session.refresh();
    settle().await;

    // Let both complete; the slow one resolves last.
    advance(600).await;

    let snapshot = snap.borrow().clone();
    assert_eq!(*snapshot.rows, vec!["fresh".to_owned()]);
    assert!(!snapshot.loading);
}

// ── Failure handling ────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn fetch_failure_keeps_previous_rows_and_notifies() {
    let (stub, session, snap, mut events) = harness(SessionOptions::default());

    stub.push_ok(Duration::ZERO, &["a", "b"], 2);
    session.refresh();
    advance(1).await;
    assert_eq!(snap.borrow().rows.len(), 2);

    stub.push_err(Duration::ZERO, "backend exploded");
    session.refresh();
    advance(1).await;

    let snapshot = snap.borrow().clone();
    assert_eq!(snapshot.rows.len(), 2);
    assert!(!snapshot.loading);

    match events.try_recv() {
        Ok(TableEvent::FetchFailed { message }) => {
            assert!(message.contains("backend exploded"), "got: {message}");
        }
        other => panic!("expected FetchFailed, got: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn selection_cap_reports_recoverable_event() {
    let (_stub, session, _snap, mut events) = harness(SessionOptions {
        max_selection: Some(2),
        ..SessionOptions::default()
    });

    session.select_page(vec!["a".into(), "b".into()]);
    session.select_one("c");
    settle().await;

    assert_eq!(session.selection_count(), 2);
    assert_eq!(
        events.try_recv().ok(),
        Some(TableEvent::SelectionLimit { limit: 2 })
    );
}

// ── Post-mutation refresh ───────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn refresh_after_mutation_re_reads_with_backoff() {
    let (stub, session, _snap, _events) = harness(SessionOptions::default());

    session.refresh_after_mutation();
    settle().await;
    assert_eq!(stub.queries().len(), 1); // immediate re-read

    advance(250).await;
    assert_eq!(stub.queries().len(), 2);

    advance(1000).await;
    assert_eq!(stub.queries().len(), 3);

    advance(5000).await;
    assert_eq!(stub.queries().len(), 3); // bounded
}

// ── Settings persistence ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn sort_and_per_page_survive_a_new_session() {
    let settings = Settings::new(Arc::new(MemorySettings::default()));

    let stub = StubSource::default();
    let (session, _snap, _events) = TableSession::new(
        stub.clone(),
        "test",
        settings.clone(),
        SessionOptions::default(),
    );
    session.toggle_sort("score");
    session.set_per_page(50);
    advance(1).await;

    let stub2 = StubSource::default();
    let (session2, _snap2, _events2) =
        TableSession::new(stub2.clone(), "test", settings, SessionOptions::default());
    session2.refresh();
    advance(1).await;

    let q = stub2.queries().last().unwrap().clone();
    assert_eq!(q.sorting.get("score"), Some(&true));
    assert_eq!(q.per_page, 50);
}
