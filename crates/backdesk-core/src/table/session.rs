// ── Table session: the data fetch coordinator ──
//
// Owns the full state of one paginated/filterable collection view:
// filter criteria, debounced text query, pagination, sort, selection.
// Every input change builds one request descriptor and issues it to the
// list endpoint; results are published through a `watch` channel,
// notifications through an `mpsc` channel.
//
// Responses are generation-tagged. A response whose tag is not the
// latest issued for this session is discarded, so an in-flight request
// superseded by a newer input can never stale-overwrite fresher rows.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use backdesk_api::{BulkScope, ListPage, ListQuery};

use crate::settings::Settings;

use super::filter::{FilterSet, FilterValue};
use super::page::PageRequest;
use super::selection::{SelectionError, SelectionModel, SelectionState};
use super::sort::SortSpec;

/// Quiescence window for the free-text query.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Re-read delays after a bulk mutation. The backend's write-then-read
/// is not immediately consistent, so an immediate refresh is followed by
/// bounded backoff re-reads instead of one arbitrary fixed delay.
const MUTATION_REFRESH_BACKOFF: [Duration; 2] =
    [Duration::from_millis(250), Duration::from_millis(1000)];

/// Something a list endpoint can be asked for a page of rows.
pub trait ListSource: Send + Sync + 'static {
    type Row: Send + Sync + 'static;

    fn fetch(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = Result<ListPage<Self::Row>, backdesk_api::Error>> + Send;
}

/// The published result of the latest completed fetch.
///
/// Replaced wholesale on success. A fetch in flight does not clear the
/// previously displayed rows (stale-while-revalidate); only `loading`
/// flips.
#[derive(Debug)]
pub struct TableSnapshot<T> {
    pub rows: Arc<Vec<T>>,
    pub total_count: u64,
    pub loading: bool,
}

impl<T> Clone for TableSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            total_count: self.total_count,
            loading: self.loading,
        }
    }
}

impl<T> Default for TableSnapshot<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Vec::new()),
            total_count: 0,
            loading: false,
        }
    }
}

impl<T> TableSnapshot<T> {
    /// Pagination label for the given page window, e.g. `"1–8 of 8"`.
    pub fn range_label(&self, page: PageRequest) -> String {
        page.range_label(self.total_count)
    }
}

/// Recoverable events the session reports instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// List fetch failed; previous rows remain displayed.
    FetchFailed { message: String },
    /// A selection mutation would exceed the configured cap.
    SelectionLimit { limit: usize },
}

/// Construction options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub max_selection: Option<usize>,
    pub default_per_page: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            max_selection: None,
            default_per_page: PageRequest::DEFAULT_PER_PAGE,
        }
    }
}

struct TableState {
    filters: FilterSet,
    /// Raw text as typed; may not have propagated yet.
    query_input: String,
    /// Debounced, applied query. `None` when the input is empty.
    query: Option<String>,
    page: PageRequest,
    sort: SortSpec,
    selection: SelectionModel,
}

struct SessionInner<S: ListSource> {
    source: S,
    /// Settings namespace: `"{name}Sorting"`, `"{name}Table"`,
    /// `"{name}PerPage"`.
    name: String,
    settings: Settings,
    state: Mutex<TableState>,
    snapshot: watch::Sender<TableSnapshot<S::Row>>,
    events: mpsc::UnboundedSender<TableEvent>,
    /// Fetch generation counter; responses tagged with an older value
    /// are dropped.
    generation: AtomicU64,
    /// Debounce epoch; a newer keystroke invalidates pending timers.
    query_epoch: AtomicU64,
    cancel: CancellationToken,
    debounce: Duration,
}

/// Handle to one table view's state machine. Cheaply cloneable.
pub struct TableSession<S: ListSource> {
    inner: Arc<SessionInner<S>>,
}

impl<S: ListSource> Clone for TableSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListSource> TableSession<S> {
    /// Create a session. Sort spec and page size are restored from the
    /// settings store; no fetch is issued until [`refresh`](Self::refresh).
    pub fn new(
        source: S,
        name: impl Into<String>,
        settings: Settings,
        options: SessionOptions,
    ) -> (
        Self,
        watch::Receiver<TableSnapshot<S::Row>>,
        mpsc::UnboundedReceiver<TableEvent>,
    ) {
        let name = name.into();
        let sort = settings.load_sorting(&name).unwrap_or_default();
        let per_page = settings
            .load_per_page(&name)
            .unwrap_or(options.default_per_page);

        let (snapshot, snapshot_rx) = watch::channel(TableSnapshot::default());
        let (events, events_rx) = mpsc::unbounded_channel();

        let inner = Arc::new(SessionInner {
            source,
            name,
            settings,
            state: Mutex::new(TableState {
                filters: FilterSet::new(),
                query_input: String::new(),
                query: None,
                page: PageRequest::new(per_page),
                sort,
                selection: SelectionModel::new(options.max_selection),
            }),
            snapshot,
            events,
            generation: AtomicU64::new(0),
            query_epoch: AtomicU64::new(0),
            cancel: CancellationToken::new(),
            debounce: options.debounce,
        });

        (Self { inner }, snapshot_rx, events_rx)
    }

    // ── Filter store (every mutation resets pagination) ──────────────

    pub fn set_filter(&self, field: impl Into<String>, value: FilterValue) {
        {
            let mut st = self.lock();
            st.filters.set(field, value);
            st.page.reset();
        }
        SessionInner::spawn_fetch(&self.inner);
    }

    pub fn remove_filter(&self, field: &str) {
        {
            let mut st = self.lock();
            st.filters.remove(field);
            st.page.reset();
        }
        SessionInner::spawn_fetch(&self.inner);
    }

    pub fn remove_from_list_filter(&self, field: &str, id: &str) {
        {
            let mut st = self.lock();
            st.filters.remove_from_list(field, id);
            st.page.reset();
        }
        SessionInner::spawn_fetch(&self.inner);
    }

    /// Drop every active filter (the "clear all chips" affordance).
    pub fn clear_filters(&self) {
        {
            let mut st = self.lock();
            if !st.filters.is_active() {
                return;
            }
            st.filters = FilterSet::new();
            st.page.reset();
        }
        SessionInner::spawn_fetch(&self.inner);
    }

    // ── Debounced text query ─────────────────────────────────────────

    /// Record a keystroke. The value propagates into the request only
    /// after the debounce window elapses with no further keystrokes; a
    /// new keystroke restarts the timer. Empty text means "no query".
    pub fn set_query_input(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut st = self.lock();
            st.query_input.clone_from(&text);
        }

        let epoch = self.inner.query_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);
        let delay = inner.debounce;
        tokio::spawn(async move {
            tokio::select! {
                () = inner.cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if inner.query_epoch.load(Ordering::SeqCst) != epoch {
                        return; // superseded by a later keystroke
                    }
                    let changed = {
                        let mut st = inner.lock();
                        let applied = if text.is_empty() { None } else { Some(text) };
                        if st.query == applied {
                            false
                        } else {
                            st.query = applied;
                            st.page.reset();
                            true
                        }
                    };
                    if changed {
                        SessionInner::spawn_fetch(&inner);
                    }
                }
            }
        });
    }

    // ── Pagination ───────────────────────────────────────────────────

    pub fn set_page(&self, page: u32) {
        {
            let mut st = self.lock();
            if st.page.page == page {
                return;
            }
            st.page.page = page;
        }
        SessionInner::spawn_fetch(&self.inner);
    }

    /// Change the page size. Persisted immediately; resets to page 0.
    pub fn set_per_page(&self, per_page: u32) {
        {
            let mut st = self.lock();
            st.page = PageRequest::new(per_page);
        }
        self.inner
            .settings
            .save_per_page(&self.inner.name, per_page.max(1));
        SessionInner::spawn_fetch(&self.inner);
    }

    // ── Sort ─────────────────────────────────────────────────────────

    /// Advance the tri-state sort for a column. Persisted immediately;
    /// resets to page 0.
    pub fn toggle_sort(&self, column: &str) -> Option<bool> {
        let (new_state, sort) = {
            let mut st = self.lock();
            let new_state = st.sort.toggle(column);
            st.page.reset();
            (new_state, st.sort.clone())
        };
        self.inner.settings.save_sorting(&self.inner.name, &sort);
        SessionInner::spawn_fetch(&self.inner);
        new_state
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn select_one(&self, id: impl Into<String>) {
        let result = self.lock().selection.select_one(id);
        self.report_selection(result);
    }

    pub fn deselect_one(&self, id: &str) {
        self.lock().selection.deselect_one(id);
    }

    pub fn select_page(&self, ids: Vec<String>) {
        let result = self.lock().selection.select_page(ids);
        self.report_selection(result);
    }

    pub fn deselect_page(&self, ids: &[String]) {
        self.lock()
            .selection
            .deselect_page(ids.iter().map(String::as_str));
    }

    pub fn select_all_matching(&self) {
        self.lock().selection.select_all_matching();
    }

    pub fn set_first_n(&self, n: Option<u32>) {
        self.lock().selection.set_first_n(n);
    }

    pub fn deselect_all(&self) {
        self.lock().selection.deselect_all();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.lock().selection.is_selected(id)
    }

    pub fn selection_count(&self) -> usize {
        self.lock().selection.count()
    }

    pub fn selection_is_empty(&self) -> bool {
        self.lock().selection.is_empty()
    }

    pub fn selection_state(&self, page_ids: &[String]) -> SelectionState {
        self.lock()
            .selection
            .state(page_ids.iter().map(String::as_str))
    }

    /// Derive the bulk mutation target from the current selection and
    /// filter criteria. `None` when nothing is selected.
    pub fn bulk_scope(&self) -> Option<BulkScope> {
        let st = self.lock();
        st.selection.bulk_scope(&st.filters, st.query.as_deref())
    }

    // ── Fetch control ────────────────────────────────────────────────

    /// Manual re-fetch with the current inputs.
    pub fn refresh(&self) {
        SessionInner::spawn_fetch(&self.inner);
    }

    /// Refresh after a bulk mutation: an immediate re-read plus bounded
    /// backoff re-reads, since the backend's write-then-read is not
    /// guaranteed immediately consistent.
    pub fn refresh_after_mutation(&self) {
        SessionInner::spawn_fetch(&self.inner);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            for delay in MUTATION_REFRESH_BACKOFF {
                tokio::select! {
                    () = inner.cancel.cancelled() => return,
                    () = tokio::time::sleep(delay) => SessionInner::spawn_fetch(&inner),
                }
            }
        });
    }

    /// Tear down: cancels pending debounce timers and in-flight fetch
    /// tasks so nothing publishes after the view is gone.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── State accessors (for chips, headers, dialogs) ────────────────

    pub fn filters(&self) -> FilterSet {
        self.lock().filters.clone()
    }

    pub fn active_filters(&self) -> Vec<(String, FilterValue)> {
        self.lock()
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn query(&self) -> Option<String> {
        self.lock().query.clone()
    }

    pub fn query_input(&self) -> String {
        self.lock().query_input.clone()
    }

    pub fn page(&self) -> PageRequest {
        self.lock().page
    }

    pub fn sort(&self) -> SortSpec {
        self.lock().sort.clone()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn lock(&self) -> std::sync::MutexGuard<'_, TableState> {
        self.inner.lock()
    }

    fn report_selection(&self, result: Result<(), SelectionError>) {
        if let Err(SelectionError::LimitExceeded { limit }) = result {
            let _ = self.inner.events.send(TableEvent::SelectionLimit { limit });
        }
    }
}

impl<S: ListSource> SessionInner<S> {
    fn lock(&self) -> std::sync::MutexGuard<'_, TableState> {
        self.state.lock().expect("table state lock poisoned")
    }

    /// Build the request descriptor from the current inputs: 1-based
    /// page, page size, debounced query (omitted when empty), the full
    /// sort mapping (omitted when empty), and all active filters.
    fn build_query(&self) -> ListQuery {
        let st = self.lock();
        ListQuery {
            page: st.page.wire_page(),
            per_page: st.page.per_page,
            q: st.query.clone(),
            sorting: st.sort.to_wire(),
            filters: st.filters.to_wire(),
        }
    }

    fn spawn_fetch(inner: &Arc<Self>) {
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = inner.build_query();
        inner.snapshot.send_modify(|s| s.loading = true);

        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            tokio::select! {
                () = inner.cancel.cancelled() => {}
                result = inner.source.fetch(query) => {
                    if inner.generation.load(Ordering::SeqCst) != generation {
                        debug!(generation, "stale response discarded");
                        return;
                    }
                    match result {
                        Ok(page) => {
                            inner.snapshot.send_modify(|s| {
                                s.rows = Arc::new(page.rows);
                                s.total_count = page.total_count;
                                s.loading = false;
                            });
                        }
                        Err(e) => {
                            // Previous rows stay on screen; only the
                            // loading flag clears.
                            inner.snapshot.send_modify(|s| s.loading = false);
                            let _ = inner.events.send(TableEvent::FetchFailed {
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
        });
    }
}
