//! State model and business logic between `backdesk-api` and the UI
//! front-ends (CLI / TUI).
//!
//! This crate owns the generic paginated/filterable collection view
//! pattern the Backdesk console repeats across its list screens:
//!
//! - **[`TableSession`]** -- per-view coordinator composing the filter
//!   store, debounced text query, pagination, sort, and selection state.
//!   Every input change builds one request descriptor, issues it to a
//!   [`ListSource`], and publishes the result through a `watch` channel.
//!   Responses are generation-tagged so a superseded request can never
//!   stale-overwrite newer rows.
//!
//! - **[`SelectionModel`]** -- which rows a bulk action targets,
//!   including the "all rows matching the current filter" mode that
//!   never enumerates ids on the client.
//!
//! - **[`ColumnLayout`]** -- the ordered, user-customizable column
//!   registry shared by table rendering and CSV export, with stale
//!   per-device layouts silently discarded.
//!
//! - **[`Settings`]** -- injected device-local key-value storage for
//!   sort specs, column layouts, and page sizes.
//!
//! - **[`bulk`]** -- label set-diffing and bulk mutation helpers
//!   (at most two batch calls per label change), plus confirmation-gate
//!   text for broad-impact scopes.

pub mod bulk;
pub mod error;
pub mod export;
pub mod recent;
pub mod settings;
pub mod sources;
pub mod table;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use recent::RecentActions;
pub use settings::{JsonFileSettings, MemorySettings, Settings, SettingsStore};
pub use sources::{ComplianceSource, CustomerSource, RewardSource};
pub use table::{
    ColumnLayout, ColumnPref, ColumnSpec, FilterSet, FilterValue, ListSource, PageRequest,
    SelectionModel, SelectionState, SessionOptions, SortSpec, TableEvent, TableSession,
    TableSnapshot,
};

// Re-export the wire-level types consumers handle directly.
pub use backdesk_api::{
    Announcement, BulkScope, ComplianceRecord, CustomerRecord, Label, LabelAction, ListPage,
    ListQuery, RewardRecord,
};
