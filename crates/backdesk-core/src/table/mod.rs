//! The generic paginated/filterable collection view model.
//!
//! One [`TableSession`] per view composes the filter store, debounced
//! text query, pagination, sort, and selection state, and coordinates
//! fetches against a [`ListSource`]. The column registry and export are
//! orthogonal consumers of the published rows.

pub mod columns;
pub mod filter;
pub mod page;
pub mod selection;
pub mod session;
pub mod sort;

pub use columns::{ColumnLayout, ColumnPref, ColumnSpec, merge_prefs};
pub use filter::{FilterSet, FilterValue};
pub use page::PageRequest;
pub use selection::{SelectionError, SelectionModel, SelectionState};
pub use session::{
    DEFAULT_DEBOUNCE, ListSource, SessionOptions, TableEvent, TableSession, TableSnapshot,
};
pub use sort::SortSpec;
