// ── Sort state ──
//
// Per-column tri-state sort, persisted so it survives restarts.
// Multiple columns may be active at once; the backend receives the
// full mapping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column label -> ascending? Absent means the column is unsorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    columns: IndexMap<String, bool>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the tri-state for a column:
    /// absent -> ascending -> descending -> absent.
    ///
    /// Returns the new state so callers can render an indicator.
    pub fn toggle(&mut self, column: &str) -> Option<bool> {
        match self.columns.get(column).copied() {
            None => {
                self.columns.insert(column.to_owned(), true);
                Some(true)
            }
            Some(true) => {
                self.columns.insert(column.to_owned(), false);
                Some(false)
            }
            Some(false) => {
                self.columns.shift_remove(column);
                None
            }
        }
    }

    /// Set a column's direction directly (used by CLI flags; interactive
    /// header clicks go through [`toggle`](Self::toggle)).
    pub fn set(&mut self, column: impl Into<String>, ascending: bool) {
        self.columns.insert(column.into(), ascending);
    }

    pub fn get(&self, column: &str) -> Option<bool> {
        self.columns.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The full mapping as sent to the backend.
    pub fn to_wire(&self) -> IndexMap<String, bool> {
        self.columns.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tri_state_cycle_has_period_three() {
        let mut s = SortSpec::new();
        assert_eq!(s.toggle("created_at"), Some(true));
        assert_eq!(s.toggle("created_at"), Some(false));
        assert_eq!(s.toggle("created_at"), None);
        assert!(s.is_empty());
    }

    #[test]
    fn multiple_columns_coexist() {
        let mut s = SortSpec::new();
        s.toggle("a");
        s.toggle("b");
        s.toggle("b");
        assert_eq!(s.get("a"), Some(true));
        assert_eq!(s.get("b"), Some(false));
        assert_eq!(s.to_wire().len(), 2);
    }
}
