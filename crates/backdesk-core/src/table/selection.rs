// ── Selection model ──
//
// Tracks which rows a bulk action targets. Two modes: an enumerated id
// set, or "all rows matching the current filters" where the client never
// holds the ids. Cap violations are recoverable -- they surface through
// a Result the session converts into a notification event, never a panic.

use std::collections::BTreeSet;

use backdesk_api::BulkScope;

use super::filter::FilterSet;

/// Global selection state, as a table view reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoneSelected,
    /// Some rows selected, but not every id on the current page.
    PartiallySelected,
    /// Every id on the current page is selected.
    PageSelected,
    /// The "all rows matching the filter" flag is set.
    AllMatchingSelected,
}

/// A selection mutation that could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// Applying the operation would exceed the configured cap.
    LimitExceeded { limit: usize },
}

/// The selection of one table view.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: BTreeSet<String>,
    select_all_matching: bool,
    /// Ids explicitly deselected while in all-matching mode. Not sent on
    /// the wire; used so the UI can uncheck rows without dropping the mode.
    excluded: BTreeSet<String>,
    /// Narrow the all-matching target to the first N rows of the current
    /// filtered order, without enumerating them.
    first_n: Option<u32>,
    /// Hard cap on enumerated selections (e.g. bulk ops limited to 5000).
    max_selection: Option<usize>,
}

impl SelectionModel {
    pub fn new(max_selection: Option<usize>) -> Self {
        Self {
            max_selection,
            ..Self::default()
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn select_one(&mut self, id: impl Into<String>) -> Result<(), SelectionError> {
        let id = id.into();
        if self.select_all_matching {
            self.excluded.remove(&id);
            return Ok(());
        }
        self.check_capacity(1)?;
        self.selected.insert(id);
        Ok(())
    }

    pub fn deselect_one(&mut self, id: &str) {
        if self.select_all_matching {
            self.excluded.insert(id.to_owned());
        } else {
            self.selected.remove(id);
        }
    }

    /// Add every id on the current page (dedup against existing).
    pub fn select_page<I, S>(&mut self, ids: I) -> Result<(), SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let incoming: Vec<String> = ids.into_iter().map(Into::into).collect();
        let new = incoming
            .iter()
            .filter(|id| !self.selected.contains(*id))
            .count();
        self.check_capacity(new)?;
        self.selected.extend(incoming);
        Ok(())
    }

    /// Remove every id on the current page.
    pub fn deselect_page<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            self.selected.remove(id);
            self.excluded.remove(id);
        }
        // Dropping the page while in all-matching mode leaves the flag
        // meaningless from the user's view -- clear it.
        if self.select_all_matching {
            self.select_all_matching = false;
            self.excluded.clear();
        }
    }

    /// Switch to "all rows matching the filter" mode. Never enumerates ids.
    pub fn select_all_matching(&mut self) {
        self.select_all_matching = true;
        self.selected.clear();
        self.excluded.clear();
    }

    /// Narrow the all-matching target to the first N filtered rows.
    pub fn set_first_n(&mut self, n: Option<u32>) {
        self.first_n = n;
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
        self.excluded.clear();
        self.select_all_matching = false;
        self.first_n = None;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_empty(&self) -> bool {
        !self.select_all_matching && self.selected.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        if self.select_all_matching {
            !self.excluded.contains(id)
        } else {
            self.selected.contains(id)
        }
    }

    /// Number of enumerated ids (meaningless in all-matching mode).
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn all_matching(&self) -> bool {
        self.select_all_matching
    }

    pub fn first_n(&self) -> Option<u32> {
        self.first_n
    }

    /// Global state relative to the ids visible on the current page.
    pub fn state<'a, I>(&self, page_ids: I) -> SelectionState
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.select_all_matching {
            return SelectionState::AllMatchingSelected;
        }
        if self.selected.is_empty() {
            return SelectionState::NoneSelected;
        }
        let mut any = false;
        let mut all = true;
        for id in page_ids {
            any = true;
            if !self.selected.contains(id) {
                all = false;
            }
        }
        if any && all {
            SelectionState::PageSelected
        } else {
            SelectionState::PartiallySelected
        }
    }

    /// Derive the bulk mutation target.
    ///
    /// All-matching mode carries the filters and text query so the backend
    /// resolves the row set; otherwise the enumerated ids go out. Returns
    /// `None` when nothing is selected.
    pub fn bulk_scope(&self, filters: &FilterSet, q: Option<&str>) -> Option<BulkScope> {
        if self.select_all_matching {
            return Some(BulkScope::AllMatching {
                select_all: true,
                q: q.map(ToOwned::to_owned),
                filters: filters.to_wire(),
                first_n: self.first_n,
            });
        }
        if self.selected.is_empty() {
            return None;
        }
        Some(BulkScope::Ids {
            ids: self.selected.iter().cloned().collect(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn check_capacity(&self, additional: usize) -> Result<(), SelectionError> {
        if let Some(limit) = self.max_selection {
            if self.selected.len() + additional > limit {
                return Err(SelectionError::LimitExceeded { limit });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn select_then_deselect_page_empties_selection() {
        let mut sel = SelectionModel::new(None);
        sel.select_page(ids(&["a", "b", "c"])).unwrap();
        assert_eq!(sel.state(["a", "b", "c"]), SelectionState::PageSelected);

        sel.deselect_page(["a", "b", "c"]);
        assert!(sel.is_empty());
        assert!(!sel.all_matching());
        assert_eq!(sel.state(["a", "b", "c"]), SelectionState::NoneSelected);
    }

    #[test]
    fn select_page_dedups() {
        let mut sel = SelectionModel::new(None);
        sel.select_one("a").unwrap();
        sel.select_page(ids(&["a", "b"])).unwrap();
        assert_eq!(sel.count(), 2);
    }

    #[test]
    fn cap_is_recoverable_and_leaves_state_intact() {
        let mut sel = SelectionModel::new(Some(2));
        sel.select_page(ids(&["a", "b"])).unwrap();

        let err = sel.select_one("c").unwrap_err();
        assert_eq!(err, SelectionError::LimitExceeded { limit: 2 });
        assert_eq!(sel.count(), 2);
    }

    #[test]
    fn all_matching_ignores_enumerated_ids() {
        let mut sel = SelectionModel::new(None);
        sel.select_page(ids(&["a", "b"])).unwrap();
        sel.select_all_matching();

        assert_eq!(sel.count(), 0);
        assert!(sel.is_selected("zzz"));

        sel.deselect_one("zzz");
        assert!(!sel.is_selected("zzz"));
        assert!(sel.all_matching());
    }

    #[test]
    fn bulk_scope_all_matching_carries_filters_not_ids() {
        use crate::table::filter::{FilterSet, FilterValue};

        let mut sel = SelectionModel::new(None);
        sel.select_all_matching();
        sel.set_first_n(Some(100));

        let mut filters = FilterSet::new();
        filters.set("status", FilterValue::Text("active".into()));

        let scope = sel.bulk_scope(&filters, Some("fraud")).unwrap();
        let wire = serde_json::to_value(&scope).unwrap();
        assert_eq!(wire["select_all"], true);
        assert_eq!(wire["q"], "fraud");
        assert_eq!(wire["status"], "active");
        assert_eq!(wire["first_n"], 100);
        assert!(wire.get("ids").is_none());
    }

    #[test]
    fn bulk_scope_empty_selection_is_none() {
        let sel = SelectionModel::new(None);
        assert!(sel.bulk_scope(&FilterSet::new(), None).is_none());
    }
}
