// ── Column registry ──
//
// Declares what a table can render and merges the per-user layout
// (enable/order) saved on this device. A saved layout whose cardinality
// no longer matches the declared set -- columns added or removed in a
// later release -- is discarded wholesale and defaults are restored.

use serde::{Deserialize, Serialize};

/// Declaration of one displayable column.
///
/// `render` is a pure row -> cell function; both front-ends and the CSV
/// export feed rows through it. A column whose header hosts an inline
/// filter control names the criteria field it writes to in
/// `filter_field`.
pub struct ColumnSpec<T> {
    pub id: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    /// Filter-store field an inline header control writes to, if any.
    pub filter_field: Option<&'static str>,
    pub render: fn(&T) -> String,
}

/// Persisted per-user override for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPref {
    pub id: String,
    pub enabled: bool,
    pub order: u32,
}

/// Merge the declared columns with a saved override.
///
/// The override applies only when it covers exactly the declared set
/// (same length, all ids known); anything else falls back to declaration
/// order with dense sequential `order` values, all enabled.
pub fn merge_prefs<T>(defaults: &[ColumnSpec<T>], saved: Option<Vec<ColumnPref>>) -> Vec<ColumnPref> {
    if let Some(saved) = saved {
        let applies = saved.len() == defaults.len()
            && saved
                .iter()
                .all(|p| defaults.iter().any(|c| c.id == p.id));
        if applies {
            let mut prefs = saved;
            prefs.sort_by_key(|p| p.order);
            // Re-densify order values after the sort.
            for (i, p) in prefs.iter_mut().enumerate() {
                p.order = u32::try_from(i).unwrap_or(u32::MAX);
            }
            return prefs;
        }
        tracing::debug!(
            saved = saved.len(),
            declared = defaults.len(),
            "stale column layout discarded"
        );
    }
    defaults
        .iter()
        .enumerate()
        .map(|(i, c)| ColumnPref {
            id: c.id.to_owned(),
            enabled: true,
            order: u32::try_from(i).unwrap_or(u32::MAX),
        })
        .collect()
}

/// The declared columns of a table joined with the merged layout.
pub struct ColumnLayout<T> {
    columns: Vec<ColumnSpec<T>>,
    prefs: Vec<ColumnPref>,
}

impl<T> ColumnLayout<T> {
    pub fn new(columns: Vec<ColumnSpec<T>>, saved: Option<Vec<ColumnPref>>) -> Self {
        let prefs = merge_prefs(&columns, saved);
        Self { columns, prefs }
    }

    /// Enabled columns in layout order.
    pub fn visible(&self) -> Vec<&ColumnSpec<T>> {
        self.prefs
            .iter()
            .filter(|p| p.enabled)
            .filter_map(|p| self.columns.iter().find(|c| c.id == p.id))
            .collect()
    }

    /// Header labels of the enabled columns, in order.
    pub fn header_labels(&self) -> Vec<&'static str> {
        self.visible().iter().map(|c| c.label).collect()
    }

    /// Render one row into cells for the enabled columns, in order.
    pub fn render_row(&self, row: &T) -> Vec<String> {
        self.visible().iter().map(|c| (c.render)(row)).collect()
    }

    /// Toggle a column on/off. Returns the new layout for persistence.
    pub fn toggle_column(&mut self, id: &str) -> &[ColumnPref] {
        if let Some(p) = self.prefs.iter_mut().find(|p| p.id == id) {
            p.enabled = !p.enabled;
        }
        &self.prefs
    }

    pub fn prefs(&self) -> &[ColumnPref] {
        &self.prefs
    }

    pub fn columns(&self) -> &[ColumnSpec<T>] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row;

    fn cols() -> Vec<ColumnSpec<Row>> {
        fn blank(_: &Row) -> String {
            String::new()
        }
        vec![
            ColumnSpec { id: "a", label: "A", sortable: true, filter_field: None, render: blank },
            ColumnSpec { id: "b", label: "B", sortable: false, filter_field: None, render: blank },
            ColumnSpec { id: "c", label: "C", sortable: true, filter_field: None, render: blank },
        ]
    }

    #[test]
    fn saved_layout_applies_order_and_enabled() {
        let saved = vec![
            ColumnPref { id: "c".into(), enabled: true, order: 0 },
            ColumnPref { id: "a".into(), enabled: false, order: 1 },
            ColumnPref { id: "b".into(), enabled: true, order: 2 },
        ];
        let layout = ColumnLayout::new(cols(), Some(saved));
        let labels = layout.header_labels();
        assert_eq!(labels, vec!["C", "B"]);
    }

    #[test]
    fn cardinality_mismatch_restores_defaults() {
        let saved = vec![
            ColumnPref { id: "c".into(), enabled: false, order: 0 },
            ColumnPref { id: "a".into(), enabled: false, order: 1 },
        ];
        let layout = ColumnLayout::new(cols(), Some(saved));
        assert_eq!(layout.header_labels(), vec!["A", "B", "C"]);
        assert!(layout.prefs().iter().all(|p| p.enabled));
        let orders: Vec<u32> = layout.prefs().iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn unknown_id_restores_defaults() {
        let saved = vec![
            ColumnPref { id: "a".into(), enabled: true, order: 0 },
            ColumnPref { id: "b".into(), enabled: true, order: 1 },
            ColumnPref { id: "zz".into(), enabled: true, order: 2 },
        ];
        let layout = ColumnLayout::new(cols(), Some(saved));
        assert_eq!(layout.header_labels(), vec!["A", "B", "C"]);
    }
}
