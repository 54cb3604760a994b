// ── Per-row transient action memory ──
//
// Remembers which bulk-action affordance was last used on a row so the
// UI can highlight it. Bounded: least-recently-touched entries are
// evicted past the cap, so the map cannot grow with every row id ever
// seen. Session-local; cleared after successful bulk mutations.

use indexmap::IndexMap;

pub const DEFAULT_RECENT_CAP: usize = 64;

/// Bounded row-id -> last-action-tag mapping with LRU eviction.
#[derive(Debug, Clone)]
pub struct RecentActions {
    cap: usize,
    entries: IndexMap<String, String>,
}

impl RecentActions {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            entries: IndexMap::new(),
        }
    }

    /// Record an action on a row, refreshing its recency.
    pub fn record(&mut self, id: impl Into<String>, action: impl Into<String>) {
        let id = id.into();
        self.entries.shift_remove(&id);
        self.entries.insert(id, action.into());
        while self.entries.len() > self.cap {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RecentActions {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_touched() {
        let mut recent = RecentActions::new(2);
        recent.record("a", "label");
        recent.record("b", "announce");
        recent.record("a", "delete"); // refresh a
        recent.record("c", "label"); // evicts b

        assert_eq!(recent.get("a"), Some("delete"));
        assert_eq!(recent.get("b"), None);
        assert_eq!(recent.get("c"), Some("label"));
        assert_eq!(recent.len(), 2);
    }
}
