// ── Device-local settings ──
//
// Table layouts, sort specs, and page sizes are per-device UI
// preferences, not correctness-critical state. Storage is an injected
// capability so the table model is testable without touching disk;
// concurrent writers are not coordinated -- last write wins.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::table::columns::ColumnPref;
use crate::table::sort::SortSpec;

/// Raw string key-value storage.
pub trait SettingsStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&self, key: &str, value: String);
}

/// Handle front-ends and sessions share. JSON (de)serialization lives
/// here so stores stay dumb string maps.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// In-memory settings, for tests and ephemeral sessions.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySettings::default()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "unreadable setting ignored");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set_raw(key, raw),
            Err(e) => warn!(key, error = %e, "setting not persisted"),
        }
    }

    // ── Table-scoped helpers ─────────────────────────────────────────
    //
    // All table layouts live under one "tableSetting" object:
    // `{"{table}Table": [...column prefs], "{table}Sorting": {...}}`.

    const TABLE_SETTING_KEY: &'static str = "tableSetting";

    fn table_setting_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.get(Self::TABLE_SETTING_KEY).unwrap_or_default()
    }

    fn update_table_setting(&self, member: String, value: serde_json::Value) {
        let mut obj = self.table_setting_object();
        obj.insert(member, value);
        self.set(Self::TABLE_SETTING_KEY, &obj);
    }

    pub fn load_sorting(&self, table: &str) -> Option<SortSpec> {
        let obj = self.table_setting_object();
        serde_json::from_value(obj.get(&format!("{table}Sorting"))?.clone()).ok()
    }

    pub fn save_sorting(&self, table: &str, sort: &SortSpec) {
        if let Ok(v) = serde_json::to_value(sort) {
            self.update_table_setting(format!("{table}Sorting"), v);
        }
    }

    pub fn load_columns(&self, table: &str) -> Option<Vec<ColumnPref>> {
        let obj = self.table_setting_object();
        serde_json::from_value(obj.get(&format!("{table}Table"))?.clone()).ok()
    }

    pub fn save_columns(&self, table: &str, prefs: &[ColumnPref]) {
        if let Ok(v) = serde_json::to_value(prefs) {
            self.update_table_setting(format!("{table}Table"), v);
        }
    }

    pub fn load_per_page(&self, entity: &str) -> Option<u32> {
        self.get(&format!("{entity}PerPage"))
    }

    pub fn save_per_page(&self, entity: &str, per_page: u32) {
        self.set(&format!("{entity}PerPage"), &per_page);
    }
}

// ── In-memory store ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MemorySettings {
    map: Mutex<HashMap<String, String>>,
}

impl SettingsStore for MemorySettings {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: String) {
        if let Ok(mut map) = self.map.lock() {
            map.insert(key.to_owned(), value);
        }
    }
}

// ── File-backed store ────────────────────────────────────────────────

/// JSON-file-backed settings. The whole map is read at open and
/// rewritten on every mutation (these are tiny objects; simplicity over
/// incremental IO). Writes go through a sibling temp file + rename.
pub struct JsonFileSettings {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl JsonFileSettings {
    pub fn open(path: PathBuf) -> Self {
        let map = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            map: Mutex::new(map),
        }
    }

    fn flush(&self, map: &HashMap<String, String>) {
        let Ok(raw) = serde_json::to_string_pretty(map) else {
            return;
        };
        if let Some(dir) = self.path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        let tmp = self.path.with_extension("json.tmp");
        if std::fs::write(&tmp, raw).is_ok() {
            if let Err(e) = std::fs::rename(&tmp, &self.path) {
                warn!(path = %self.path.display(), error = %e, "settings write failed");
            }
        }
    }
}

impl SettingsStore for JsonFileSettings {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: String) {
        let Ok(mut map) = self.map.lock() else {
            return;
        };
        map.insert(key.to_owned(), value);
        self.flush(&map);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sorting_and_columns_share_the_table_setting_object() {
        let settings = Settings::in_memory();

        let mut sort = SortSpec::new();
        sort.toggle("created_at");
        settings.save_sorting("compliance", &sort);
        settings.save_columns(
            "compliance",
            &[ColumnPref { id: "status".into(), enabled: true, order: 0 }],
        );

        assert_eq!(settings.load_sorting("compliance"), Some(sort));
        assert_eq!(settings.load_columns("compliance").unwrap().len(), 1);

        // Both live under one JSON object keyed per table.
        let obj: serde_json::Map<String, serde_json::Value> =
            settings.get("tableSetting").unwrap();
        assert!(obj.contains_key("complianceSorting"));
        assert!(obj.contains_key("complianceTable"));
    }

    #[test]
    fn file_store_round_trips_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        {
            let settings = Settings::new(Arc::new(JsonFileSettings::open(path.clone())));
            settings.save_per_page("customers", 50);
        }

        let settings = Settings::new(Arc::new(JsonFileSettings::open(path)));
        assert_eq!(settings.load_per_page("customers"), Some(50));
    }

    #[test]
    fn corrupt_setting_reads_as_absent() {
        let settings = Settings::in_memory();
        settings.store.set_raw("customersPerPage", "not json".into());
        assert_eq!(settings.load_per_page("customers"), None);
    }
}
