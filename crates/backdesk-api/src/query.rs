// List-query and bulk-mutation wire types.
//
// `ListQuery` is the single request descriptor every list endpoint accepts:
// pagination (1-based on the wire), page size, optional free-text query,
// optional multi-column sorting, and the active filter fields flattened
// into the same object. `backdesk-core` owns the typed filter model and
// converts it into the flattened map before calling this crate.

use indexmap::IndexMap;
use serde::Serialize;

/// Request body for `POST /api/v1/{entity}/query`.
///
/// The backend treats absent fields as "no constraint", so everything
/// optional is skipped rather than sent empty.
#[derive(Debug, Clone, Serialize)]
pub struct ListQuery {
    /// 1-based page index.
    pub page: u32,
    pub per_page: u32,
    /// Free-text query. Omitted when empty -- never sent as `"q": ""`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Column label -> ascending? Omitted when no sort is active.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub sorting: IndexMap<String, bool>,
    /// Active filter fields, flattened alongside the paging keys.
    #[serde(flatten)]
    pub filters: serde_json::Map<String, serde_json::Value>,
}

impl ListQuery {
    /// A query for the given 1-based page with no constraints.
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            q: None,
            sorting: IndexMap::new(),
            filters: serde_json::Map::new(),
        }
    }
}

/// Which rows a bulk mutation targets.
///
/// Serializes either as `{"ids": [...]}` or as
/// `{"select_all": true, ...filters, "q"?, "first_n"?}` -- the
/// all-matching form never enumerates ids.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BulkScope {
    Ids {
        ids: Vec<String>,
    },
    AllMatching {
        select_all: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        q: Option<String>,
        #[serde(flatten)]
        filters: serde_json::Map<String, serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        first_n: Option<u32>,
    },
}

impl BulkScope {
    /// Number of explicitly enumerated ids, if this scope enumerates any.
    pub fn id_count(&self) -> Option<usize> {
        match self {
            Self::Ids { ids } => Some(ids.len()),
            Self::AllMatching { .. } => None,
        }
    }
}

/// Direction of a bulk label mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAction {
    Assign,
    Remove,
}

/// Body for `POST /api/v1/customers/labels`.
#[derive(Debug, Clone, Serialize)]
pub struct LabelBulkRequest {
    #[serde(flatten)]
    pub scope: BulkScope,
    pub label_ids: Vec<u64>,
    pub action: LabelAction,
}

/// Body for `POST /api/v1/customers/announcement`.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementBulkRequest {
    #[serde(flatten)]
    pub scope: BulkScope,
    pub announcement_id: u64,
}

/// Body for `POST /api/v1/{entity}/delete`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteBulkRequest {
    #[serde(flatten)]
    pub scope: BulkScope,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_query_omits_empty_optionals() {
        let q = ListQuery::page(1, 10);
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v, json!({"page": 1, "per_page": 10}));
    }

    #[test]
    fn list_query_flattens_filters() {
        let mut q = ListQuery::page(2, 25);
        q.q = Some("fraud".into());
        q.sorting.insert("created_at".into(), false);
        q.filters
            .insert("status".into(), serde_json::Value::String("open".into()));
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(
            v,
            json!({
                "page": 2,
                "per_page": 25,
                "q": "fraud",
                "sorting": {"created_at": false},
                "status": "open"
            })
        );
    }

    #[test]
    fn bulk_scope_all_matching_carries_filters_not_ids() {
        let scope = BulkScope::AllMatching {
            select_all: true,
            q: Some("fraud".into()),
            filters: serde_json::Map::new(),
            first_n: None,
        };
        let req = LabelBulkRequest {
            scope,
            label_ids: vec![5],
            action: LabelAction::Assign,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "select_all": true,
                "q": "fraud",
                "label_ids": [5],
                "action": "assign"
            })
        );
    }
}
