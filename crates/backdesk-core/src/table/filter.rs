// ── Filter criteria ──
//
// The filter store of a table view: field name -> typed constraint.
// A field is present only while it carries a non-empty value, so
// "is any filter active" is plain emptiness of the map and the active
// filter chips never render an empty entry.

use indexmap::IndexMap;
use serde::Serialize;

/// A single field constraint.
///
/// Serialized untagged: the wire sees a scalar, a `{gt, lt}` object, or
/// an `{include, exclude}` object depending on the variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Flag(bool),
    Range {
        #[serde(skip_serializing_if = "Option::is_none")]
        gt: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lt: Option<f64>,
    },
    IdList {
        #[serde(skip_serializing_if = "Vec::is_empty")]
        include: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        exclude: Vec<String>,
    },
}

impl FilterValue {
    /// An include-only id list.
    pub fn include(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::IdList {
            include: ids.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    /// A value that constrains nothing. Setting such a value on a field
    /// unsets the field instead of storing it.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Flag(_) => false,
            Self::Range { gt, lt } => gt.is_none() && lt.is_none(),
            Self::IdList { include, exclude } => include.is_empty() && exclude.is_empty(),
        }
    }

    /// Short human form for filter chips.
    pub fn chip_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Flag(b) => if *b { "yes" } else { "no" }.into(),
            Self::Range { gt, lt } => match (gt, lt) {
                (Some(g), Some(l)) => format!("{g}..{l}"),
                (Some(g), None) => format!("> {g}"),
                (None, Some(l)) => format!("< {l}"),
                (None, None) => String::new(),
            },
            Self::IdList { include, exclude } => {
                let mut parts = Vec::new();
                if !include.is_empty() {
                    parts.push(include.join(","));
                }
                if !exclude.is_empty() {
                    parts.push(format!("not {}", exclude.join(",")));
                }
                parts.join(" ")
            }
        }
    }
}

/// The active filter criteria of one table view.
///
/// Insertion order is preserved so chips render in the order the user
/// applied them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    fields: IndexMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field constraint. An empty value unsets the field.
    pub fn set(&mut self, field: impl Into<String>, value: FilterValue) {
        let field = field.into();
        if value.is_empty() {
            self.fields.shift_remove(&field);
        } else {
            self.fields.insert(field, value);
        }
    }

    /// Unset a field entirely.
    pub fn remove(&mut self, field: &str) {
        self.fields.shift_remove(field);
    }

    /// Remove a single id from a list-valued field. When both lists
    /// drain, the field is unset so no empty chip remains.
    pub fn remove_from_list(&mut self, field: &str, id: &str) {
        let drained = match self.fields.get_mut(field) {
            Some(FilterValue::IdList { include, exclude }) => {
                include.retain(|v| v != id);
                exclude.retain(|v| v != id);
                include.is_empty() && exclude.is_empty()
            }
            _ => false,
        };
        if drained {
            self.fields.shift_remove(field);
        }
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.fields.get(field)
    }

    /// Whether any filter is active.
    pub fn is_active(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.fields.iter()
    }

    /// Flatten into the wire map carried by
    /// [`ListQuery`](backdesk_api::ListQuery) and bulk scopes.
    pub fn to_wire(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_value_unsets_field() {
        let mut f = FilterSet::new();
        f.set("status", FilterValue::Text("open".into()));
        assert!(f.is_active());

        f.set("status", FilterValue::Text(String::new()));
        assert!(!f.is_active());
        assert!(f.get("status").is_none());
    }

    #[test]
    fn remove_from_list_unsets_drained_field() {
        let mut f = FilterSet::new();
        f.set("label_ids", FilterValue::include(["3", "7"]));

        f.remove_from_list("label_ids", "3");
        assert!(f.get("label_ids").is_some());

        f.remove_from_list("label_ids", "7");
        assert!(f.get("label_ids").is_none());
        assert!(!f.is_active());
    }

    #[test]
    fn wire_shapes_per_variant() {
        let mut f = FilterSet::new();
        f.set("status", FilterValue::Text("open".into()));
        f.set("flagged", FilterValue::Flag(true));
        f.set(
            "score",
            FilterValue::Range {
                gt: Some(50.0),
                lt: None,
            },
        );
        f.set(
            "label_ids",
            FilterValue::IdList {
                include: vec!["1".into()],
                exclude: vec!["2".into()],
            },
        );

        let wire = serde_json::Value::Object(f.to_wire());
        assert_eq!(
            wire,
            json!({
                "status": "open",
                "flagged": true,
                "score": {"gt": 50.0},
                "label_ids": {"include": ["1"], "exclude": ["2"]}
            })
        );
    }
}
