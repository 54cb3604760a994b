// ── Bulk action logic ──
//
// Label assignment works by set difference: the panel compares the
// labels currently checked across the selection with the user's new
// choice and issues at most two batch calls (assign the added, remove
// the removed) instead of one call per label.

use backdesk_api::{ApiClient, BulkScope, LabelAction};

use crate::error::CoreError;

/// Outcome of diffing a label picker against the currently-checked set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDiff {
    pub added: Vec<u64>,
    pub removed: Vec<u64>,
}

impl LabelDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute which labels to assign and which to remove.
///
/// Order within each list follows the input order.
pub fn diff_labels(checked: &[u64], chosen: &[u64]) -> LabelDiff {
    LabelDiff {
        added: chosen
            .iter()
            .filter(|id| !checked.contains(id))
            .copied()
            .collect(),
        removed: checked
            .iter()
            .filter(|id| !chosen.contains(id))
            .copied()
            .collect(),
    }
}

/// Apply a label diff against the scoped customers: at most two calls.
pub async fn apply_label_diff(
    api: &ApiClient,
    scope: &BulkScope,
    diff: &LabelDiff,
) -> Result<(), CoreError> {
    if !diff.added.is_empty() {
        api.mutate_customer_labels(scope.clone(), diff.added.clone(), LabelAction::Assign)
            .await
            .map_err(operation_error)?;
    }
    if !diff.removed.is_empty() {
        api.mutate_customer_labels(scope.clone(), diff.removed.clone(), LabelAction::Remove)
            .await
            .map_err(operation_error)?;
    }
    Ok(())
}

/// Human text for the confirmation dialog gating broad-impact actions.
///
/// All-matching scopes state the server-side affected count; enumerated
/// scopes state the id count.
pub fn confirm_summary(action: &str, scope: &BulkScope, total_count: u64) -> String {
    match scope.id_count() {
        Some(n) => {
            let s = if n == 1 { "" } else { "s" };
            format!("{action} {n} selected row{s}?")
        }
        None => {
            let s = if total_count == 1 { "" } else { "s" };
            format!("{action} ALL {total_count} row{s} matching the current filter?")
        }
    }
}

/// Whether this scope needs an explicit confirmation gate.
///
/// Anything targeting "all matching filter" is broad-impact.
pub fn needs_confirmation(scope: &BulkScope) -> bool {
    scope.id_count().is_none()
}

/// Map a mutation failure, preferring the backend-provided message.
fn operation_error(err: backdesk_api::Error) -> CoreError {
    match err.backend_message() {
        Some(msg) => CoreError::OperationFailed {
            message: msg.to_owned(),
        },
        None => CoreError::OperationFailed {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_computes_added_and_removed() {
        let diff = diff_labels(&[1, 2], &[2, 3]);
        assert_eq!(diff.added, vec![3]);
        assert_eq!(diff.removed, vec![1]);
    }

    #[test]
    fn identical_sets_diff_empty() {
        let diff = diff_labels(&[4, 5], &[4, 5]);
        assert!(diff.is_empty());
    }

    #[test]
    fn confirm_text_states_affected_count() {
        let ids = BulkScope::Ids {
            ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(confirm_summary("Delete", &ids, 900), "Delete 2 selected rows?");
        assert!(!needs_confirmation(&ids));

        let all = BulkScope::AllMatching {
            select_all: true,
            q: None,
            filters: serde_json::Map::new(),
            first_n: None,
        };
        assert_eq!(
            confirm_summary("Delete", &all, 900),
            "Delete ALL 900 rows matching the current filter?"
        );
        assert!(needs_confirmation(&all));
    }
}
