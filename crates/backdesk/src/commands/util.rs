//! Shared helpers for command handlers: query building from flags,
//! sort parsing, bulk-scope assembly, and confirmation gating.

use dialoguer::Confirm;

use backdesk_api::{BulkScope, ListQuery};
use backdesk_core::{FilterSet, PageRequest, SortSpec};

use crate::cli::{BulkScopeArgs, ListOpts};
use crate::error::CliError;

/// Parse `--sort col` / `--sort col:desc` flags into a SortSpec.
pub fn parse_sort(specs: &[String]) -> Result<SortSpec, CliError> {
    let mut sort = SortSpec::new();
    for spec in specs {
        match spec.split_once(':') {
            None => sort.set(spec.clone(), true),
            Some((col, "asc")) => sort.set(col, true),
            Some((col, "desc")) => sort.set(col, false),
            Some((_, dir)) => {
                return Err(CliError::Validation {
                    field: "sort".into(),
                    reason: format!("expected 'asc' or 'desc', got '{dir}'"),
                });
            }
        }
    }
    Ok(sort)
}

/// Build the list request from shared flags plus entity filters.
///
/// The `--page` flag is 1-based like the wire; internally we go through
/// [`PageRequest`] so the zero-based/one-based translation stays in one
/// place.
pub fn build_query(
    list: &ListOpts,
    filters: &FilterSet,
    default_per_page: u32,
) -> Result<(ListQuery, PageRequest), CliError> {
    if list.page == 0 {
        return Err(CliError::Validation {
            field: "page".into(),
            reason: "pages are numbered from 1".into(),
        });
    }
    let page = PageRequest {
        page: list.page - 1,
        per_page: list.per_page.unwrap_or(default_per_page).max(1),
    };
    let sort = parse_sort(&list.sort)?;
    let query = ListQuery {
        page: page.wire_page(),
        per_page: page.per_page,
        q: list.query.clone().filter(|q| !q.is_empty()),
        sorting: sort.to_wire(),
        filters: filters.to_wire(),
    };
    Ok((query, page))
}

/// Assemble the bulk mutation target from scope flags.
pub fn bulk_scope(args: &BulkScopeArgs, filters: &FilterSet) -> BulkScope {
    if args.all_matching {
        BulkScope::AllMatching {
            select_all: true,
            q: args.query.clone().filter(|q| !q.is_empty()),
            filters: filters.to_wire(),
            first_n: args.first_n,
        }
    } else {
        BulkScope::Ids {
            ids: args.ids.clone(),
        }
    }
}

/// Gate a broad-impact action behind an interactive confirmation.
/// `--yes` skips the prompt.
pub fn confirm(prompt: &str, yes: bool) -> Result<(), CliError> {
    if yes {
        return Ok(());
    }
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    if confirmed { Ok(()) } else { Err(CliError::Aborted) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sort_flag_parsing() {
        let sort = parse_sort(&["score".into(), "created_at:desc".into()]).unwrap();
        assert_eq!(sort.get("score"), Some(true));
        assert_eq!(sort.get("created_at"), Some(false));

        assert!(parse_sort(&["score:sideways".into()]).is_err());
    }

    #[test]
    fn page_flag_is_one_based() {
        let list = ListOpts {
            page: 1,
            per_page: Some(10),
            query: None,
            sort: Vec::new(),
        };
        let (query, page) = build_query(&list, &FilterSet::new(), 25).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(page.page, 0);

        let zero = ListOpts { page: 0, ..list };
        assert!(build_query(&zero, &FilterSet::new(), 25).is_err());
    }
}
