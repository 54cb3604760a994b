//! Compliance command handlers.

use tabled::Tabled;

use backdesk_api::ComplianceRecord;
use backdesk_core::{FilterSet, FilterValue, bulk};

use crate::cli::{
    ComplianceArgs, ComplianceCommand, ComplianceDeleteArgs, ComplianceFilterArgs, GlobalOpts,
};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ComplianceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Flagged")]
    flagged: String,
}

impl From<&ComplianceRecord> for ComplianceRow {
    fn from(r: &ComplianceRecord) -> Self {
        Self {
            id: r.id.clone(),
            customer: r
                .customer_name
                .clone()
                .unwrap_or_else(|| r.customer_id.clone()),
            agent: r.agent.clone().unwrap_or_default(),
            status: r.status.clone(),
            score: r.score.map(|s| format!("{s:.1}")).unwrap_or_default(),
            started: r.call_started_at.format("%Y-%m-%d %H:%M").to_string(),
            flagged: if r.flagged { "yes".into() } else { String::new() },
        }
    }
}

/// Translate filter flags into the typed filter criteria.
pub fn filters(args: &ComplianceFilterArgs) -> FilterSet {
    let mut f = FilterSet::new();
    if let Some(status) = &args.status {
        f.set("status", FilterValue::Text(status.clone()));
    }
    if let Some(agent) = &args.agent {
        f.set("agent", FilterValue::Text(agent.clone()));
    }
    if args.flagged {
        f.set("flagged", FilterValue::Flag(true));
    }
    if args.score_gt.is_some() || args.score_lt.is_some() {
        f.set(
            "score",
            FilterValue::Range {
                gt: args.score_gt,
                lt: args.score_lt,
            },
        );
    }
    f
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: ComplianceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ComplianceCommand::List(list_args) => {
            let filters = filters(&list_args.filter);
            let (query, page) = util::build_query(&list_args.list, &filters, conn.per_page)?;

            let result = conn.api.query_compliances(&query).await?;
            let out = output::render_list(
                &global.output,
                &result.rows,
                |r| ComplianceRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);

            if matches!(global.output, crate::cli::OutputFormat::Table) {
                let footer = output::page_footer(
                    &page.range_label(result.total_count),
                    page.wire_page(),
                    page.page_count(result.total_count),
                );
                output::print_output(&footer, global.quiet);
            }
            Ok(())
        }

        ComplianceCommand::Delete(delete_args) => delete(conn, delete_args, global).await,
    }
}

async fn delete(
    conn: &Connection,
    args: ComplianceDeleteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filters = filters(&args.filter);
    let scope = util::bulk_scope(
        &crate::cli::BulkScopeArgs {
            ids: args.ids,
            all_matching: args.all_matching,
            query: args.query,
            first_n: None,
        },
        &filters,
    );

    // Broad-impact scopes state the affected count before anything runs.
    if bulk::needs_confirmation(&scope) {
        let total = preview_count(conn, &filters).await?;
        util::confirm(&bulk::confirm_summary("Delete", &scope, total), global.yes)?;
    } else {
        util::confirm(&bulk::confirm_summary("Delete", &scope, 0), global.yes)?;
    }

    conn.api.delete_compliances(scope).await?;
    output::print_output("deleted", global.quiet);
    Ok(())
}

/// Server-reported count of rows matching the filters (for the
/// confirmation text of all-matching scopes).
async fn preview_count(conn: &Connection, filters: &FilterSet) -> Result<u64, CliError> {
    let mut query = backdesk_api::ListQuery::page(1, 1);
    query.filters = filters.to_wire();
    Ok(conn.api.query_compliances(&query).await?.total_count)
}
