//! Customer command handlers: list plus the bulk mutation surface.

use tabled::Tabled;

use backdesk_api::CustomerRecord;
use backdesk_core::{FilterSet, FilterValue, bulk};

use crate::cli::{
    CustomerFilterArgs, CustomersAnnounceArgs, CustomersArgs, CustomersCommand,
    CustomersDeleteArgs, CustomersLabelArgs, CustomersListArgs, GlobalOpts, OutputFormat,
};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Labels")]
    labels: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&CustomerRecord> for CustomerRow {
    fn from(c: &CustomerRecord) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            email: c.email.clone().unwrap_or_default(),
            country: c.country.clone().unwrap_or_default(),
            status: c.status.clone(),
            labels: c
                .label_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            created: c.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Translate filter flags into the typed filter criteria.
pub fn filters(args: &CustomerFilterArgs) -> FilterSet {
    let mut f = FilterSet::new();
    if let Some(status) = &args.status {
        f.set("status", FilterValue::Text(status.clone()));
    }
    if let Some(country) = &args.country {
        f.set("country", FilterValue::Text(country.clone()));
    }
    if !args.labels.is_empty() || !args.exclude_labels.is_empty() {
        f.set(
            "label_ids",
            FilterValue::IdList {
                include: args.labels.clone(),
                exclude: args.exclude_labels.clone(),
            },
        );
    }
    f
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List(list_args) => list(conn, list_args, global).await,
        CustomersCommand::Label(label_args) => label(conn, label_args, global).await,
        CustomersCommand::Announce(announce_args) => announce(conn, announce_args, global).await,
        CustomersCommand::Delete(delete_args) => delete(conn, delete_args, global).await,
    }
}

async fn list(
    conn: &Connection,
    args: CustomersListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filters = filters(&args.filter);
    let (query, page) = util::build_query(&args.list, &filters, conn.per_page)?;

    let result = conn.api.query_customers(&query).await?;
    let out = output::render_list(&global.output, &result.rows, |c| CustomerRow::from(c), |c| {
        c.id.clone()
    });
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) {
        let footer = output::page_footer(
            &page.range_label(result.total_count),
            page.wire_page(),
            page.page_count(result.total_count),
        );
        output::print_output(&footer, global.quiet);
    }
    Ok(())
}

async fn label(
    conn: &Connection,
    args: CustomersLabelArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let diff = bulk::LabelDiff {
        added: args.assign.clone(),
        removed: args.remove.clone(),
    };
    if diff.is_empty() {
        return Err(CliError::Validation {
            field: "assign/remove".into(),
            reason: "nothing to do: pass --assign and/or --remove".into(),
        });
    }

    let filters = filters(&args.filter);
    let scope = util::bulk_scope(&args.scope, &filters);

    if bulk::needs_confirmation(&scope) {
        let total = preview_count(conn, &filters, args.scope.query.as_deref()).await?;
        util::confirm(
            &bulk::confirm_summary("Relabel", &scope, total),
            global.yes,
        )?;
    }

    bulk::apply_label_diff(&conn.api, &scope, &diff).await?;
    output::print_output("labels updated", global.quiet);
    Ok(())
}

async fn announce(
    conn: &Connection,
    args: CustomersAnnounceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filters = filters(&args.filter);
    let scope = util::bulk_scope(&args.scope, &filters);

    if bulk::needs_confirmation(&scope) {
        let total = preview_count(conn, &filters, args.scope.query.as_deref()).await?;
        util::confirm(
            &bulk::confirm_summary("Announce to", &scope, total),
            global.yes,
        )?;
    }

    conn.api
        .set_customer_announcement(scope, args.announcement)
        .await?;
    output::print_output("announcement attached", global.quiet);
    Ok(())
}

async fn delete(
    conn: &Connection,
    args: CustomersDeleteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filters = filters(&args.filter);
    let scope = util::bulk_scope(&args.scope, &filters);

    // Deletion always confirms, broad or not.
    let total = if bulk::needs_confirmation(&scope) {
        preview_count(conn, &filters, args.scope.query.as_deref()).await?
    } else {
        0
    };
    util::confirm(&bulk::confirm_summary("Delete", &scope, total), global.yes)?;

    conn.api.delete_customers(scope).await?;
    output::print_output("deleted", global.quiet);
    Ok(())
}

/// Server-reported count of rows matching the filters + query.
async fn preview_count(
    conn: &Connection,
    filters: &FilterSet,
    q: Option<&str>,
) -> Result<u64, CliError> {
    let mut query = backdesk_api::ListQuery::page(1, 1);
    query.q = q.map(ToOwned::to_owned).filter(|q| !q.is_empty());
    query.filters = filters.to_wire();
    Ok(conn.api.query_customers(&query).await?.total_count)
}
