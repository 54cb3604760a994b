//! IB reward command handlers.

use tabled::Tabled;

use backdesk_api::RewardRecord;
use backdesk_core::{FilterSet, FilterValue};

use crate::cli::{GlobalOpts, OutputFormat, RewardsArgs, RewardsCommand, RewardsListArgs};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RewardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Broker")]
    broker: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Rate %")]
    rate: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Referred")]
    referred: String,
    #[tabled(rename = "Total paid")]
    paid: String,
}

impl From<&RewardRecord> for RewardRow {
    fn from(r: &RewardRecord) -> Self {
        Self {
            id: r.id.clone(),
            broker: r.broker_name.clone(),
            tier: r.tier.clone(),
            rate: format!("{:.2}", r.rate_pct),
            active: if r.active { "yes" } else { "no" }.into(),
            referred: r.referred_count.to_string(),
            paid: format!("{:.2}", r.total_paid),
        }
    }
}

pub async fn handle(
    conn: &Connection,
    args: RewardsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RewardsCommand::List(list_args) => list(conn, list_args, global).await,
    }
}

async fn list(
    conn: &Connection,
    args: RewardsListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut filters = FilterSet::new();
    if let Some(tier) = &args.tier {
        filters.set("tier", FilterValue::Text(tier.clone()));
    }
    if args.active {
        filters.set("active", FilterValue::Flag(true));
    }

    let (query, page) = util::build_query(&args.list, &filters, conn.per_page)?;
    let result = conn.api.query_rewards(&query).await?;

    let out = output::render_list(&global.output, &result.rows, |r| RewardRow::from(r), |r| {
        r.id.clone()
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
