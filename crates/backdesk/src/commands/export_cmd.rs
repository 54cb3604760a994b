//! CSV export: page through a filtered view, flatten rows through the
//! column registry, and hand the cells to the csv writer.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use backdesk_api::{ListPage, ListQuery};
use backdesk_core::table::ColumnLayout;
use backdesk_core::{export, views};

use crate::cli::{ExportArgs, ExportEntity, GlobalOpts};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

const EXPORT_PAGE_SIZE: u32 = 200;

pub async fn handle(
    conn: &Connection,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let file = args.file.clone().unwrap_or_else(|| default_file(args.entity));
    let bar = progress_bar(global.quiet);

    let written = match args.entity {
        ExportEntity::Compliance => {
            let rows = fetch_all(&args, &bar, |query| {
                let api = &conn.api;
                async move { api.query_compliances(&query).await }
            })
            .await?;
            write(&file, &ColumnLayout::new(views::compliance::columns(), None), &rows)?
        }
        ExportEntity::Customers => {
            let rows = fetch_all(&args, &bar, |query| {
                let api = &conn.api;
                async move { api.query_customers(&query).await }
            })
            .await?;
            write(&file, &ColumnLayout::new(views::customers::columns(), None), &rows)?
        }
        ExportEntity::Rewards => {
            let rows = fetch_all(&args, &bar, |query| {
                let api = &conn.api;
                async move { api.query_rewards(&query).await }
            })
            .await?;
            write(&file, &ColumnLayout::new(views::rewards::columns(), None), &rows)?
        }
    };

    bar.finish_and_clear();
    output::print_output(
        &format!("wrote {written} rows to {}", file.display()),
        global.quiet,
    );
    Ok(())
}

fn default_file(entity: ExportEntity) -> PathBuf {
    let name = match entity {
        ExportEntity::Compliance => "compliance.csv",
        ExportEntity::Customers => "customers.csv",
        ExportEntity::Rewards => "rewards.csv",
    };
    PathBuf::from(name)
}

fn progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::no_length();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {pos}/{len} rows {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar
}

/// Page through the list endpoint until the limit or the last page.
async fn fetch_all<T, F, Fut>(
    args: &ExportArgs,
    bar: &ProgressBar,
    fetch_page: F,
) -> Result<Vec<T>, CliError>
where
    F: Fn(ListQuery) -> Fut,
    Fut: Future<Output = Result<ListPage<T>, backdesk_api::Error>>,
{
    let mut rows = Vec::new();
    let mut page = 1u32;

    loop {
        let mut query = ListQuery::page(page, EXPORT_PAGE_SIZE);
        query.q = args.query.clone().filter(|q| !q.is_empty());

        let result = fetch_page(query).await?;
        bar.set_length(result.total_count.min(u64::from(args.limit)));

        let len = result.rows.len();
        rows.extend(result.rows);
        bar.set_position(u64::try_from(rows.len()).unwrap_or(u64::MAX));

        let exhausted = len < EXPORT_PAGE_SIZE as usize
            || u64::try_from(rows.len()).unwrap_or(u64::MAX) >= result.total_count;
        if exhausted || rows.len() >= args.limit as usize {
            break;
        }
        page += 1;
    }

    rows.truncate(args.limit as usize);
    Ok(rows)
}

fn write<T>(
    file: &PathBuf,
    layout: &ColumnLayout<T>,
    rows: &[T],
) -> Result<usize, CliError> {
    let out = std::fs::File::create(file)?;
    Ok(export::write_csv(layout, rows, out)?)
}
