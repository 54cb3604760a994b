//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits one identifier
//! per line for scripting.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Footer line for table output: `"1–25 of 312  (page 1/13)"`.
pub fn page_footer(range_label: &str, page: u32, pages: u32) -> String {
    format!("{range_label}  (page {page}/{pages})")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    result.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}
