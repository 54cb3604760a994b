// ── Spreadsheet export assembly ──
//
// The core's responsibility ends at flattening: enabled columns become
// the friendly-label header row, each row is rendered cell-by-cell
// through the column registry, and the result is handed to the csv
// writer collaborator.

use std::io::Write;

use crate::error::CoreError;
use crate::table::columns::ColumnLayout;

/// Write `rows` as CSV through the enabled columns of `layout`.
///
/// Returns the number of data records written (header excluded).
pub fn write_csv<T, W: Write>(
    layout: &ColumnLayout<T>,
    rows: &[T],
    writer: W,
) -> Result<usize, CoreError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(layout.header_labels())?;
    for row in rows {
        out.write_record(layout.render_row(row))?;
    }
    out.flush().map_err(|e| CoreError::ExportFailed {
        message: e.to_string(),
    })?;

    Ok(rows.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::table::columns::{ColumnPref, ColumnSpec};

    struct Row {
        name: &'static str,
        score: u32,
    }

    fn layout(saved: Option<Vec<ColumnPref>>) -> ColumnLayout<Row> {
        ColumnLayout::new(
            vec![
                ColumnSpec {
                    id: "name",
                    label: "Name",
                    sortable: true,
                    filter_field: None,
                    render: |r: &Row| r.name.to_owned(),
                },
                ColumnSpec {
                    id: "score",
                    label: "Score",
                    sortable: true,
                    filter_field: None,
                    render: |r: &Row| r.score.to_string(),
                },
            ],
            saved,
        )
    }

    #[test]
    fn header_uses_friendly_labels() {
        let rows = vec![Row { name: "ada", score: 9 }, Row { name: "bob", score: 3 }];
        let mut buf = Vec::new();

        let written = write_csv(&layout(None), &rows, &mut buf).unwrap();

        assert_eq!(written, 2);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Name,Score\nada,9\nbob,3\n");
    }

    #[test]
    fn disabled_columns_are_omitted() {
        let saved = vec![
            ColumnPref { id: "score".into(), enabled: true, order: 0 },
            ColumnPref { id: "name".into(), enabled: false, order: 1 },
        ];
        let rows = vec![Row { name: "ada", score: 9 }];
        let mut buf = Vec::new();

        write_csv(&layout(Some(saved)), &rows, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Score\n9\n");
    }
}
