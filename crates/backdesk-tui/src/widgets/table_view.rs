//! Generic data-table renderer.
//!
//! Draws one page of rows through the column registry: header labels
//! with sort indicators, a check-mark gutter for the bulk selection,
//! cursor highlight, and a pagination footer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

use backdesk_core::table::{ColumnLayout, PageRequest, SortSpec, TableSnapshot};

use crate::theme;

/// Everything the generic renderer needs from a screen.
pub struct TableView<'a, T> {
    pub title: String,
    pub layout: &'a ColumnLayout<T>,
    pub snapshot: &'a TableSnapshot<T>,
    pub page: PageRequest,
    pub sort: &'a SortSpec,
    /// Cursor row within the current page.
    pub cursor: usize,
    /// Column index (within visible columns) targeted by the sort key.
    pub sort_target: usize,
    pub focused: bool,
}

impl<T> TableView<'_, T> {
    /// Render the table plus its bordered block into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, is_checked: impl Fn(&T) -> bool) {
        let loading = if self.snapshot.loading { " \u{27f3}" } else { "" };
        let title = format!(
            " {} \u{2502} {}{loading} ",
            self.title,
            self.snapshot.range_label(self.page)
        );

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let visible = self.layout.visible();

        // Header: sort indicator per column, marker on the sort target.
        let mut header_cells = vec![Cell::from(" ").style(theme::table_header())];
        for (i, col) in visible.iter().enumerate() {
            let arrow = match self.sort.get(col.label) {
                Some(true) => " \u{25b2}",
                Some(false) => " \u{25bc}",
                None => "",
            };
            let target = if i == self.sort_target && col.sortable {
                "*"
            } else {
                ""
            };
            header_cells.push(
                Cell::from(format!("{}{arrow}{target}", col.label)).style(theme::table_header()),
            );
        }
        let header = Row::new(header_cells);

        let rows: Vec<Row> = self
            .snapshot
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let checked = is_checked(row);
                let marker = if checked { "\u{2713}" } else { " " };
                let marker_style = if checked {
                    theme::row_checked()
                } else {
                    theme::table_row()
                };

                let mut cells = vec![Cell::from(marker).style(marker_style)];
                for cell in self.layout.render_row(row) {
                    cells.push(Cell::from(cell));
                }

                let style = if i == self.cursor {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Row::new(cells).style(style)
            })
            .collect();

        let mut widths = vec![Constraint::Length(1)];
        widths.extend(visible.iter().map(|_| Constraint::Fill(1)));

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(Style::default().bg(theme::BG_HIGHLIGHT));
        frame.render_widget(table, inner);
    }
}
