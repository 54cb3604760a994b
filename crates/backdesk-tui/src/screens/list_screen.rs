//! Shared list-screen mechanics.
//!
//! Every entity screen wraps a [`ListScreen`]: the table session handle,
//! the column layout, the latest published snapshot, and the cursor /
//! sort-target state driven by the common key bindings. Entity screens
//! add their own filters and bulk actions on top.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tui_popup::Popup;

use backdesk_core::table::{
    ColumnLayout, FilterValue, ListSource, SelectionState, TableSession, TableSnapshot,
};
use backdesk_core::{ColumnPref, Settings};

use crate::widgets::chips;
use crate::widgets::table_view::TableView;

pub struct ListScreen<S: ListSource> {
    pub session: TableSession<S>,
    pub layout: ColumnLayout<S::Row>,
    pub snapshot: TableSnapshot<S::Row>,
    pub cursor: usize,
    pub sort_target: usize,
    /// Inline header-filter input for the sort-target column, when open.
    filter_prompt: Option<Input>,
    row_id: fn(&S::Row) -> &str,
    name: &'static str,
    settings: Settings,
}

impl<S: ListSource> ListScreen<S> {
    pub fn new(
        session: TableSession<S>,
        columns: Vec<backdesk_core::ColumnSpec<S::Row>>,
        row_id: fn(&S::Row) -> &str,
        name: &'static str,
        settings: Settings,
    ) -> Self {
        let layout = ColumnLayout::new(columns, settings.load_columns(name));
        Self {
            session,
            layout,
            snapshot: TableSnapshot::default(),
            cursor: 0,
            sort_target: 0,
            filter_prompt: None,
            row_id,
            name,
            settings,
        }
    }

    // ── Snapshot handling ────────────────────────────────────────────

    pub fn apply_snapshot(&mut self, snapshot: &TableSnapshot<S::Row>) {
        self.snapshot = snapshot.clone();
        let len = self.snapshot.rows.len();
        if len > 0 && self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Ids of the rows on the current page.
    pub fn page_ids(&self) -> Vec<String> {
        self.snapshot
            .rows
            .iter()
            .map(|r| (self.row_id)(r).to_owned())
            .collect()
    }

    pub fn cursor_id(&self) -> Option<String> {
        self.snapshot
            .rows
            .get(self.cursor)
            .map(|r| (self.row_id)(r).to_owned())
    }

    // ── Common key bindings ──────────────────────────────────────────

    /// Handle navigation / selection / sort keys shared by every list
    /// screen. Returns `true` when the key was consumed.
    pub fn handle_common_key(&mut self, key: KeyEvent) -> bool {
        // An open header-filter prompt swallows everything.
        if let Some(input) = &mut self.filter_prompt {
            match key.code {
                KeyCode::Esc => {
                    self.filter_prompt = None;
                }
                KeyCode::Enter => {
                    let value = input.value().trim().to_owned();
                    self.filter_prompt = None;
                    if let Some((field, _)) = self.target_filter_field() {
                        if value.is_empty() {
                            self.session.remove_filter(field);
                        } else {
                            self.session.set_filter(field, FilterValue::Text(value));
                        }
                    }
                }
                _ => {
                    input.handle_event(&crossterm::event::Event::Key(key));
                }
            }
            return true;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                true
            }
            KeyCode::Char('g') => {
                self.cursor = 0;
                true
            }
            KeyCode::Char('G') => {
                self.cursor = self.snapshot.rows.len().saturating_sub(1);
                true
            }
            KeyCode::Char('n') | KeyCode::Right => {
                self.next_page();
                true
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.prev_page();
                true
            }
            KeyCode::Char(' ') => {
                self.toggle_cursor_selection();
                true
            }
            KeyCode::Char('a') => {
                self.toggle_page_selection();
                true
            }
            KeyCode::Char('A') => {
                self.session.select_all_matching();
                true
            }
            KeyCode::Esc => {
                if self.session.selection_is_empty() {
                    false
                } else {
                    self.session.deselect_all();
                    true
                }
            }
            KeyCode::Char('<') | KeyCode::Char('[') => {
                self.sort_target = self.sort_target.saturating_sub(1);
                true
            }
            KeyCode::Char('>') | KeyCode::Char(']') => {
                let max = self.layout.visible().len().saturating_sub(1);
                self.sort_target = (self.sort_target + 1).min(max);
                true
            }
            KeyCode::Char('s') => {
                self.toggle_sort_at_target();
                true
            }
            KeyCode::Char('c') => {
                self.session.clear_filters();
                true
            }
            KeyCode::Char('C') => {
                self.toggle_target_column();
                true
            }
            KeyCode::Char('=') => {
                if self.target_filter_field().is_some() {
                    self.filter_prompt = Some(Input::default());
                }
                true
            }
            KeyCode::Char('r') => {
                self.session.refresh();
                true
            }
            _ => false,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.snapshot.rows.len();
        if len == 0 {
            return;
        }
        let next = self
            .cursor
            .saturating_add_signed(delta)
            .min(len - 1);
        self.cursor = next;
    }

    fn next_page(&mut self) {
        let page = self.session.page();
        if page.wire_page() < page.page_count(self.snapshot.total_count) {
            self.session.set_page(page.page + 1);
            self.cursor = 0;
        }
    }

    fn prev_page(&mut self) {
        let page = self.session.page();
        if page.page > 0 {
            self.session.set_page(page.page - 1);
            self.cursor = 0;
        }
    }

    fn toggle_cursor_selection(&mut self) {
        let Some(id) = self.cursor_id() else { return };
        if self.session.is_selected(&id) {
            self.session.deselect_one(&id);
        } else {
            self.session.select_one(id);
        }
        self.move_cursor(1);
    }

    fn toggle_page_selection(&mut self) {
        let ids = self.page_ids();
        if self.session.selection_state(&ids) == SelectionState::PageSelected {
            self.session.deselect_page(&ids);
        } else {
            self.session.select_page(ids);
        }
    }

    fn toggle_sort_at_target(&mut self) {
        let visible = self.layout.visible();
        let Some(col) = visible.get(self.sort_target) else {
            return;
        };
        if !col.sortable {
            return;
        }
        let label = col.label;
        self.session.toggle_sort(label);
        self.cursor = 0;
    }

    /// Filter field and label of the column under the sort target, when
    /// that column hosts an inline header filter.
    fn target_filter_field(&self) -> Option<(&'static str, &'static str)> {
        let col = *self.layout.visible().get(self.sort_target)?;
        col.filter_field.map(|field| (field, col.label))
    }

    /// Hide/show the column under the sort target, persisting the layout.
    fn toggle_target_column(&mut self) {
        let Some(id) = self.layout.visible().get(self.sort_target).map(|c| c.id) else {
            return;
        };
        self.layout.toggle_column(id);
        self.sort_target = self
            .sort_target
            .min(self.layout.visible().len().saturating_sub(1));
        self.persist_columns();
    }

    /// Persist the column layout after an enable/disable toggle.
    fn persist_columns(&self) {
        let prefs: Vec<ColumnPref> = self.layout.prefs().to_vec();
        self.settings.save_columns(self.name, &prefs);
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the chips line + table into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str, focused: bool) {
        let chip_line = chips::chips_line(
            self.session.query().as_deref(),
            &self.session.active_filters(),
        );

        let layout = ratatui::layout::Layout::vertical([
            ratatui::layout::Constraint::Length(1),
            ratatui::layout::Constraint::Min(1),
        ])
        .split(area);

        frame.render_widget(ratatui::widgets::Paragraph::new(chip_line), layout[0]);

        let selection_suffix = if self.session.selection_is_empty() {
            String::new()
        } else if self.session.bulk_scope().is_some_and(|s| s.id_count().is_none()) {
            " \u{2502} ALL matching selected".into()
        } else {
            format!(" \u{2502} {} selected", self.session.selection_count())
        };

        let sort = self.session.sort();
        let view = TableView {
            title: format!("{title}{selection_suffix}"),
            layout: &self.layout,
            snapshot: &self.snapshot,
            page: self.session.page(),
            sort: &sort,
            cursor: self.cursor,
            sort_target: self.sort_target,
            focused,
        };
        let session = &self.session;
        let row_id = self.row_id;
        view.render(frame, layout[1], |row| session.is_selected(row_id(row)));

        if let (Some(input), Some((_, label))) = (&self.filter_prompt, self.target_filter_field())
        {
            let popup = Popup::new(input.value().to_owned())
                .title(format!("Filter: {label}"));
            frame.render_widget(popup, frame.area());
        }
    }
}
