//! Compliance screen -- call-review table with status/flagged filters
//! and bulk deletion.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;

use backdesk_core::table::FilterValue;
use backdesk_core::{ComplianceSource, RecentActions, Settings, TableSession, views};

use crate::action::{Action, BulkAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

use super::list_screen::ListScreen;

/// Status filter cycle for the `f` key.
const STATUS_CYCLE: [Option<&str>; 5] = [
    None,
    Some("pending"),
    Some("approved"),
    Some("rejected"),
    Some("escalated"),
];

pub struct ComplianceScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    list: ListScreen<ComplianceSource>,
    status_idx: usize,
    flagged_only: bool,
    recent: RecentActions,
}

impl ComplianceScreen {
    pub fn new(session: TableSession<ComplianceSource>, settings: Settings) -> Self {
        Self {
            focused: false,
            action_tx: None,
            list: ListScreen::new(
                session,
                views::compliance::columns(),
                views::compliance::row_id,
                views::compliance::NAME,
                settings,
            ),
            status_idx: 0,
            flagged_only: false,
            recent: RecentActions::default(),
        }
    }

    fn cycle_status_filter(&mut self) {
        self.status_idx = (self.status_idx + 1) % STATUS_CYCLE.len();
        match STATUS_CYCLE[self.status_idx] {
            Some(status) => self
                .list
                .session
                .set_filter("status", FilterValue::Text(status.into())),
            None => self.list.session.remove_filter("status"),
        }
    }

    fn toggle_flagged_filter(&mut self) {
        self.flagged_only = !self.flagged_only;
        if self.flagged_only {
            self.list
                .session
                .set_filter("flagged", FilterValue::Flag(true));
        } else {
            self.list.session.remove_filter("flagged");
        }
    }

    fn request_delete(&mut self) -> Option<Action> {
        let scope = self.list.session.bulk_scope()?;
        if let Some(id) = self.list.cursor_id() {
            self.recent.record(id, "delete");
        }
        Some(Action::RequestBulk(
            BulkAction::DeleteCompliances { scope },
            self.list.snapshot.total_count,
        ))
    }
}

impl Component for ComplianceScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.list.handle_common_key(key) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('f') => {
                self.cycle_status_filter();
                Ok(None)
            }
            KeyCode::Char('F') => {
                self.toggle_flagged_filter();
                Ok(None)
            }
            KeyCode::Char('x') => Ok(self.request_delete()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ComplianceSnapshot(snapshot) => {
                self.list.apply_snapshot(snapshot);
            }
            Action::SearchInput(text) => {
                self.list.session.set_query_input(text.clone());
            }
            Action::CloseSearch => {
                self.list.session.set_query_input(String::new());
            }
            Action::BulkDone { screen, result } if *screen == ScreenId::Compliance => {
                if result.is_ok() {
                    self.list.session.deselect_all();
                    self.list.session.refresh_after_mutation();
                    self.recent.clear();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        self.list
            .render(frame, layout[0], "Compliance calls", self.focused);

        let filter_label = STATUS_CYCLE[self.status_idx].unwrap_or("all");
        // Highlight which action last touched the row under the cursor.
        let last_action = self
            .list
            .cursor_id()
            .and_then(|id| self.recent.get(&id).map(ToOwned::to_owned));
        let mut spans = vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("space ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("a/A ", theme::key_hint_key()),
            Span::styled("page/all  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled(format!("status [{filter_label}]  "), theme::key_hint()),
            Span::styled("F ", theme::key_hint_key()),
            Span::styled("flagged  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("sort  ", theme::key_hint()),
            Span::styled("x ", theme::key_hint_key()),
            Span::styled("delete", theme::key_hint()),
        ];
        if let Some(action) = last_action {
            spans.push(Span::styled(
                format!("  \u{00b7} last: {action}"),
                theme::row_checked(),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), layout[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Compliance"
    }
}
