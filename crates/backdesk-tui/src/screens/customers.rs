//! Customers screen -- customer table with label/announcement bulk
//! actions and a status filter.
//!
//! Bulk relabeling takes a comma-separated label-id expression in a
//! small input popup: `3,5 -2` assigns 3 and 5 and removes 2. The diff
//! against the currently-attached labels is computed before any call
//! goes out, so at most two batch requests are issued.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tui_popup::Popup;

use backdesk_core::table::FilterValue;
use backdesk_core::{CustomerSource, Label, RecentActions, Settings, TableSession, views};

use crate::action::{Action, BulkAction, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

use super::list_screen::ListScreen;

const STATUS_CYCLE: [Option<&str>; 5] = [
    None,
    Some("lead"),
    Some("active"),
    Some("dormant"),
    Some("closed"),
];

/// Which popup input is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    Labels,
    Announcement,
}

pub struct CustomersScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    list: ListScreen<CustomerSource>,
    status_idx: usize,
    labels: Vec<Label>,
    prompt: Option<(PromptKind, Input)>,
    recent: RecentActions,
}

impl CustomersScreen {
    pub fn new(session: TableSession<CustomerSource>, settings: Settings) -> Self {
        Self {
            focused: false,
            action_tx: None,
            list: ListScreen::new(
                session,
                views::customers::columns(),
                views::customers::row_id,
                views::customers::NAME,
                settings,
            ),
            status_idx: 0,
            labels: Vec::new(),
            prompt: None,
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

    /// Label ids attached to every selected row on the current page --
    /// the "checked" baseline the relabel expression diffs against.
    fn checked_labels(&self) -> Vec<u64> {
        let selected: Vec<_> = self
            .list
            .snapshot
            .rows
            .iter()
            .filter(|r| self.list.session.is_selected(&r.id))
            .collect();
        let Some(first) = selected.first() else {
            return Vec::new();
        };
        first
            .label_ids
            .iter()
            .filter(|id| selected.iter().all(|r| r.label_ids.contains(id)))
            .copied()
            .collect()
    }

    /// Parse `3,5 -2` into (assign, remove) id lists.
    fn parse_label_expr(expr: &str) -> Option<(Vec<u64>, Vec<u64>)> {
        let mut assign = Vec::new();
        let mut remove = Vec::new();
        for token in expr.split([',', ' ']).filter(|t| !t.is_empty()) {
            if let Some(rest) = token.strip_prefix('-') {
                remove.push(rest.parse().ok()?);
            } else {
                assign.push(token.parse().ok()?);
            }
        }
        Some((assign, remove))
    }

    fn submit_prompt(&mut self, kind: PromptKind, value: &str) -> Option<Action> {
        let scope = self.list.session.bulk_scope()?;
        if let Some(id) = self.list.cursor_id() {
            self.recent
                .record(id, if kind == PromptKind::Labels { "label" } else { "announce" });
        }
        let total = self.list.snapshot.total_count;

        match kind {
            PromptKind::Labels => {
                let (assign, remove) = Self::parse_label_expr(value)?;
                let checked = self.checked_labels();
                // Treat the expression as the delta the user asked for,
                // minus anything already in the desired state.
                let added: Vec<u64> = assign
                    .into_iter()
                    .filter(|id| !checked.contains(id))
                    .collect();
                let removed: Vec<u64> =
                    remove.into_iter().filter(|id| checked.contains(id)).collect();
                if added.is_empty() && removed.is_empty() {
                    return Some(Action::Notify(Notification::info("labels already match")));
                }
                Some(Action::RequestBulk(
                    BulkAction::Relabel { scope, added, removed },
                    total,
                ))
            }
            PromptKind::Announcement => {
                let announcement_id = value.trim().parse().ok()?;
                Some(Action::RequestBulk(
                    BulkAction::Announce { scope, announcement_id },
                    total,
                ))
            }
        }
    }

    fn request_delete(&mut self) -> Option<Action> {
        let scope = self.list.session.bulk_scope()?;
        if let Some(id) = self.list.cursor_id() {
            self.recent.record(id, "delete");
        }
        Some(Action::RequestBulk(
            BulkAction::DeleteCustomers { scope },
            self.list.snapshot.total_count,
        ))
    }

    fn render_prompt(&self, frame: &mut Frame, kind: PromptKind, input: &Input) {
        let title = match kind {
            PromptKind::Labels => "Labels (e.g. 3,5 -2)",
            PromptKind::Announcement => "Announcement id",
        };
        let known = if kind == PromptKind::Labels && !self.labels.is_empty() {
            let names: Vec<String> = self
                .labels
                .iter()
                .map(|l| format!("{}={}", l.id, l.name))
                .collect();
            format!("\n{}", names.join("  "))
        } else {
            String::new()
        };
        let body = format!("{}{known}", input.value());
        let popup = Popup::new(body).title(title);
        frame.render_widget(popup, frame.area());
    }
}

impl Component for CustomersScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Prompt mode swallows everything except Esc/Enter.
        if let Some((kind, input)) = &mut self.prompt {
            return match key.code {
                KeyCode::Esc => {
                    self.prompt = None;
                    Ok(None)
                }
                KeyCode::Enter => {
                    let kind = *kind;
                    let value = input.value().to_owned();
                    self.prompt = None;
                    Ok(self.submit_prompt(kind, &value))
                }
                _ => {
                    input.handle_event(&crossterm::event::Event::Key(key));
                    Ok(None)
                }
            };
        }

        if self.list.handle_common_key(key) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('f') => {
                self.cycle_status_filter();
                Ok(None)
            }
            KeyCode::Char('l') if !self.list.session.selection_is_empty() => {
                self.prompt = Some((PromptKind::Labels, Input::default()));
                Ok(None)
            }
            KeyCode::Char('e') if !self.list.session.selection_is_empty() => {
                self.prompt = Some((PromptKind::Announcement, Input::default()));
                Ok(None)
            }
            KeyCode::Char('x') => Ok(self.request_delete()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CustomersSnapshot(snapshot) => {
                self.list.apply_snapshot(snapshot);
            }
            Action::LabelsLoaded(labels) => {
                self.labels.clone_from(labels);
            }
            Action::SearchInput(text) => {
                self.list.session.set_query_input(text.clone());
            }
            Action::CloseSearch => {
                self.list.session.set_query_input(String::new());
            }
            Action::BulkDone { screen, result } if *screen == ScreenId::Customers => {
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

        self.list.render(frame, layout[0], "Customers", self.focused);

        let filter_label = STATUS_CYCLE[self.status_idx].unwrap_or("all");
        let last_action = self
            .list
            .cursor_id()
            .and_then(|id| self.recent.get(&id).map(ToOwned::to_owned));
        let mut spans = vec![
            Span::styled("  space ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("a/A ", theme::key_hint_key()),
            Span::styled("page/all  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled(format!("status [{filter_label}]  "), theme::key_hint()),
            Span::styled("l ", theme::key_hint_key()),
            Span::styled("labels  ", theme::key_hint()),
            Span::styled("e ", theme::key_hint_key()),
            Span::styled("announce  ", theme::key_hint()),
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

        if let Some((kind, input)) = &self.prompt {
            self.render_prompt(frame, *kind, input);
        }
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Customers"
    }
}
