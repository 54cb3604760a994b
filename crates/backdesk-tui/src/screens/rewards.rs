//! IB rewards screen -- read-only reward configuration table with a
//! tier filter and an active-only toggle.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedSender;

use backdesk_core::table::FilterValue;
use backdesk_core::{RewardSource, Settings, TableSession, views};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

use super::list_screen::ListScreen;

const TIER_CYCLE: [Option<&str>; 4] = [None, Some("bronze"), Some("silver"), Some("gold")];

pub struct RewardsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    list: ListScreen<RewardSource>,
    tier_idx: usize,
    active_only: bool,
}

impl RewardsScreen {
    pub fn new(session: TableSession<RewardSource>, settings: Settings) -> Self {
        Self {
            focused: false,
            action_tx: None,
            list: ListScreen::new(
                session,
                views::rewards::columns(),
                views::rewards::row_id,
                views::rewards::NAME,
                settings,
            ),
            tier_idx: 0,
            active_only: false,
        }
    }

    fn cycle_tier_filter(&mut self) {
        self.tier_idx = (self.tier_idx + 1) % TIER_CYCLE.len();
        match TIER_CYCLE[self.tier_idx] {
            Some(tier) => self
                .list
                .session
                .set_filter("tier", FilterValue::Text(tier.into())),
            None => self.list.session.remove_filter("tier"),
        }
    }

    fn toggle_active_filter(&mut self) {
        self.active_only = !self.active_only;
        if self.active_only {
            self.list
                .session
                .set_filter("active", FilterValue::Flag(true));
        } else {
            self.list.session.remove_filter("active");
        }
    }
}

impl Component for RewardsScreen {
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
                self.cycle_tier_filter();
                Ok(None)
            }
            KeyCode::Char('F') => {
                self.toggle_active_filter();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RewardsSnapshot(snapshot) => {
                self.list.apply_snapshot(snapshot);
            }
            Action::SearchInput(text) => {
                self.list.session.set_query_input(text.clone());
            }
            Action::CloseSearch => {
                self.list.session.set_query_input(String::new());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        self.list.render(frame, layout[0], "IB rewards", self.focused);

        let tier_label = TIER_CYCLE[self.tier_idx].unwrap_or("all");
        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("n/p ", theme::key_hint_key()),
            Span::styled("page  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled(format!("tier [{tier_label}]  "), theme::key_hint()),
            Span::styled("F ", theme::key_hint_key()),
            Span::styled("active-only  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("sort", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Rewards"
    }
}
