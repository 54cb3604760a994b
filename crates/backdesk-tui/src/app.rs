//! Application core -- event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tui_popup::Popup;

use backdesk_api::ApiClient;
use backdesk_core::bulk::{self, LabelDiff};
use backdesk_core::Settings;

use crate::action::{Action, BulkAction, Notification, NotificationLevel};
use crate::bridge::{self, SessionHandles};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{ComplianceScreen, CustomersScreen, RewardsScreen};
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    sessions: SessionHandles,
    api: Arc<ApiClient>,
    running: bool,
    help_visible: bool,
    /// Search overlay input; `Some` while the user is typing.
    search: Option<Input>,
    /// Latest toast plus its display deadline.
    notification: Option<(Notification, Instant)>,
    /// Bulk action awaiting explicit confirmation.
    pending_confirm: Option<(BulkAction, u64)>,
    cancel: CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(api: Arc<ApiClient>, settings: Settings) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let sessions = bridge::build_sessions(&api, &settings, &action_tx, &cancel);

        let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
        screens.insert(
            ScreenId::Compliance,
            Box::new(ComplianceScreen::new(
                sessions.compliance.clone(),
                settings.clone(),
            )),
        );
        screens.insert(
            ScreenId::Customers,
            Box::new(CustomersScreen::new(
                sessions.customers.clone(),
                settings.clone(),
            )),
        );
        screens.insert(
            ScreenId::Rewards,
            Box::new(RewardsScreen::new(sessions.rewards.clone(), settings)),
        );

        Self {
            active_screen: ScreenId::default(),
            screens,
            sessions,
            api,
            running: true,
            help_visible: false,
            search: None,
            notification: None,
            pending_confirm: None,
            cancel,
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if matches!(action, Action::Render) {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.cancel.cancel();
        self.sessions.compliance.shutdown();
        self.sessions.customers.shutdown();
        self.sessions.rewards.shutdown();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────────

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Confirmation dialog swallows everything.
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        // Live search: every keystroke streams into the debounced query.
        if let Some(input) = &mut self.search {
            return Ok(match key.code {
                KeyCode::Esc => Some(Action::CloseSearch),
                KeyCode::Enter => {
                    // Keep the applied query, just leave search mode.
                    self.search = None;
                    None
                }
                _ => {
                    input.handle_event(&crossterm::event::Event::Key(key));
                    Some(Action::SearchInput(input.value().to_owned()))
                }
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='3')) => {
                #[allow(clippy::as_conversions)]
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        // Delegate to the active screen.
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    // ── Action processing ────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                if let Some((_, deadline)) = &self.notification {
                    if Instant::now() >= *deadline {
                        self.notification = None;
                    }
                }
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::OpenSearch => {
                self.search = Some(Input::default());
            }

            Action::CloseSearch => {
                self.search = None;
                self.deliver_to_active(action)?;
            }

            Action::SearchInput(_) => {
                // Only the visible table reacts to typing.
                self.deliver_to_active(action)?;
            }

            Action::RequestBulk(bulk_action, total) => {
                if bulk::needs_confirmation(bulk_action.scope()) {
                    self.pending_confirm = Some((bulk_action.clone(), *total));
                } else {
                    self.execute_bulk(bulk_action.clone());
                }
            }

            Action::ConfirmYes => {
                if let Some((bulk_action, _)) = self.pending_confirm.take() {
                    self.execute_bulk(bulk_action);
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            Action::BulkDone { result, .. } => {
                let notification = match result {
                    Ok(msg) => Notification::success(*msg),
                    Err(msg) => Notification::error(msg.clone()),
                };
                self.notification = Some((notification, Instant::now() + NOTIFICATION_TTL));
                self.broadcast(action)?;
            }

            Action::Notify(notification) => {
                self.notification =
                    Some((notification.clone(), Instant::now() + NOTIFICATION_TTL));
            }

            Action::DismissNotification => self.notification = None,

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Render | Action::Resize(..) => {}

            // Data updates go to every screen.
            _ => self.broadcast(action)?,
        }
        Ok(())
    }

    fn deliver_to_active(&mut self, action: &Action) -> Result<()> {
        let mut follow_ups = Vec::new();
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        let mut follow_ups = Vec::new();
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Run a bulk mutation in the background; completion comes back as
    /// a [`Action::BulkDone`].
    fn execute_bulk(&self, bulk_action: BulkAction) {
        let screen = match &bulk_action {
            BulkAction::DeleteCompliances { .. } => ScreenId::Compliance,
            _ => ScreenId::Customers,
        };
        let api = Arc::clone(&self.api);
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = match bulk_action {
                BulkAction::Relabel {
                    scope,
                    added,
                    removed,
                } => bulk::apply_label_diff(&api, &scope, &LabelDiff { added, removed })
                    .await
                    .map(|()| "labels updated")
                    .map_err(|e| e.to_string()),
                BulkAction::Announce {
                    scope,
                    announcement_id,
                } => api
                    .set_customer_announcement(scope, announcement_id)
                    .await
                    .map(|()| "announcement attached")
                    .map_err(|e| e.to_string()),
                BulkAction::DeleteCustomers { scope } => api
                    .delete_customers(scope)
                    .await
                    .map(|()| "customers deleted")
                    .map_err(|e| e.to_string()),
                BulkAction::DeleteCompliances { scope } => api
                    .delete_compliances(scope)
                    .await
                    .map(|()| "records deleted")
                    .map_err(|e| e.to_string()),
            };
            let _ = tx.send(Action::BulkDone { screen, result });
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // active screen
            Constraint::Length(1), // status line
        ])
        .split(frame.area());

        self.render_tab_bar(frame, layout[0]);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_status_line(frame, layout[2]);

        if let Some((bulk_action, total)) = &self.pending_confirm {
            let text = format!(
                "{}\n\ny confirm \u{00b7} n cancel",
                bulk::confirm_summary(bulk_action.verb(), bulk_action.scope(), *total)
            );
            let popup = Popup::new(text).title("Confirm");
            frame.render_widget(popup, frame.area());
        }

        if self.help_visible {
            let popup = Popup::new(help_text()).title("Keys");
            frame.render_widget(popup, frame.area());
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|s| Line::from(format!(" {} {} ", s.number(), s.label())))
            .collect();
        let selected = ScreenId::ALL
            .iter()
            .position(|s| *s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(theme::tab_inactive())
            .highlight_style(theme::tab_active());
        frame.render_widget(tabs, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        // Search input takes priority, then the toast, then key hints.
        if let Some(input) = &self.search {
            let line = Line::from(vec![
                Span::styled(" / ", theme::key_hint_key()),
                Span::raw(input.value().to_owned()),
                Span::styled("\u{2588}", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        if let Some((notification, _)) = &self.notification {
            let style = match notification.level {
                NotificationLevel::Error => ratatui::style::Style::default().fg(theme::ERROR_RED),
                NotificationLevel::Warning => ratatui::style::Style::default().fg(theme::AMBER),
                NotificationLevel::Success => {
                    ratatui::style::Style::default().fg(theme::SUCCESS_GREEN)
                }
                NotificationLevel::Info => ratatui::style::Style::default().fg(theme::FOG),
            };
            let line = Line::from(Span::styled(format!(" {}", notification.message), style));
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let hints = Line::from(vec![
            Span::styled(" / ", theme::key_hint_key()),
            Span::styled("search  ", theme::key_hint()),
            Span::styled("1-3 ", theme::key_hint_key()),
            Span::styled("screens  ", theme::key_hint()),
            Span::styled("? ", theme::key_hint_key()),
            Span::styled("help  ", theme::key_hint()),
            Span::styled("q ", theme::key_hint_key()),
            Span::styled("quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }
}

fn help_text() -> String {
    [
        "j/k      move cursor",
        "n/p      next/previous page",
        "space    toggle row selection",
        "a        select/deselect page",
        "A        select ALL matching filter",
        "Esc      clear selection",
        "/        search (debounced)",
        "f F      cycle filters",
        "</> s    pick column, toggle sort",
        "=        filter on the picked column",
        "C        hide/show the picked column",
        "c        clear filters",
        "r        refresh",
        "l e x    label / announce / delete (Customers)",
        "q        quit",
    ]
    .join("\n")
}
