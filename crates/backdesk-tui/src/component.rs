//! Component trait -- the building block for every UI element.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// Every UI element implements Component.
///
/// Lifecycle: `init` → (`handle_key_event` | `update` | `render`)*
pub trait Component: Send {
    /// Called once when the component is mounted.
    /// Receives the action sender for dispatching actions to the app loop.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently holds input focus.
    fn focused(&self) -> bool {
        false
    }

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}

    /// Unique identifier for this component.
    fn id(&self) -> &'static str;
}
