//! Component system for the controller UI.
//!
//! Components translate terminal input into [`Msg`]s, run them through
//! `App::update`, and draw themselves into a provided `Rect`. They never
//! execute side effects; the `Effect`s they return are handed to the runtime.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};

use colorevolve_types::{Effect, Msg};

use crate::app::App;

/// A UI element with its own input handling and rendering.
///
/// # Lifecycle
///
/// 1. Key and mouse events arrive through `handle_key_events` and
///    `handle_mouse_events` while the component owns focus or area.
/// 2. Application messages are routed through `handle_message`.
/// 3. `render` draws the current state; it may record layout for later
///    hit-testing but must not change application state otherwise.
pub(crate) trait Component {
    /// Handle an application-level message.
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg)
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events inside the component's last rendered area.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Key hints shown in the hint bar while the component has focus.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
