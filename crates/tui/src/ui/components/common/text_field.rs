use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::Paragraph,
};

use super::TextInputState;
use crate::ui::theme::{Theme, theme_helpers as th};

/// Draws a single-line bordered text field and, when focused, places the
/// terminal cursor at the edit position.
pub fn render_text_field<T: Theme + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    state: &TextInputState,
    title: &str,
    focused: bool,
    theme: &T,
) {
    let block = th::block(theme, Some(title), focused);
    let inner = block.inner(area);
    let (window, column) = state.visible_window(usize::from(inner.width));
    // Pasted HTML keeps its line breaks; show them as spaces on one line.
    let window = window.replace(['\n', '\r', '\t'], " ");
    frame.render_widget(
        Paragraph::new(window).style(th::input_style(theme, focused)).block(block),
        area,
    );
    if focused && inner.width > 0 && inner.height > 0 {
        let x = inner.x + u16::try_from(column).unwrap_or(inner.width).min(inner.width - 1);
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}
