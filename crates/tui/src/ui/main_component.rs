use colorevolve_types::{Effect, Msg};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::widgets::{Clear, Wrap};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Paragraph},
};

use super::components::{Component, ExtractionComponent, InputsComponent, PaletteTableComponent, PreviewComponent};
use rat_focus::HasFocus;

use super::focus::FocusTarget;
use super::theme::theme_helpers as th;
use super::utils::centered_rect;
use crate::app::App;

/// Root view: generation form and extraction on the left, palette table and
/// preview on the right, hints at the bottom and the alert modal on top.
#[derive(Debug, Default)]
pub struct MainView {
    inputs: InputsComponent,
    extraction: ExtractionComponent,
    table: PaletteTableComponent,
    preview: PreviewComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The component owning the focused control.
    fn focused_component(&mut self, app: &App) -> Option<&mut dyn Component> {
        if app.inputs.is_focused() {
            Some(&mut self.inputs)
        } else if app.extraction.is_focused() {
            Some(&mut self.extraction)
        } else if app.table.is_focused() {
            Some(&mut self.table)
        } else {
            None
        }
    }

    /// Bracketed paste goes into whichever text field has focus.
    pub fn handle_paste(&mut self, app: &mut App, text: &str) -> Vec<Effect> {
        if !app.alerts.is_empty() {
            return Vec::new();
        }
        match app.focused_target() {
            Some(FocusTarget::HexText(pair)) => {
                let Some(linked) = app.inputs.pair_mut(pair) else {
                    return Vec::new();
                };
                linked.text_mut().insert_str(text.trim());
                let text = linked.text().input().to_string();
                app.update(&Msg::HexTextChanged { pair, text })
            }
            Some(FocusTarget::ExtractionSource(kind)) => {
                let source = app.extraction.flow_mut(kind).source_mut();
                source.insert_str(text);
                let text = source.input().to_string();
                app.update(&Msg::ExtractionSourceChanged { kind, text })
            }
            _ => Vec::new(),
        }
    }

    fn render_alert(frame: &mut Frame, app: &App, message: &str) {
        let theme = &*app.ctx.theme;
        frame.render_widget(Block::default().style(theme.modal_background_style()).dim(), frame.area());

        let area = centered_rect(50, 30, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::bordered()
            .title(Span::styled(" Alert ", theme.status_error().add_modifier(Modifier::BOLD)))
            .border_style(theme.status_error())
            .style(th::panel_style(theme));
        let pending = app.alerts.len().saturating_sub(1);
        let mut lines = vec![
            Line::from(Span::styled(message.to_string(), theme.text_primary_style())),
            Line::default(),
        ];
        if pending > 0 {
            lines.push(Line::from(Span::styled(format!("{pending} more pending"), theme.text_muted_style())));
        }
        lines.push(Line::from(th::build_hint_spans(theme, &[("Enter", " Dismiss")])));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
    }

    fn layout(area: Rect) -> [Rect; 5] {
        let [content, hints] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [left, right] = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(content);
        let [inputs, extraction] = Layout::vertical([Constraint::Min(18), Constraint::Length(14)]).areas(left);
        let [table, preview] = Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(right);
        [inputs, extraction, table, preview, hints]
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        // The alert is modal: it swallows input until dismissed.
        if !app.alerts.is_empty() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.update(&Msg::DismissAlert),
                _ => Vec::new(),
            };
        }

        if key.code == KeyCode::Char('e') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return app.update(&Msg::ExportChart);
        }

        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Vec::new()
            }
            _ => match self.focused_component(app) {
                Some(component) => component.handle_key_events(app, key),
                None => Vec::new(),
            },
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !app.alerts.is_empty() {
            return Vec::new();
        }
        let mut effects = self.inputs.handle_mouse_events(app, mouse);
        effects.extend(self.extraction.handle_mouse_events(app, mouse));
        effects.extend(self.table.handle_mouse_events(app, mouse));
        effects
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", theme.text_muted_style())];
        if app.inputs.is_focused() {
            hint_spans.extend(self.inputs.get_hint_spans(app));
        } else if app.extraction.is_focused() {
            hint_spans.extend(self.extraction.get_hint_spans(app));
        } else if app.table.is_focused() {
            hint_spans.extend(self.table.get_hint_spans(app));
        }
        hint_spans.extend(th::build_hint_spans(
            theme,
            &[("Tab", " Next field  "), ("Ctrl+E", " Export chart  "), ("Ctrl+Q", " Quit ")],
        ));
        hint_spans
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let [inputs, extraction, table, preview, hints] = Self::layout(area);
        self.inputs.render(frame, inputs, app);
        self.extraction.render(frame, extraction, app);
        self.table.render(frame, table, app);
        self.preview.render(frame, preview, app);

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        frame.render_widget(
            Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style()),
            hints,
        );

        if let Some(message) = app.alerts.current() {
            let message = message.to_string();
            Self::render_alert(frame, app, &message);
        }
    }
}
