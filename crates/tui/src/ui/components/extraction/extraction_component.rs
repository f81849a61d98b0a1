use colorevolve_types::{COLOR_ROLES, Effect, ExtractedColors, ExtractionKind, Msg};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::common::render_text_field;
use crate::ui::components::component::Component;
use crate::ui::focus::FocusTarget;
use crate::ui::theme::{Theme, theme_helpers as th};

/// URL and HTML extraction fields, their result previews and the apply
/// button.
#[derive(Debug, Default)]
pub struct ExtractionComponent {
    url_area: Rect,
    html_area: Rect,
    apply_area: Rect,
}

impl ExtractionComponent {
    fn handle_source_key(app: &mut App, kind: ExtractionKind, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Enter {
            return app.update(&Msg::ExtractRequested(kind));
        }
        let source = app.extraction.flow_mut(kind).source_mut();
        if !source.apply_key(key) {
            return Vec::new();
        }
        let text = source.input().to_string();
        app.update(&Msg::ExtractionSourceChanged { kind, text })
    }

    fn preview_line<'a>(theme: &dyn Theme, colors: Option<&ExtractedColors>) -> Line<'a> {
        let Some(colors) = colors else {
            return Line::from(Span::styled("  no colors extracted yet", theme.text_muted_style()));
        };
        let mut spans = vec![Span::raw("  ")];
        for (role, color) in COLOR_ROLES.iter().zip(colors.to_array()) {
            spans.push(th::swatch_span(&color, 2));
            spans.push(Span::styled(format!(" {role} {color}  "), theme.text_primary_style()));
        }
        Line::from(spans)
    }

    fn field_title(app: &App, kind: ExtractionKind) -> String {
        let name = match kind {
            ExtractionKind::Url => "Website URL",
            ExtractionKind::Html => "HTML code",
        };
        if app.extraction.flow(kind).busy().is_loading() {
            format!("{name} · extracting…")
        } else {
            format!("{name} · Enter to extract")
        }
    }
}

impl Component for ExtractionComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match app.extraction.focused_target() {
            Some(FocusTarget::ExtractionSource(kind)) => Self::handle_source_key(app, kind, key),
            Some(FocusTarget::ApplyExtracted) => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => app.update(&Msg::ApplyExtracted),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        if app.capabilities.has_extraction_apply && self.apply_area.contains(position) {
            app.focus.focus(&app.extraction.f_apply);
            return app.update(&Msg::ApplyExtracted);
        }
        if self.url_area.contains(position) {
            app.focus_on(FocusTarget::ExtractionSource(ExtractionKind::Url));
        } else if self.html_area.contains(position) {
            app.focus_on(FocusTarget::ExtractionSource(ExtractionKind::Html));
        }
        Vec::new()
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        match app.extraction.focused_target() {
            Some(FocusTarget::ExtractionSource(_)) => th::build_hint_spans(theme, &[("Enter", " Extract  ")]),
            Some(FocusTarget::ApplyExtracted) => th::build_hint_spans(theme, &[("Enter", " Apply to base colors  ")]),
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Extract colors"), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let apply_height = if app.capabilities.has_extraction_apply { 3 } else { 0 };
        let [url_area, url_preview, html_area, html_preview, apply_area, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(apply_height),
            Constraint::Min(0),
        ])
        .areas(inner);

        for (kind, field_area, preview_area) in [
            (ExtractionKind::Url, url_area, url_preview),
            (ExtractionKind::Html, html_area, html_preview),
        ] {
            let flow = app.extraction.flow(kind);
            let title = Self::field_title(app, kind);
            render_text_field(frame, field_area, flow.source(), &title, flow.f_source.get(), theme);
            frame.render_widget(Paragraph::new(Self::preview_line(theme, flow.preview())), preview_area);
        }
        self.url_area = url_area;
        self.html_area = html_area;

        self.apply_area = apply_area;
        if app.capabilities.has_extraction_apply {
            let [button_area, _] = Layout::horizontal([Constraint::Length(30), Constraint::Min(0)]).areas(apply_area);
            self.apply_area = button_area;
            th::render_button(
                frame,
                button_area,
                "Apply to base colors",
                app.extraction.can_apply(),
                app.extraction.f_apply.get(),
                theme,
            );
        }
    }
}
