//! Palette table: one swatch strip per row with the three metric columns.
//!
//! Rows are drawn as lines rather than a `Table` so the baseline label can
//! span all metric columns.

use colorevolve_types::{COLOR_ROLES, Effect, Msg};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rat_focus::HasFocus;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::state::{BASELINE_LABEL, PaletteRow, RowKind};
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const RANK_WIDTH: usize = 6;
const SWATCH_WIDTH: usize = 4;
const CONTRAST_WIDTH: usize = 12;
const DELTA_E_WIDTH: usize = 10;

#[derive(Debug, Default)]
pub struct PaletteTableComponent;

impl PaletteTableComponent {
    fn header_line<'a>(theme: &dyn Theme) -> Line<'a> {
        let palette_width = SWATCH_WIDTH * 3 + 3;
        Line::from(format!(
            "  {:<RANK_WIDTH$}{:<palette_width$}{:<CONTRAST_WIDTH$}{:<DELTA_E_WIDTH$}{}",
            "#", "Palette", "Contrast", "ΔE", "Daltonism"
        ))
        .style(th::table_header_row_style(theme))
    }

    fn row_line<'a>(theme: &dyn Theme, row: &PaletteRow, active: bool, highlighted: bool) -> Line<'a> {
        let marker = if active { "● " } else { "  " };
        let rank = match row.kind {
            RowKind::Baseline => "base".to_string(),
            RowKind::Optimized { rank } => rank.to_string(),
        };
        let text_style = if row.is_baseline() {
            theme.text_muted_style().add_modifier(Modifier::ITALIC)
        } else {
            theme.text_primary_style()
        };

        let mut spans = vec![
            Span::styled(marker, theme.accent_emphasis_style()),
            Span::styled(format!("{rank:<RANK_WIDTH$}"), text_style),
        ];
        for color in &row.colors {
            spans.push(th::swatch_span(color, SWATCH_WIDTH));
            spans.push(Span::raw(" "));
        }
        match &row.metrics {
            Some(metrics) => {
                spans.push(Span::styled(format!("{:<CONTRAST_WIDTH$}", metrics.contrast), text_style));
                spans.push(Span::styled(format!("{:<DELTA_E_WIDTH$}", metrics.delta_e), text_style));
                spans.push(Span::styled(metrics.daltonism.clone(), text_style));
            }
            None => spans.push(Span::styled(BASELINE_LABEL, text_style)),
        }

        let mut line = Line::from(spans);
        if highlighted {
            line = line.style(th::table_selected_style(theme));
        } else if active {
            line = line.style(theme.selection_style());
        }
        line
    }

    /// Hex values of the row under the cursor, standing in for a hover
    /// tooltip on the swatches.
    fn detail_line<'a>(theme: &dyn Theme, row: &PaletteRow) -> Line<'a> {
        let mut spans = Vec::with_capacity(COLOR_ROLES.len() * 3);
        for (role, color) in COLOR_ROLES.iter().zip(&row.colors) {
            spans.push(th::swatch_span(color, 2));
            spans.push(Span::styled(format!(" {role} "), theme.text_secondary_style()));
            spans.push(Span::styled(format!("{color}  "), theme.text_primary_style()));
        }
        Line::from(spans)
    }
}

impl Component for PaletteTableComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if !app.generation.results_visible() {
            return Vec::new();
        }
        match key.code {
            KeyCode::Up => app.table.move_cursor(-1),
            KeyCode::Down => app.table.move_cursor(1),
            KeyCode::PageUp => app.table.move_cursor(-10),
            KeyCode::PageDown => app.table.move_cursor(10),
            KeyCode::Home => app.table.move_cursor(isize::MIN),
            KeyCode::End => app.table.move_cursor(isize::MAX),
            KeyCode::Enter | KeyCode::Char(' ') if !app.table.is_empty() => {
                let cursor = app.table.cursor();
                return app.update(&Msg::RowClicked(cursor));
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match app.table.row_at(mouse.column, mouse.row) {
                Some(index) => {
                    app.focus.focus(&app.table);
                    app.update(&Msg::RowClicked(index))
                }
                None => Vec::new(),
            },
            MouseEventKind::ScrollDown if app.table.row_at(mouse.column, mouse.row).is_some() => {
                app.table.move_cursor(1);
                Vec::new()
            }
            MouseEventKind::ScrollUp if app.table.row_at(mouse.column, mouse.row).is_some() => {
                app.table.move_cursor(-1);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(&*app.ctx.theme, &[("↑/↓", " Move  "), ("Enter", " Preview  ")])
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let focused = app.table.is_focused();
        let title = format!("Palettes ({})", app.generation.palette_count());
        let block = th::block(theme, Some(&title), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !app.generation.results_visible() {
            let hint = if app.generation.busy().is_loading() {
                "Generating palettes…"
            } else {
                "No palettes yet."
            };
            frame.render_widget(Paragraph::new(Span::styled(hint, theme.text_muted_style())), inner);
            app.table.set_layout(Rect::default(), 0);
            return;
        }

        let [header_area, body_area, detail_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        frame.render_widget(Paragraph::new(Self::header_line(theme)), header_area);
        if let Some(row) = app.table.cursor_row() {
            frame.render_widget(Paragraph::new(Self::detail_line(theme, row)), detail_area);
        }

        let visible = usize::from(body_area.height).max(1);
        let cursor = app.table.cursor();
        let mut offset = app.table.offset().min(cursor);
        if cursor >= offset + visible {
            offset = cursor + 1 - visible;
        }

        let lines: Vec<Line> = app
            .table
            .rows()
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(index, row)| Self::row_line(theme, row, app.table.is_active(index), focused && index == cursor))
            .collect();
        frame.render_widget(Paragraph::new(lines), body_area);
        app.table.set_layout(body_area, offset);
    }
}
