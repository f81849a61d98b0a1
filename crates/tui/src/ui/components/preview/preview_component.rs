use colorevolve_types::HexColor;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

use super::chart::ChartImage;
use super::state::{ColorInfo, Mockup};
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const SAMPLE_TEXT: &str = "Good color choices keep text readable for everyone while staying pleasant to look at.";

/// Website mockup painted with the active palette, plus per-color info and
/// the convergence chart.
#[derive(Debug, Default)]
pub struct PreviewComponent;

impl PreviewComponent {
    fn fill(color: &HexColor) -> Style {
        Style::default().bg(th::swatch_color(color)).fg(th::text_on(color))
    }

    fn render_mockup(frame: &mut Frame, area: Rect, mockup: &Mockup) {
        let [header_area, content_area] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        let header_style = Self::fill(&mockup.header_background);
        frame.render_widget(Block::default().style(header_style), header_area);
        let [logo_area, nav_area] = Layout::horizontal([Constraint::Min(12), Constraint::Length(24)])
            .areas(header_area.inner(Margin::new(2, 1)));
        frame.render_widget(
            Paragraph::new(Span::styled("ColorEvolve", header_style.add_modifier(Modifier::BOLD))),
            logo_area,
        );
        frame.render_widget(Paragraph::new(Span::styled("Home  Gallery  Contact", header_style)).right_aligned(), nav_area);

        let content_style = Self::fill(&mockup.content_background);
        frame.render_widget(Block::default().style(content_style), content_area);
        let [title_area, text_area, button_row] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(content_area.inner(Margin::new(2, 1)));

        let title_style = content_style
            .fg(th::swatch_color(&mockup.title_color))
            .add_modifier(Modifier::BOLD);
        frame.render_widget(Paragraph::new(Span::styled("Accessible Design", title_style)), title_area);
        frame.render_widget(
            Paragraph::new(Span::styled(SAMPLE_TEXT, content_style)).wrap(Wrap { trim: true }),
            text_area,
        );

        let [button_area, _] = Layout::horizontal([Constraint::Length(17), Constraint::Min(0)]).areas(button_row);
        let button_style = Style::default()
            .bg(th::swatch_color(&mockup.button_background))
            .fg(th::swatch_color(&mockup.button_text))
            .add_modifier(Modifier::BOLD);
        frame.render_widget(Paragraph::new(" Action button ").style(button_style), button_area);
    }

    fn info_line<'a>(theme: &dyn Theme, info: &ColorInfo) -> Line<'a> {
        let mut spans = vec![
            th::swatch_span(&info.color, 3),
            Span::styled(format!(" {:<11}", info.role), theme.text_secondary_style()),
            Span::styled(info.color.to_string(), theme.text_primary_style()),
        ];
        if let Some(diff) = &info.diff {
            spans.push(Span::styled("   ", theme.text_muted_style()));
            spans.push(th::swatch_span(&diff.before, 2));
            spans.push(Span::styled(format!(" {} → {} ", diff.before, diff.after), theme.status_warning()));
            spans.push(th::swatch_span(&diff.after, 2));
        }
        Line::from(spans)
    }

    fn chart_line<'a>(app: &App) -> Line<'a> {
        let theme = &*app.ctx.theme;
        let Some(chart) = app.generation.chart() else {
            return Line::from(Span::styled("Convergence chart: none", theme.text_muted_style()));
        };
        let dimensions = app
            .generation
            .chart_image()
            .map(ChartImage::dimensions)
            .or_else(|| chart.png_dimensions())
            .map_or_else(|| "unknown size".to_string(), |(width, height)| format!("{width}×{height}"));
        let mut spans = vec![
            Span::styled("Convergence chart: ", theme.text_secondary_style()),
            Span::styled(format!("{dimensions} PNG, {} bytes", chart.len()), theme.text_primary_style()),
        ];
        if let Some(path) = &app.last_export {
            spans.push(Span::styled(format!("  saved to {}", path.display()), theme.status_success()));
        }
        Line::from(spans)
    }
}

impl Component for PreviewComponent {
    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Preview"), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(preview) = app.preview.as_ref().filter(|_| app.generation.results_visible()) else {
            let hint = if app.generation.busy().is_loading() {
                "Generating palettes…"
            } else {
                "Generate palettes and pick a row to preview it."
            };
            frame.render_widget(Paragraph::new(Span::styled(hint, theme.text_muted_style())), inner);
            return;
        };

        let chart_image = app.generation.chart_image();
        let chart_constraint = if chart_image.is_some() {
            Constraint::Percentage(40)
        } else {
            Constraint::Length(0)
        };
        let [mockup_area, _, info_area, caption_area, chart_area] = Layout::vertical([
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            chart_constraint,
        ])
        .areas(inner);

        Self::render_mockup(frame, mockup_area, &preview.mockup);
        let info: Vec<Line> = preview.info.iter().map(|info| Self::info_line(theme, info)).collect();
        frame.render_widget(Paragraph::new(info), info_area);
        frame.render_widget(Paragraph::new(Self::chart_line(app)), caption_area);
        if let Some(image) = chart_image {
            frame.render_widget(image, chart_area);
        }
    }
}
