//! Generation form: linked color pairs, sliders, WCAG level and the
//! generate button.

use colorevolve_types::{Effect, Msg, RgbChannel, SliderId, WcagLevel};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rat_focus::FocusFlag;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use super::state::{LinkedInputPair, SliderBinding};
use crate::app::App;
use crate::ui::components::common::render_text_field;
use crate::ui::components::component::Component;
use crate::ui::focus::FocusTarget;
use crate::ui::theme::{Theme, theme_helpers as th};

/// Picker step for PageUp/PageDown.
const COARSE_STEP: i16 = 16;
static FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn slider_title(id: SliderId) -> &'static str {
    match id {
        SliderId::PopulationSize => "Population size",
        SliderId::Generations => "Generations",
        SliderId::MutationProbability => "Mutation %",
        SliderId::InitialWeight => "Initial weight",
    }
}

#[derive(Debug, Default)]
pub struct InputsComponent {
    generate_area: Rect,
    pair_areas: Vec<(Rect, Rect)>,
}

impl InputsComponent {
    fn handle_picker_key(app: &mut App, pair: usize, key: KeyEvent) -> Vec<Effect> {
        let Some(linked) = app.inputs.pair_mut(pair) else {
            return Vec::new();
        };
        let channel = linked.channel();
        let delta = match key.code {
            KeyCode::Left => {
                linked.set_channel(channel.prev());
                return Vec::new();
            }
            KeyCode::Right => {
                linked.set_channel(channel.next());
                return Vec::new();
            }
            KeyCode::Up => 1,
            KeyCode::Down => -1,
            KeyCode::PageUp => COARSE_STEP,
            KeyCode::PageDown => -COARSE_STEP,
            _ => return Vec::new(),
        };
        let color = linked.picker().with_channel_delta(channel, delta);
        app.update(&Msg::PickerChanged { pair, color })
    }

    fn handle_hex_key(app: &mut App, pair: usize, key: KeyEvent) -> Vec<Effect> {
        let Some(linked) = app.inputs.pair_mut(pair) else {
            return Vec::new();
        };
        if !linked.text_mut().apply_key(key) {
            return Vec::new();
        }
        let text = linked.text().input().to_string();
        app.update(&Msg::HexTextChanged { pair, text })
    }

    fn handle_slider_key(app: &mut App, id: SliderId, key: KeyEvent) -> Vec<Effect> {
        let Some(slider) = app.inputs.slider(id) else {
            return Vec::new();
        };
        let (min, max) = slider.range();
        let value = match key.code {
            KeyCode::Left | KeyCode::Down => slider.value() - slider.step(),
            KeyCode::Right | KeyCode::Up => slider.value() + slider.step(),
            KeyCode::Home => min,
            KeyCode::End => max,
            _ => return Vec::new(),
        };
        app.update(&Msg::SliderChanged { slider: id, value })
    }

    fn handle_weight_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let current = app.inputs.accessibility().slider().value();
        let value = match key.code {
            KeyCode::Left | KeyCode::Down => current - 1,
            KeyCode::Right | KeyCode::Up => current + 1,
            KeyCode::PageDown => current - 10,
            KeyCode::PageUp => current + 10,
            _ => return Vec::new(),
        };
        app.update(&Msg::AccessibilityWeightChanged(value))
    }

    fn render_pair(frame: &mut Frame, area: Rect, app: &App, pair: &LinkedInputPair) -> (Rect, Rect) {
        let theme = &*app.ctx.theme;
        let [label_area, swatch_area, picker_area, text_area] = Layout::horizontal([
            Constraint::Length(11),
            Constraint::Length(4),
            Constraint::Length(19),
            Constraint::Min(11),
        ])
        .areas(area);

        let label = Paragraph::new(Line::from(Span::styled(pair.label(), theme.text_secondary_style())));
        frame.render_widget(label, label_area.inner(Margin::new(0, 1)));
        frame.render_widget(
            Block::default().style(Style::default().bg(th::swatch_color(pair.picker()))),
            swatch_area.inner(Margin::new(1, 0)),
        );

        let picker_focused = pair.f_picker.get();
        let channels: Vec<Span> = [RgbChannel::Red, RgbChannel::Green, RgbChannel::Blue]
            .into_iter()
            .map(|channel| {
                let text = format!("{}{:03} ", channel.label(), pair.picker().channel(channel));
                if picker_focused && channel == pair.channel() {
                    Span::styled(text, theme.accent_emphasis_style().add_modifier(Modifier::UNDERLINED))
                } else {
                    Span::styled(text, theme.text_primary_style())
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(channels)).block(th::block(theme, Some("Picker"), picker_focused)),
            picker_area,
        );

        // Partial input is shown as typed; only the picker is guarded.
        render_text_field(frame, text_area, pair.text(), "Hex", pair.f_hex.get(), theme);
        (picker_area, text_area)
    }

    fn slider_line<'a>(theme: &dyn Theme, title: &'a str, slider: &SliderBinding, value_label: String, focused: bool, width: u16) -> Line<'a> {
        let bar_width = usize::from(width.saturating_sub(24)).max(4);
        let filled = (slider.ratio() * bar_width as f64).round() as usize;
        let title_style = if focused {
            theme.accent_emphasis_style()
        } else {
            theme.text_secondary_style()
        };
        Line::from(vec![
            Span::styled(format!("{title:<16}"), title_style),
            Span::styled("█".repeat(filled), Style::default().fg(theme.roles().accent_secondary)),
            Span::styled("░".repeat(bar_width - filled.min(bar_width)), theme.text_muted_style()),
            Span::styled(format!(" {value_label}"), theme.text_primary_style()),
        ])
    }
}

impl Component for InputsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(target) = app.inputs.focused_target() else {
            return Vec::new();
        };
        match target {
            FocusTarget::Picker(pair) => Self::handle_picker_key(app, pair, key),
            FocusTarget::HexText(pair) => Self::handle_hex_key(app, pair, key),
            FocusTarget::Slider(id) => Self::handle_slider_key(app, id, key),
            FocusTarget::AccessibilityWeight => Self::handle_weight_key(app, key),
            FocusTarget::WcagLevel => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => app.update(&Msg::ToggleWcagLevel),
                _ => Vec::new(),
            },
            FocusTarget::GenerateButton => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => app.update(&Msg::Submit),
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
        if self.generate_area.contains(position) {
            app.focus.focus(&app.inputs.f_generate);
            return app.update(&Msg::Submit);
        }
        if let Some(index) = self.pair_areas.iter().position(|(picker, _)| picker.contains(position)) {
            app.focus_on(FocusTarget::Picker(index));
        } else if let Some(index) = self.pair_areas.iter().position(|(_, text)| text.contains(position)) {
            app.focus_on(FocusTarget::HexText(index));
        }
        Vec::new()
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        let Some(target) = app.inputs.focused_target() else {
            return Vec::new();
        };
        match target {
            FocusTarget::Picker(_) => th::build_hint_spans(theme, &[("←/→", " Channel  "), ("↑/↓", " ±1  "), ("PgUp/PgDn", " ±16  ")]),
            FocusTarget::Slider(_) | FocusTarget::AccessibilityWeight => th::build_hint_spans(theme, &[("←/→", " Adjust  ")]),
            FocusTarget::WcagLevel => th::build_hint_spans(theme, &[("Space", " Toggle AA/AAA  ")]),
            FocusTarget::GenerateButton => th::build_hint_spans(theme, &[("Enter", " Generate  ")]),
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Generation"), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let pair_count = app.inputs.pairs().len();
        let slider_ids: Vec<SliderId> = app.inputs.slider_ids().collect();

        let mut constraints: Vec<Constraint> = vec![Constraint::Length(3); pair_count];
        constraints.push(Constraint::Length(u16::try_from(slider_ids.len() + 2).unwrap_or(u16::MAX)));
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        self.pair_areas = app
            .inputs
            .pairs()
            .iter()
            .enumerate()
            .map(|(index, pair)| Self::render_pair(frame, rows[index], app, pair))
            .collect();

        let controls_area = rows[pair_count];
        let mut lines: Vec<Line> = slider_ids
            .iter()
            .filter_map(|id| {
                let slider = app.inputs.slider(*id)?;
                let focused = app.inputs.slider_flag(*id).is_some_and(FocusFlag::get);
                Some(Self::slider_line(theme, slider_title(*id), slider, slider.label().to_string(), focused, controls_area.width))
            })
            .collect();

        let weight = app.inputs.accessibility();
        lines.push(Self::slider_line(
            theme,
            "Accessibility",
            weight.slider(),
            format!("{} · aesthetic {}", weight.accessibility_label(), weight.aesthetic_label()),
            app.inputs.f_accessibility.get(),
            controls_area.width,
        ));

        let wcag_focused = app.inputs.f_wcag_level.get();
        let mut wcag_spans = vec![Span::styled(
            format!("{:<16}", "WCAG level"),
            if wcag_focused {
                theme.accent_emphasis_style()
            } else {
                theme.text_secondary_style()
            },
        )];
        for level in [WcagLevel::AA, WcagLevel::AAA] {
            let style = if level == app.inputs.wcag_level() {
                th::table_selected_style(theme)
            } else {
                theme.text_muted_style()
            };
            wcag_spans.push(Span::styled(format!(" {level} "), style));
            wcag_spans.push(Span::raw(" "));
        }
        lines.push(Line::from(wcag_spans));
        frame.render_widget(Paragraph::new(lines), controls_area);

        let busy = app.generation.busy();
        let label = if busy.is_loading() {
            format!("{} Generating palettes", FRAMES[app.throbber_idx % FRAMES.len()])
        } else {
            "Generate palettes".to_string()
        };
        self.generate_area = rows[pair_count + 1];
        th::render_button(
            frame,
            self.generate_area,
            &label,
            !busy.is_control_disabled(),
            app.inputs.f_generate.get(),
            theme,
        );
    }
}
