//! Application state and the message handler for the palette controller.
//!
//! `App::update` is the single entry point for every user interaction and
//! background completion. It mutates the component states and returns the
//! side effects the runtime must execute; nothing in here performs I/O.

use std::fmt;
use std::path::PathBuf;

use colorevolve_types::{Capabilities, Effect, ExecOutcome, ExtractedColors, ExtractionKind, Msg, RequestControl};
use rat_focus::{Focus, FocusBuilder, FocusFlag};
use serde_json::Value;
use tracing::{debug, info};

use crate::generation::GenerationState;
use crate::lifecycle::Alerts;
use crate::ui::components::extraction::ExtractionState;
use crate::ui::components::inputs::InputsState;
use crate::ui::components::preview::PreviewModel;
use crate::ui::components::table::PaletteTableState;
use crate::ui::theme::Theme;

/// Runtime-wide objects shared by every component.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
}

impl fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCtx").finish_non_exhaustive()
    }
}

/// The main application state.
pub struct App {
    pub ctx: SharedCtx,
    pub capabilities: Capabilities,
    /// Linked pickers, hex fields and sliders.
    pub inputs: InputsState,
    /// URL/HTML extraction flows and the staged colors.
    pub extraction: ExtractionState,
    pub generation: GenerationState,
    /// Ranked palettes plus the optional baseline row.
    pub table: PaletteTableState,
    /// Preview of the active row; `None` until a row is selected.
    pub preview: Option<PreviewModel>,
    pub alerts: Alerts,
    /// Tab order over every rendered control; rebuilt before each draw.
    pub focus: Focus,
    pub(crate) focus_root: FocusFlag,
    /// Path of the most recent chart export.
    pub last_export: Option<PathBuf>,
    pub throbber_idx: usize,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("capabilities", &self.capabilities)
            .field("focused", &self.focused_target())
            .field("alerts", &self.alerts)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(capabilities: Capabilities, theme: Box<dyn Theme>) -> Self {
        let mut app = Self {
            ctx: SharedCtx { theme },
            inputs: InputsState::new(&capabilities),
            extraction: ExtractionState::new(&capabilities),
            generation: GenerationState::default(),
            table: PaletteTableState::default(),
            preview: None,
            alerts: Alerts::default(),
            focus: Focus::default(),
            focus_root: FocusFlag::named("colorevolve"),
            last_export: None,
            throbber_idx: 0,
            capabilities,
        };
        app.focus = FocusBuilder::build_for(&app);
        app.focus.first();
        app
    }

    /// Whether any request is in flight.
    pub fn is_busy(&self) -> bool {
        self.generation.busy().is_loading()
            || [ExtractionKind::Url, ExtractionKind::Html]
                .into_iter()
                .any(|kind| self.extraction.flow(kind).busy().is_loading())
    }

    /// Apply a message and return the effects it requests.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::PickerChanged { pair, color } => self.inputs.picker_changed(*pair, color),
            Msg::HexTextChanged { pair, text } => self.inputs.hex_text_changed(*pair, text),
            Msg::SliderChanged { slider, value } => self.inputs.slider_changed(*slider, *value),
            Msg::AccessibilityWeightChanged(value) => self.inputs.accessibility_changed(*value),
            Msg::ToggleWcagLevel => self.inputs.toggle_wcag_level(),
            Msg::ExtractionSourceChanged { kind, text } => self.extraction.set_source(*kind, text),
            Msg::Submit => {
                let form = self.inputs.form();
                effects.extend(self.generation.submit(form));
            }
            Msg::ExtractRequested(kind) => {
                effects.extend(self.extraction.request(*kind, &mut self.alerts));
            }
            Msg::ApplyExtracted => {
                if self.capabilities.has_extraction_apply && self.extraction.apply(&mut self.inputs) {
                    debug!("staged colors applied to base inputs");
                }
            }
            Msg::RowClicked(index) => self.select_row(*index),
            Msg::ExportChart => match self.generation.chart() {
                Some(chart) if !chart.is_empty() => effects.push(Effect::ExportChart(chart.clone())),
                _ => self.alerts.raise("Generate palettes before exporting the convergence chart"),
            },
            Msg::DismissAlert => self.alerts.dismiss(),
            Msg::ExecCompleted(outcome) => self.handle_outcome(outcome),
            Msg::Tick => {
                if self.is_busy() {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
            }
            Msg::Resize(..) => {}
        }
        effects
    }

    fn select_row(&mut self, index: usize) {
        if let Some(input) = self.table.select(index) {
            self.preview = Some(PreviewModel::from_input(&input, &self.capabilities));
        }
    }

    fn handle_outcome(&mut self, outcome: &ExecOutcome) {
        match outcome {
            ExecOutcome::Request { control, result } => self.handle_request_outcome(*control, result.clone()),
            ExecOutcome::ChartExported(Ok(path)) => {
                info!(path = %path.display(), "convergence chart exported");
                self.last_export = Some(path.clone());
            }
            ExecOutcome::ChartExported(Err(message)) => self.alerts.raise(format!("Error: {message}")),
        }
    }

    fn handle_request_outcome(&mut self, control: RequestControl, result: Result<Value, String>) {
        match control {
            RequestControl::Generate => {
                self.generation.complete(
                    result,
                    &self.capabilities,
                    &mut self.table,
                    &mut self.preview,
                    &mut self.alerts,
                );
            }
            RequestControl::Extract(kind) => {
                if let Some(colors) = self.extraction.complete(kind, result, &mut self.alerts) {
                    self.on_colors_extracted(&colors);
                }
            }
        }
    }

    /// Without the apply step the extracted primary color goes straight into
    /// the single base color input.
    fn on_colors_extracted(&mut self, colors: &ExtractedColors) {
        if !self.capabilities.has_extraction_apply {
            self.inputs.picker_changed(0, &colors.primary);
        }
    }
}

#[cfg(test)]
mod tests {
    use colorevolve_types::{ConvergenceChart, ExtractionSource, GenerationForm, HexColor, SliderId, Variant, WcagLevel};
    use serde_json::json;

    use super::*;
    use crate::ui::theme::DraculaTheme;

    fn app(variant: Variant) -> App {
        App::new(variant.into(), Box::new(DraculaTheme::new()))
    }

    fn request_done(control: RequestControl, result: Result<Value, String>) -> Msg {
        Msg::ExecCompleted(Box::new(ExecOutcome::Request { control, result }))
    }

    fn generation_response() -> Value {
        json!({
            "palettes": [
                {"colors": ["#2E5AAC", "#F4F4F4", "#1A1A1A"], "contrast": "11.8:1", "delta_e": 4.1, "daltonism": "100% valid"},
                {"colors": ["#3366CC", "#FFFFFF", "#222222"], "contrast": "10.2:1", "delta_e": 2.7, "daltonism": "100% valid"}
            ],
            "initial_colors": ["#3366CC", "#FFFFFF", "#000000"],
            "convergence_chart": "iVBORw0KGgo="
        })
    }

    #[test]
    fn generation_round_trip_selects_first_optimized_row() {
        let mut app = app(Variant::Single);
        app.update(&Msg::HexTextChanged {
            pair: 0,
            text: "#3366CC".into(),
        });
        app.update(&Msg::SliderChanged {
            slider: SliderId::PopulationSize,
            value: 50,
        });
        app.update(&Msg::SliderChanged {
            slider: SliderId::Generations,
            value: 100,
        });
        app.update(&Msg::SliderChanged {
            slider: SliderId::MutationProbability,
            value: 5,
        });
        app.update(&Msg::AccessibilityWeightChanged(70));

        let effects = app.update(&Msg::Submit);
        let expected = GenerationForm {
            base_colors: vec![HexColor::parse("#3366CC").unwrap()],
            population_size: 50,
            generations: 100,
            mutation_percent: 5,
            accessibility_weight: 70,
            initial_weight: None,
            wcag_level: WcagLevel::AA,
        };
        assert_eq!(effects, vec![Effect::Generate(expected)]);
        assert!(app.is_busy());
        assert!(app.update(&Msg::Submit).is_empty(), "disabled control refuses a second submit");

        let mut extended = self::app(Variant::Extended);
        extended.update(&Msg::Submit);
        extended.update(&request_done(RequestControl::Generate, Ok(generation_response())));
        assert_eq!(extended.table.len(), 3);
        assert_eq!(extended.table.active(), Some(1));
        let preview = extended.preview.as_ref().expect("preview");
        assert_eq!(preview.mockup.header_background.as_str(), "#2E5AAC");
        assert!(!extended.is_busy());
        assert!(extended.generation.results_visible());
    }

    #[test]
    fn row_click_moves_the_single_active_marker() {
        let mut app = app(Variant::Extended);
        app.update(&Msg::Submit);
        app.update(&request_done(RequestControl::Generate, Ok(generation_response())));

        app.update(&Msg::RowClicked(0));
        assert_eq!(app.table.active(), Some(0));
        assert_eq!(app.preview.as_ref().map(PreviewModel::diff_count), Some(0));

        app.update(&Msg::RowClicked(2));
        let active: Vec<usize> = (0..app.table.len()).filter(|row| app.table.is_active(*row)).collect();
        assert_eq!(active, vec![2]);
        assert_eq!(app.preview.as_ref().map(PreviewModel::diff_count), Some(1));
    }

    #[test]
    fn extraction_error_leaves_apply_disabled() {
        let mut app = app(Variant::Extended);
        app.update(&Msg::ExtractionSourceChanged {
            kind: ExtractionKind::Url,
            text: "https://unreachable.test".into(),
        });
        let effects = app.update(&Msg::ExtractRequested(ExtractionKind::Url));
        assert_eq!(
            effects,
            vec![Effect::ExtractColor(ExtractionSource::Url("https://unreachable.test".into()))]
        );
        app.update(&request_done(
            RequestControl::Extract(ExtractionKind::Url),
            Ok(json!({"error": "unreachable host"})),
        ));
        assert_eq!(app.alerts.current(), Some("Error: unreachable host"));
        assert!(!app.extraction.can_apply());
        assert!(app.extraction.staged().get().is_none());
    }

    #[test]
    fn html_extraction_then_apply_updates_all_pairs() {
        let mut app = app(Variant::Extended);
        app.update(&Msg::ExtractionSourceChanged {
            kind: ExtractionKind::Html,
            text: "<body style=\"background:#fff\">".into(),
        });
        app.update(&Msg::ExtractRequested(ExtractionKind::Html));
        app.update(&request_done(
            RequestControl::Extract(ExtractionKind::Html),
            Ok(json!({"primary_color": "#111111", "bg_color": "#FFFFFF", "accent_color": "#FF8800"})),
        ));
        assert!(app.extraction.can_apply());
        assert_eq!(app.inputs.pairs()[0].picker().as_str(), "#3a5fcd", "extended variant waits for apply");

        app.update(&Msg::ApplyExtracted);
        for (pair, expected) in app.inputs.pairs().iter().zip(["#111111", "#FFFFFF", "#FF8800"]) {
            assert_eq!(pair.picker().as_str(), expected);
            assert_eq!(pair.text().input(), expected);
        }
    }

    #[test]
    fn single_variant_writes_extracted_primary_directly() {
        let mut app = app(Variant::Single);
        app.update(&request_done(
            RequestControl::Extract(ExtractionKind::Url),
            Ok(json!({"primary_color": "#123456", "bg_color": "#FFFFFF", "accent_color": "#FF8800"})),
        ));
        assert_eq!(app.inputs.pairs()[0].picker().as_str(), "#123456");
        assert_eq!(app.inputs.pairs()[0].text().input(), "#123456");

        app.update(&Msg::HexTextChanged {
            pair: 0,
            text: "#000000".into(),
        });
        app.update(&Msg::ApplyExtracted);
        assert_eq!(app.inputs.pairs()[0].picker().as_str(), "#000000", "no apply step in the single variant");
    }

    #[test]
    fn export_requires_a_chart() {
        let mut app = app(Variant::Extended);
        assert!(app.update(&Msg::ExportChart).is_empty());
        assert_eq!(app.alerts.len(), 1);
        app.update(&Msg::DismissAlert);
        assert!(app.alerts.is_empty());

        app.update(&Msg::Submit);
        app.update(&request_done(RequestControl::Generate, Ok(generation_response())));
        let effects = app.update(&Msg::ExportChart);
        assert_eq!(effects, vec![Effect::ExportChart(ConvergenceChart::from_bytes(b"\x89PNG\r\n\x1a\n".to_vec()))]);

        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ChartExported(Ok(PathBuf::from("/tmp/c.png"))))));
        assert_eq!(app.last_export, Some(PathBuf::from("/tmp/c.png")));
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ChartExported(Err("disk full".into())))));
        assert_eq!(app.alerts.current(), Some("Error: disk full"));
    }

    #[test]
    fn throbber_advances_only_while_busy() {
        let mut app = app(Variant::Extended);
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 0);
        app.update(&Msg::Submit);
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 1);
    }
}
