//! Shared types for the ColorEvolve controller: color values, server
//! payloads, request bodies, and the message/effect vocabulary that drives
//! the UI state machine.

use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

mod color;
mod form;
mod palette;

pub use color::{HexColor, HexColorError, RgbChannel};
pub use form::{
    ExtractionKind, ExtractionSource, GenerationForm, SINGLE_BASE_COLOR_FIELD, TRIPLE_BASE_COLOR_FIELDS,
    WcagLevel,
};
pub use palette::{COLOR_ROLES, ConvergenceChart, ExtractedColors, GenerationResult, MetricValue, Palette};

/// Feature variant of the controller.
///
/// `Single` drives one linked base color; `Extended` drives a base triple
/// and turns on the baseline row, diff comparison, and extraction apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    Single,
    #[default]
    Extended,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid variant '{0}'; expected 'single' or 'extended'")]
pub struct ParseVariantError(String);

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "extended" => Ok(Self::Extended),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

/// Capability flags that select between the controller's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub has_initial_palette_row: bool,
    pub has_diff_comparison: bool,
    pub has_extraction_apply: bool,
    /// Number of linked base color inputs (1 or 3).
    pub base_color_count: usize,
}

impl From<Variant> for Capabilities {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Single => Self {
                has_initial_palette_row: false,
                has_diff_comparison: false,
                has_extraction_apply: false,
                base_color_count: 1,
            },
            Variant::Extended => Self {
                has_initial_palette_row: true,
                has_diff_comparison: true,
                has_extraction_apply: true,
                base_color_count: 3,
            },
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Variant::default().into()
    }
}

/// Integer sliders with a single label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderId {
    PopulationSize,
    Generations,
    MutationProbability,
    InitialWeight,
}

/// Control that triggered a request and owns its busy indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestControl {
    Generate,
    Extract(ExtractionKind),
}

/// Result of an asynchronous side effect, fed back into the state machine.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    /// A request settled. Transport failures and non-JSON bodies arrive as
    /// `Err` with a user-facing message.
    Request { control: RequestControl, result: Result<Value, String> },
    /// The convergence chart was written to disk (or failed to be).
    ChartExported(Result<PathBuf, String>),
}

/// Messages that can be sent to update the application state.
///
/// Every user interaction and system event is expressed as one of these so
/// handlers stay functions of `(message, state)`.
#[derive(Debug, Clone)]
pub enum Msg {
    /// A picker reported a new (always valid) color.
    PickerChanged { pair: usize, color: HexColor },
    /// The hex text of a linked pair was edited to `text`.
    HexTextChanged { pair: usize, text: String },
    /// An integer slider moved.
    SliderChanged { slider: SliderId, value: i64 },
    /// The accessibility/aesthetic slider moved.
    AccessibilityWeightChanged(i64),
    /// Switch between WCAG AA and AAA.
    ToggleWcagLevel,
    /// The URL or HTML extraction source was edited.
    ExtractionSourceChanged { kind: ExtractionKind, text: String },
    /// Submit the generation form.
    Submit,
    /// Start an extraction from the given source field.
    ExtractRequested(ExtractionKind),
    /// Copy the staged extracted colors into the base color inputs.
    ApplyExtracted,
    /// A table row was clicked.
    RowClicked(usize),
    /// Export the current convergence chart.
    ExportChart,
    /// Dismiss the front-most alert.
    DismissAlert,
    /// Background execution completed with outcome.
    ExecCompleted(Box<ExecOutcome>),
    /// Periodic UI tick (e.g., spinners)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
}

/// Side effects requested by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `POST /generate` with the captured form.
    Generate(GenerationForm),
    /// `POST /extract-color` with one source.
    ExtractColor(ExtractionSource),
    /// Write the chart bytes to the export directory.
    ExportChart(ConvergenceChart),
}

impl Effect {
    /// The control whose busy indicator this effect holds, if any.
    pub fn control(&self) -> Option<RequestControl> {
        match self {
            Self::Generate(_) => Some(RequestControl::Generate),
            Self::ExtractColor(source) => Some(RequestControl::Extract(source.kind())),
            Self::ExportChart(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_capabilities() {
        let single = Capabilities::from(Variant::Single);
        assert_eq!(single.base_color_count, 1);
        assert!(!single.has_initial_palette_row && !single.has_diff_comparison && !single.has_extraction_apply);

        let extended = Capabilities::default();
        assert_eq!(extended.base_color_count, 3);
        assert!(extended.has_initial_palette_row && extended.has_diff_comparison && extended.has_extraction_apply);
    }

    #[test]
    fn variant_parse() {
        assert_eq!("single".parse::<Variant>(), Ok(Variant::Single));
        assert!("both".parse::<Variant>().is_err());
    }

    #[test]
    fn effects_report_their_control() {
        let effect = Effect::ExtractColor(ExtractionSource::Html("<body/>".into()));
        assert_eq!(effect.control(), Some(RequestControl::Extract(ExtractionKind::Html)));
        assert_eq!(Effect::ExportChart(ConvergenceChart::from_bytes(vec![])).control(), None);
    }
}
