//! Generation orchestrator: submit the form, then turn a successful response
//! into table rows, a default preview and the stored convergence chart.

use colorevolve_types::{Capabilities, ConvergenceChart, Effect, GenerationForm, GenerationResult};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::lifecycle::{self, Alerts, BusyIndicator};
use crate::ui::components::preview::{ChartImage, PreviewModel};
use crate::ui::components::table::PaletteTableState;

#[derive(Debug, Default)]
pub struct GenerationState {
    busy: BusyIndicator,
    chart: Option<ConvergenceChart>,
    /// `chart` decoded for display; `None` when it is absent or not a PNG.
    chart_image: Option<ChartImage>,
    /// The results panel is hidden while a request is in flight and after a
    /// failed one; a success shows it again.
    results_visible: bool,
    palette_count: usize,
}

impl GenerationState {
    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    pub fn chart(&self) -> Option<&ConvergenceChart> {
        self.chart.as_ref()
    }

    pub fn chart_image(&self) -> Option<&ChartImage> {
        self.chart_image.as_ref()
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn palette_count(&self) -> usize {
        self.palette_count
    }

    /// Start a generation request with a freshly built form.
    pub fn submit(&mut self, form: GenerationForm) -> Option<Effect> {
        let effect = lifecycle::begin(&mut self.busy, Effect::Generate(form))?;
        self.results_visible = false;
        debug!("generation submitted");
        Some(effect)
    }

    /// Settle the request and, on success, replace the previous result:
    /// rebuild the table (its default selection drives the preview) and
    /// store the chart.
    pub fn complete(
        &mut self,
        result: Result<Value, String>,
        capabilities: &Capabilities,
        table: &mut PaletteTableState,
        preview: &mut Option<PreviewModel>,
        alerts: &mut Alerts,
    ) -> bool {
        let Some(payload) = lifecycle::settle(&mut self.busy, result, alerts) else {
            return false;
        };
        let decoded = match GenerationResult::decode(payload) {
            Ok((decoded, rejected)) => {
                for reason in &rejected {
                    warn!(%reason, "palette entry left out");
                }
                decoded
            }
            Err(error) => {
                alerts.raise(format!("Error: unexpected generation response: {error}"));
                return false;
            }
        };

        *preview = table
            .rebuild(&decoded, capabilities)
            .map(|input| PreviewModel::from_input(&input, capabilities));
        self.palette_count = decoded.palettes.len();
        self.chart = decoded.convergence_chart;
        self.chart_image = self
            .chart
            .as_ref()
            .filter(|chart| !chart.is_empty())
            .and_then(|chart| match ChartImage::decode(chart) {
                Ok(image) => Some(image),
                Err(error) => {
                    warn!(%error, "convergence chart cannot be drawn");
                    None
                }
            });
        self.results_visible = true;
        info!(
            palettes = self.palette_count,
            chart_bytes = self.chart.as_ref().map_or(0, ConvergenceChart::len),
            "generation completed"
        );
        true
    }
}
