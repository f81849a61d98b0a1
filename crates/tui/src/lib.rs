//! # ColorEvolve Terminal Controller
//!
//! Interactive front end for the ColorEvolve palette optimizer. The user
//! picks base colors (by channel picker or hex text), tunes the genetic
//! algorithm, and submits the form; ranked palettes come back as a table,
//! the active row drives a website mockup preview, and the convergence chart
//! can be exported as a PNG. Colors can also be extracted from a website URL
//! or pasted HTML and applied to the base inputs.
//!
//! ## Architecture
//!
//! `App::update` is a pure state machine over [`colorevolve_types::Msg`]
//! that returns [`colorevolve_types::Effect`]s. The runtime executes effects
//! as Tokio tasks and feeds their outcomes back as messages. Components
//! translate terminal input into messages and render the resulting state.

mod app;
mod cmd;
mod generation;
mod lifecycle;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colorevolve_api::{ClientConfig, PaletteClient};
use colorevolve_types::{Capabilities, Variant};
use tracing::info;

/// Startup options for the controller.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Base URL of the optimizer service.
    pub api_base: String,
    pub variant: Variant,
    /// Directory that receives exported convergence charts.
    pub export_dir: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Runs the controller until the user quits.
///
/// # Errors
///
/// Returns an error when the API base URL is invalid or the terminal cannot
/// be set up or restored.
pub async fn run(config: TuiConfig) -> Result<()> {
    let client = PaletteClient::new(ClientConfig {
        base_url: config.api_base.clone(),
        timeout: config.timeout,
    })
    .with_context(|| format!("cannot use API base {}", config.api_base))?;
    info!(api_base = %client.base_url, variant = ?config.variant, "starting controller");

    let app = app::App::new(Capabilities::from(config.variant), ui::theme::load_from_env());
    let ctx = cmd::CmdContext {
        client: Arc::new(client),
        export_dir: config.export_dir,
    };
    ui::runtime::run_app(app, ctx).await
}

#[cfg(test)]
mod tests {
    use colorevolve_types::{ExecOutcome, Msg, RequestControl};
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;

    use super::*;
    use crate::ui::components::Component;
    use crate::ui::main_component::MainView;
    use crate::ui::theme::DraculaTheme;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_results_and_baseline_row() {
        let mut app = app::App::new(Capabilities::from(Variant::Extended), Box::new(DraculaTheme::new()));
        let mut view = MainView::new();
        app.update(&Msg::Submit);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Request {
            control: RequestControl::Generate,
            result: Ok(json!({
                "palettes": [{
                    "colors": ["#112233", "#F0F0F0", "#CC3300"],
                    "contrast": "7.1:1",
                    "delta_e": 31.5,
                    "daltonism": "100% valid"
                }],
                "initial_colors": ["#112233", "#FFFFFF", "#CC3300"]
            })),
        })));

        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Initial palette (not optimized)"));
        assert!(text.contains("Accessible Design"));
        assert!(text.contains("#FFFFFF → #F0F0F0"));
    }

    #[test]
    fn highlighted_row_lists_its_hex_values() {
        let mut app = app::App::new(Capabilities::from(Variant::Extended), Box::new(DraculaTheme::new()));
        let mut view = MainView::new();
        app.update(&Msg::Submit);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Request {
            control: RequestControl::Generate,
            result: Ok(json!({
                "palettes": [{
                    "colors": ["#112233", "#F0F0F0", "#CC3300"],
                    "contrast": "7.1:1",
                    "delta_e": 31.5,
                    "daltonism": "100% valid"
                }],
                "initial_colors": ["#112233", "#FFFFFF", "#CC3300"]
            })),
        })));

        // The cursor starts on the baseline row while the preview shows row 1.
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Primary #112233"));
        assert!(text.contains("Background #FFFFFF"));

        app.table.move_cursor(1);
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Background #F0F0F0"));
        assert!(!text.contains("Background #FFFFFF"));
    }

    #[test]
    fn convergence_chart_is_drawn_under_the_preview() {
        use base64::Engine;

        let png = crate::ui::components::preview::two_band_png(40, 20);
        let mut app = app::App::new(Capabilities::from(Variant::Single), Box::new(DraculaTheme::new()));
        let mut view = MainView::new();
        app.update(&Msg::Submit);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Request {
            control: RequestControl::Generate,
            result: Ok(json!({
                "palettes": [{
                    "colors": ["#112233", "#F0F0F0", "#CC3300"],
                    "contrast": "7.1:1",
                    "delta_e": 31.5,
                    "daltonism": "100% valid"
                }],
                "convergence_chart": base64::engine::general_purpose::STANDARD.encode(png)
            })),
        })));
        assert!(app.generation.chart_image().is_some());

        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).unwrap();
        let buffer = terminal.backend().buffer();
        let red_cells = buffer
            .content()
            .iter()
            .filter(|cell| cell.symbol() == "▀" && cell.fg == ratatui::style::Color::Rgb(255, 0, 0))
            .count();
        assert!(red_cells > 0, "chart pixels should be drawn");
        assert!(buffer_text(&terminal).contains("40×20"));
    }

    #[test]
    fn renders_alert_overlay() {
        let mut app = app::App::new(Capabilities::from(Variant::Single), Box::new(DraculaTheme::new()));
        let mut view = MainView::new();
        app.update(&Msg::ExportChart);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Generate palettes before exporting"));
    }
}
