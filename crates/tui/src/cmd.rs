//! # Command Execution Layer
//!
//! This module turns the `Effect`s returned by `App::update` into spawned
//! tasks. It is the boundary where the pure state machine meets I/O:
//! - `POST /generate` and `POST /extract-color` through [`PaletteClient`]
//! - writing the convergence chart to disk
//!
//! Every task resolves to an [`ExecOutcome`]. Request outcomes always carry
//! the control that issued them, even when the task itself fails, so the
//! matching busy indicator is always released.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use colorevolve_api::PaletteClient;
use colorevolve_types::{ConvergenceChart, Effect, ExecOutcome, RequestControl};
use serde_json::Value;
use tokio::task::{JoinHandle, spawn};
use tracing::{debug, warn};

/// Handles shared by every spawned command.
#[derive(Debug, Clone)]
pub struct CmdContext {
    pub client: Arc<PaletteClient>,
    pub export_dir: PathBuf,
}

/// Spawn one task per effect.
pub fn run_from_effects(ctx: &CmdContext, effects: Vec<Effect>) -> Vec<JoinHandle<ExecOutcome>> {
    effects.into_iter().map(|effect| spawn_effect(ctx, effect)).collect()
}

fn spawn_effect(ctx: &CmdContext, effect: Effect) -> JoinHandle<ExecOutcome> {
    match effect {
        Effect::Generate(form) => {
            let client = Arc::clone(&ctx.client);
            spawn_request(RequestControl::Generate, async move {
                client.generate(&form).await.map_err(|error| error.to_string())
            })
        }
        Effect::ExtractColor(source) => {
            let client = Arc::clone(&ctx.client);
            spawn_request(RequestControl::Extract(source.kind()), async move {
                client.extract_color(&source).await.map_err(|error| error.to_string())
            })
        }
        Effect::ExportChart(chart) => {
            let export_dir = ctx.export_dir.clone();
            spawn(async move {
                let inner = spawn(async move { export_chart(&export_dir, &chart).await });
                let result = match inner.await {
                    Ok(result) => result,
                    Err(error) => Err(format!("chart export task failed: {error}")),
                };
                ExecOutcome::ChartExported(result)
            })
        }
    }
}

/// Run a request in its own task and tag the outcome with `control`, also
/// when the request task panics or is cancelled.
fn spawn_request<F>(control: RequestControl, request: F) -> JoinHandle<ExecOutcome>
where
    F: Future<Output = Result<Value, String>> + Send + 'static,
{
    spawn(async move {
        debug!(?control, "request started");
        let result = match spawn(request).await {
            Ok(result) => result,
            Err(error) => {
                warn!(?control, %error, "request task failed");
                Err(format!("request task failed: {error}"))
            }
        };
        ExecOutcome::Request { control, result }
    })
}

/// File name for a chart exported at the current UTC time.
fn export_file_name() -> String {
    format!("convergence-{}.png", Utc::now().format("%Y%m%dT%H%M%SZ"))
}

/// Write the chart bytes under `dir`, creating the directory if needed.
pub async fn export_chart(dir: &Path, chart: &ConvergenceChart) -> Result<PathBuf, String> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|error| format!("cannot create {}: {error}", dir.display()))?;
    let path = dir.join(export_file_name());
    tokio::fs::write(&path, chart.bytes())
        .await
        .map_err(|error| format!("cannot write {}: {error}", path.display()))?;
    debug!(path = %path.display(), bytes = chart.len(), "chart exported");
    Ok(path)
}
