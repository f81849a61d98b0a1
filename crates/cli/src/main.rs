use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colorevolve_api::{API_BASE_ENV, DEFAULT_API_BASE};
use colorevolve_tui::TuiConfig;
use colorevolve_types::Variant;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log file location.
const LOG_PATH_ENV: &str = "COLOREVOLVE_LOG_PATH";

/// Terminal controller for the ColorEvolve palette optimizer.
#[derive(Debug, Parser)]
#[command(name = "colorevolve", version, about)]
struct Args {
    /// Base URL of the optimizer service.
    #[arg(long, env = API_BASE_ENV, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Controller variant: `single` (one base color) or `extended` (base
    /// triple with baseline row, diffs and extraction apply).
    #[arg(long, env = "COLOREVOLVE_VARIANT", default_value = "extended")]
    variant: Variant,

    /// Directory that receives exported convergence charts.
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    colorevolve_tui::run(TuiConfig {
        api_base: args.api_base,
        variant: args.variant,
        export_dir: args.export_dir,
        timeout: Duration::from_secs(args.timeout_secs),
    })
    .await
}

/// The terminal owns stdout, so logs go to a file.
fn init_tracing() -> Result<()> {
    let path = resolve_log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn resolve_log_path() -> PathBuf {
    if let Some(path) = env::var_os(LOG_PATH_ENV)
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }
    dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("colorevolve")
        .join("tui.log")
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_variant_and_timeout() {
        let args = Args::try_parse_from(["colorevolve", "--variant", "single", "--timeout-secs", "30"]).unwrap();
        assert_eq!(args.variant, Variant::Single);
        assert_eq!(args.timeout_secs, 30);
        assert!(Args::try_parse_from(["colorevolve", "--variant", "both"]).is_err());
    }
}
