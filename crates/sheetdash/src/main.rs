//! CLI entry point for the dashboard planner.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use sheetdash::{
    AnalysisConfig, ClosureNotifier, DashboardController, DashboardRenderer, JsonRenderer,
    SlicerSelection, TerminalRenderer,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Heuristic dashboard planner for spreadsheets",
    long_about = "Reads a CSV or XLSX file and prints the dashboard it would build: \
                  KPI cards, chart plans, slicers and a table preview.\n\n\
                  EXAMPLES:\n  \
                  # Print the dashboard for a file\n  \
                  sheetdash sales.csv\n\n  \
                  # Narrow it down with slicers\n  \
                  sheetdash sales.csv --filter Region=East --filter Product=Widget\n\n  \
                  # Write dataset.xlsx, dashboard-config.json and Power BI instructions\n  \
                  sheetdash sales.xlsx --export-dir ./export\n\n  \
                  # Machine-readable output\n  \
                  sheetdash sales.csv --json | jq .kpis"
)]
struct Args {
    /// Path to the CSV or XLSX file to load
    input: PathBuf,

    /// Slicer selection as COLUMN=VALUE (repeatable)
    #[arg(short, long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Directory to write the export package to
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Only write the export package; do not print the dashboard
    #[arg(long, requires = "export_dir")]
    export_only: bool,

    /// JSON file with layout limits (any subset of the settings fields)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of preview rows printed in text mode
    #[arg(long, default_value = "10")]
    preview_rows: usize,

    /// Print the dashboard as JSON instead of text
    ///
    /// Disables all logging so stdout holds a single JSON document.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Parse `COLUMN=VALUE`; the value may itself contain `=`.
fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected COLUMN=VALUE, got '{raw}'")),
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled entirely.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Load settings from a JSON file, or the defaults.
fn load_settings(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let config: AnalysisConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid settings file {}", path.display()))?;
    config.validate()?;
    info!("Loaded settings from {}", path.display());
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = load_settings(args.settings.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if args.export_only {
        let notifier = ClosureNotifier::new(|message: &str| error!("{}", message));
        let mut controller = DashboardController::new(config, notifier);
        runtime.block_on(run(&mut controller, &args))?;
        return Ok(());
    }

    if args.json {
        let mut controller = DashboardController::new(config, JsonRenderer::new(io::stdout()));
        runtime.block_on(run(&mut controller, &args))?;
        controller.renderer_mut().present()?;
    } else {
        let renderer = TerminalRenderer::new(io::stdout()).with_preview_rows(args.preview_rows);
        let mut controller = DashboardController::new(config, renderer);
        runtime.block_on(run(&mut controller, &args))?;
        controller.renderer_mut().present()?;
    }

    Ok(())
}

/// Load the input, apply slicers and write the export package if asked.
async fn run<R: DashboardRenderer>(
    controller: &mut DashboardController<R>,
    args: &Args,
) -> Result<()> {
    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    info!("Loading dataset from: {}", args.input.display());
    controller.open(&args.input).await?;

    let selections = args
        .filters
        .iter()
        .map(|(column, value)| (column.as_str(), SlicerSelection::value(value.as_str())));
    controller.select_all(selections)?;

    let view = controller.session().view();
    info!(
        "Dashboard ready: {} of {} rows, {} KPIs, {} charts",
        view.filtered_rows,
        view.total_rows,
        view.kpis.len(),
        view.charts.len()
    );

    if let Some(dir) = &args.export_dir {
        let files = controller.export_to(dir)?;
        info!("Export package written: {}", files.workbook.display());
    }

    Ok(())
}
