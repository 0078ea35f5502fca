use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dashgrid_layout::solver::find_collisions;
use dashgrid_layout::{ComponentKind, EngineConfig, LayoutDocument, LayoutEngine, NullRenderer};
use tracing::info;

use crate::error::{HarnessError, Result};
use crate::trace::{ReplayReport, Trace, replay};

#[derive(Debug, Parser)]
#[command(
    name = "dashgrid",
    about = "Place, validate, and replay dashgrid layouts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Place components with first-fit and print the layout document.
    Place(PlaceArgs),

    /// Check a layout document for schema and geometry errors.
    Validate(ValidateArgs),

    /// Replay an interaction trace and print the resulting document.
    Replay(ReplayArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PlaceArgs {
    /// Number of chart components (6x6).
    #[arg(long, default_value_t = 0)]
    pub chart: usize,

    /// Number of KPI components (2x3).
    #[arg(long, default_value_t = 0)]
    pub kpi: usize,

    /// Viewport width to lay out for; the wide arrangement is exported.
    #[arg(long)]
    pub viewport: Option<f64>,

    /// Engine configuration file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the document here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Layout document to check.
    pub layout: PathBuf,

    /// Also reject overlapping components.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Trace file (JSON).
    pub trace: PathBuf,

    /// Engine configuration file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Starting layout document.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Print the full step report instead of only the final document.
    #[arg(long)]
    pub report: bool,

    /// Write the output here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Place(args) => {
            let document = place(&args)?;
            emit(args.output.as_deref(), &document.to_json_pretty()?)
        }
        Commands::Validate(args) => {
            let summary = validate(&args)?;
            emit(None, &summary)
        }
        Commands::Replay(args) => {
            let report = replay_file(&args)?;
            let text = if args.report {
                serde_json::to_string_pretty(&report)?
            } else {
                report.document.to_json_pretty()?
            };
            emit(args.output.as_deref(), &text)
        }
    }
}

/// Build a layout by adding `chart` charts then `kpi` KPIs.
pub fn place(args: &PlaceArgs) -> Result<LayoutDocument> {
    if args.chart + args.kpi == 0 {
        return Err(HarnessError::invalid("nothing to place: pass --chart and/or --kpi"));
    }
    let config = load_config(args.config.as_deref())?;
    let mut engine = LayoutEngine::new(config, NullRenderer);
    for _ in 0..args.chart {
        engine.add_component(ComponentKind::Primary);
    }
    for _ in 0..args.kpi {
        engine.add_component(ComponentKind::Secondary);
    }
    if let Some(width) = args.viewport {
        if !width.is_finite() || width <= 0.0 {
            return Err(HarnessError::invalid(format!("--viewport must be positive, got {width}")));
        }
        let canvas = width.min(engine.metrics().canvas_width);
        engine.on_viewport_resize(width, canvas);
    }
    info!(
        target: "dashgrid::harness",
        components = engine.components().len(),
        breakpoint = %engine.breakpoint(),
        "placed"
    );
    Ok(engine.export_layout())
}

/// Parse and check a layout document. Returns a one-line summary.
pub fn validate(args: &ValidateArgs) -> Result<String> {
    let text = read_existing(&args.layout)?;
    let document = LayoutDocument::from_json_str(&text)?;
    let components = document.to_components()?;
    let overlaps = find_collisions(&components);
    if args.strict && !overlaps.is_empty() {
        let pairs: Vec<String> = overlaps.iter().map(|(a, b)| format!("{a}/{b}")).collect();
        return Err(HarnessError::invalid(format!(
            "{} overlapping pair(s): {}",
            overlaps.len(),
            pairs.join(", ")
        )));
    }
    Ok(format!(
        "ok: {} component(s), {} overlap(s), version {}",
        components.len(),
        overlaps.len(),
        document.version
    ))
}

pub fn replay_file(args: &ReplayArgs) -> Result<ReplayReport> {
    let trace = Trace::from_json_str(&read_existing(&args.trace)?)?;
    let config = load_config(args.config.as_deref())?;
    let initial = match &args.layout {
        Some(path) => Some(LayoutDocument::from_json_str(&read_existing(path)?)?),
        None => None,
    };
    replay(&trace, config, initial.as_ref())
}

/// Defaults when `path` is absent; TOML unless the extension is `.json`.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    if !path.exists() {
        return Err(HarnessError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => EngineConfig::from_json_file(path)?,
        _ => EngineConfig::from_toml_file(path)?,
    };
    Ok(config)
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(HarnessError::MissingPath {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{text}\n"))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}
