//! CLI entry point for the smart grid power consumption analyzer.
//!
//! Provides subcommands for generating a synthetic dataset, analyzing an
//! existing one, and running both back to back.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use smart_grid_analyzer::analyzers::analyzer::analyze;
use smart_grid_analyzer::{
    charts::visualize,
    config::{GeneratorConfig, PipelineConfig},
    generate::generate_sample_data,
    loader::load_and_merge,
    output::{print_head, print_pretty},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "smart_grid_analyzer")]
#[command(about = "Analyze household power consumption against district thresholds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic dataset of hourly readings and city metadata
    Generate {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        sizing: GenerateArgs,
    },
    /// Merge an existing dataset, score district risk, and write reports
    Analyze {
        #[command(flatten)]
        paths: PathArgs,

        /// Skip chart rendering
        #[arg(long, default_value_t = false)]
        no_charts: bool,
    },
    /// Generate a dataset, then analyze it
    Run {
        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        sizing: GenerateArgs,

        /// Skip chart rendering
        #[arg(long, default_value_t = false)]
        no_charts: bool,
    },
}

#[derive(Args)]
struct PathArgs {
    /// Directory holding `csv/` and `json/` inputs
    #[arg(short = 'd', long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for summary CSVs and report JSONs
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Directory for charts (defaults to <OUTPUT_DIR>/plots)
    #[arg(long)]
    plots_dir: Option<PathBuf>,
}

impl PathArgs {
    fn into_config(self) -> PipelineConfig {
        let config = PipelineConfig::new(self.data_dir, self.output_dir);
        match self.plots_dir {
            Some(dir) => config.with_plots_dir(dir),
            None => config,
        }
    }
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of cities
    #[arg(long, default_value_t = 2)]
    cities: usize,

    /// Districts per city
    #[arg(long, default_value_t = 3)]
    districts: usize,

    /// Households per district
    #[arg(long, default_value_t = 10)]
    households: usize,

    /// Days of hourly readings
    #[arg(long, default_value_t = 2)]
    days: usize,

    /// Seed for reproducible data (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

impl GenerateArgs {
    fn into_config(self) -> GeneratorConfig {
        GeneratorConfig {
            num_cities: self.cities,
            num_districts: self.districts,
            num_households: self.households,
            num_days: self.days,
            seed: self.seed,
            ..GeneratorConfig::default()
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/smart_grid_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("smart_grid_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { paths, sizing } => {
            generate_sample_data(&paths.into_config(), &sizing.into_config()).map(|_| ())
        }
        Commands::Analyze { paths, no_charts } => run_analysis(&paths.into_config(), !no_charts),
        Commands::Run {
            paths,
            sizing,
            no_charts,
        } => {
            let config = paths.into_config();
            info!("Step 1: generating synthetic data");
            generate_sample_data(&config, &sizing.into_config())
                .and_then(|_| run_analysis(&config, !no_charts))
        }
    };

    if let Err(e) = &result {
        error!(error = %format!("{:#}", e), "Run failed");
    }
    result
}

/// Loads and merges the dataset, writes reports, and optionally renders charts.
#[tracing::instrument(skip(config), fields(data_dir = %config.data_dir.display()))]
fn run_analysis(config: &PipelineConfig, charts: bool) -> Result<()> {
    info!("Step 2: loading and merging data");
    let loaded = load_and_merge(config)?;
    info!(rows = loaded.rows.len(), "Loaded consumption data");
    print_pretty(&loaded.skipped);

    info!("Step 3: running analysis");
    let analysis = analyze(&loaded.rows, config)?;

    if charts {
        info!("Step 4: generating visualizations");
        visualize(&analysis.summaries, &loaded.rows, &config.plots_dir)?;
    }

    info!(output_dir = %config.output_dir.display(), "All done");
    print_head(&analysis.summaries, 5);
    Ok(())
}
