//! CMIP6 availability cataloguer.
//!
//! Walks the configured archive base locations and writes one catalogue row
//! per (base location, table id, experiment, model, variable).

mod config_loader;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use catalogue::{
    write_catalogue, CachingStore, Catalogue, CatalogueBuilder, CatalogueConfig, Diagnostic,
    GlobStore, MemoryStore, OutputFormat, Store,
};
use cmip_common::CatalogueError;

/// Exit status for unrecognized configuration.
const EXIT_CONFIGURATION: u8 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Parser, Debug)]
#[command(name = "cmip-catalogue")]
#[command(about = "Catalogue CMIP6 ensemble availability across archive backends")]
struct Args {
    /// Configuration file path (built-in JASMIN defaults when absent)
    #[arg(short, long, env = "CATALOGUE_CONFIG")]
    config: Option<PathBuf>,

    /// Output file (stdout when absent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: FormatArg,

    /// Restrict to these models (repeatable)
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// Restrict to these variables (repeatable)
    #[arg(short, long = "variable")]
    variables: Vec<String>,

    /// Memoise store queries shared between rows
    #[arg(long)]
    cache: bool,

    /// Walk each base location once and answer queries from memory
    #[arg(long, conflicts_with = "cache")]
    snapshot: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "json")]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let configuration = e
                .downcast_ref::<CatalogueError>()
                .is_some_and(CatalogueError::is_configuration_error);
            error!(error = %format!("{:#}", e), configuration, "Catalogue run failed");
            if configuration {
                ExitCode::from(EXIT_CONFIGURATION)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);

    match args.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => config_loader::load_catalogue_config(path)?,
        None => {
            info!("No configuration file given, using built-in defaults");
            CatalogueConfig::jasmin_defaults()
        }
    }
    .with_models(args.models.clone())
    .with_variables(args.variables.clone());

    // Filters may have replaced validated lists
    config.validate()?;
    let columns = config.columns()?;

    info!(
        base_locations = ?config.base_locations,
        models = config.models.len(),
        variables = config.variables.len(),
        "Loaded configuration"
    );

    let catalogue = if args.snapshot {
        let store = MemoryStore::snapshot(&config.base_locations)?;
        info!(entries = store.len(), "Snapshot taken");
        build(&config, &store)?
    } else if args.cache || config.cache_patterns {
        let store = CachingStore::new(GlobStore::new(), CachingStore::<GlobStore>::DEFAULT_CAPACITY);
        let catalogue = build(&config, &store)?;
        let stats = store.stats();
        info!(hits = stats.hits, misses = stats.misses, "Pattern cache statistics");
        catalogue
    } else {
        build(&config, &GlobStore::new())?
    };

    report_diagnostics(&catalogue);

    let format = OutputFormat::from(args.format);
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_catalogue(&mut writer, &catalogue.rows, &columns, format)?;
            writer.flush()?;
            info!(path = %path.display(), rows = catalogue.rows.len(), "Wrote catalogue");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_catalogue(&mut writer, &catalogue.rows, &columns, format)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn build(config: &CatalogueConfig, store: &dyn Store) -> Result<Catalogue> {
    Ok(CatalogueBuilder::new(config, store).build()?)
}

fn report_diagnostics(catalogue: &Catalogue) {
    let mut partial = 0;
    let mut layout = 0;
    let mut unavailable = 0;
    for diagnostic in &catalogue.diagnostics {
        match diagnostic {
            Diagnostic::PartialAvailability(_) => partial += 1,
            Diagnostic::LayoutViolation { .. } => layout += 1,
            Diagnostic::StoreUnavailable { .. } => unavailable += 1,
        }
    }

    if layout > 0 || unavailable > 0 {
        warn!(
            partial_availability = partial,
            layout_violations = layout,
            store_faults = unavailable,
            "Catalogue completed with diagnostics"
        );
    } else {
        info!(partial_availability = partial, "Catalogue completed");
    }
}
