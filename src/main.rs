//! Hoopline main entry point
//!
//! This is the command-line interface for the Hoopline NBA data fetcher.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use hoopline::config::{load_config, LoggingConfig};
use hoopline::fetch::{retry_skipped, run_full_fetch, ConsoleProgress, FetchKind};
use hoopline::StatsClient;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Hoopline: a patient NBA player-data fetcher
///
/// Hoopline fetches season statistics and positions for every active
/// player, pacing its API calls, and records the players it could not
/// fetch so a later `--retry-skipped` run can pick them up.
#[derive(Parser, Debug)]
#[command(name = "hoopline")]
#[command(version = "1.0.0")]
#[command(about = "A patient NBA player-data fetcher", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Environment to run against (affects file paths and logging)
    #[arg(long, value_enum, default_value_t = Env::Prod)]
    env: Env,

    /// Retry only the skip list for one fetch kind instead of a full fetch
    #[arg(long, value_enum, value_name = "KIND")]
    retry_skipped: Option<KindArg>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Env {
    Dev,
    Prod,
}

impl Env {
    fn name(&self) -> &'static str {
        match self {
            Env::Dev => "dev",
            Env::Prod => "prod",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum KindArg {
    Stats,
    Positions,
}

impl From<KindArg> for FetchKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Stats => FetchKind::Stats,
            KindArg::Positions => FetchKind::Positions,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration comes first: the log file path lives in it.
    let config = load_config(&cli.config, cli.env.name())
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    setup_logging(&config.logging, cli.env, cli.verbose, cli.quiet)
        .context("failed to set up logging")?;

    tracing::info!(
        "Loaded configuration from {} (env: {})",
        cli.config.display(),
        cli.env.name()
    );

    let client = StatsClient::new().context("failed to build HTTP client")?;
    let mut progress = ConsoleProgress::new();

    match cli.retry_skipped {
        Some(kind) => {
            let kind = FetchKind::from(kind);
            tracing::info!("Retrying skipped players for {}", kind.label());
            retry_skipped(&client, kind, &config, &mut progress).await?;
        }
        None => {
            tracing::info!("Running full fetch");
            run_full_fetch(&client, &config, &mut progress).await?;
        }
    }

    Ok(())
}

/// Sets up the tracing subscriber
///
/// A file layer always appends to the configured log file; a console layer
/// is added only for the dev environment. The configured level applies
/// unless overridden by `-v`/`-q`.
fn setup_logging(
    config: &LoggingConfig,
    env: Env,
    verbose: u8,
    quiet: bool,
) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(format!("hoopline={},warn", config.level)),
            1 => EnvFilter::new("hoopline=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("failed to open log file {}", config.file))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file));

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if env == Env::Dev {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    } else {
        registry.init();
    }

    Ok(())
}
