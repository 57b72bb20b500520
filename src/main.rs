//! Park-Atlas main entry point
//!
//! This is the command-line interface for browsing national sites by state
//! and the places near them.

use anyhow::Context;
use clap::Parser;
use park_atlas::config::{load_config_with_hash, Config};
use park_atlas::session::Session;
use park_atlas::{CacheStore, Coordinator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Park-Atlas: browse national sites and what is near them
///
/// Every page and API response is cached in a JSON file, so each site is
/// fetched once and later sessions work from the cache.
#[derive(Parser, Debug)]
#[command(name = "park-atlas")]
#[command(version)]
#[command(about = "Browse national sites by state and find places nearby", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Cache file to load and save, overriding the configuration
    #[arg(long, value_name = "FILE")]
    cache: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(cache_path) = cli.cache {
        config.cache.path = cache_path;
    }

    run_session(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the prompts and listings.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("park_atlas=warn,warn"),
            1 => EnvFilter::new("park_atlas=info,warn"),
            2 => EnvFilter::new("park_atlas=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the cache, runs the interactive session, and saves the cache
///
/// The cache is saved even when the session ends with an error, so fetches
/// made before the failure are kept.
async fn run_session(config: &Config) -> anyhow::Result<()> {
    let cache_path = &config.cache.path;
    let cache = CacheStore::load(cache_path);

    let mut coordinator =
        Coordinator::from_config(config, cache).context("Failed to initialise coordinator")?;

    let outcome = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut session = Session::new(&mut coordinator, stdin.lock(), stdout.lock());
        session.run().await
    };

    let saved = coordinator
        .into_cache()
        .save(cache_path)
        .with_context(|| format!("Failed to save cache to {}", cache_path.display()));

    match (outcome, saved) {
        (Ok(()), saved) => saved,
        (Err(e), saved) => {
            if let Err(save_error) = saved {
                tracing::error!("{:#}", save_error);
            }
            Err(e).context("Browsing session failed")
        }
    }
}
