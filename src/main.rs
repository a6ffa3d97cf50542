//! # immo-ads CLI
//!
//! Runs one check of a saved search. Meant to be scheduled (cron, systemd
//! timer); each invocation fetches once, records new listings, and reports
//! them.
//!
//! ## Usage
//!
//! ```bash
//! # Everything from the environment / .env
//! immo-ads
//!
//! # Search name, recipients, and query parameters on the command line
//! immo-ads "Flat in Springfield" "me@example.com,you@example.com" "?city=springfield"
//!
//! # Base settings from a TOML file
//! immo-ads --config ./immo-ads.toml
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use immo_ads::config::{self, ConfigFile};
use immo_ads::fetch::HttpListingSource;
use immo_ads::history_fs::FileHistoryStore;
use immo_ads::notify::notifiers_for;
use immo_ads::watch::run_search;

/// Checks a saved listings search and reports the listings that are new
/// since the previous run.
///
/// Takes either no positional arguments (search name, recipients, and
/// parameters then come from `SEARCH_NAME`, `EMAIL_TO`, and
/// `SEARCH_PARAMETERS`) or exactly three.
#[derive(Parser)]
#[command(
    name = "immo-ads",
    version,
    override_usage = "immo-ads [--config <FILE>] [SEARCH_NAME EMAIL_RECIPIENTS SEARCH_PARAMETERS]"
)]
struct Cli {
    /// Optional TOML file with base settings; environment variables and
    /// positional arguments take precedence over it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SEARCH_NAME EMAIL_RECIPIENTS SEARCH_PARAMETERS
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    args: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("immo_ads=info,immo_ads_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => ConfigFile::default(),
    };
    let cfg = config::resolve(file, |name| std::env::var(name).ok(), &cli.args)?;
    tracing::debug!(?cfg, "resolved configuration");

    let source = HttpListingSource::new(&cfg.search, &cfg.fetch)?;
    let store = FileHistoryStore::new(&cfg.history.dir);
    let notifiers = notifiers_for(&cfg);

    let report = run_search(&cfg.search.name, &source, &store, &notifiers)
        .with_context(|| format!("search '{}' failed", cfg.search.name))?;
    tracing::debug!(
        new = report.new_count(),
        history = report.history_len,
        "run complete"
    );

    Ok(())
}
