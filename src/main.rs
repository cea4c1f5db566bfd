use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use exercise_video_updater::{CatalogStore, CatalogUpdater, Config};

#[derive(Parser)]
#[command(name = "update-exercise-videos")]
#[command(version, about = "Fill in missing tutorial video links in an exercise catalog")]
struct Cli {
    /// Catalog JSON file to update in place
    #[arg(short, long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Search and report, but do not rewrite the catalog
    #[arg(long)]
    dry_run: bool,

    /// Look up at most this many exercises
    #[arg(long, value_name = "NUM")]
    limit: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A config file that exists but does not parse stops the run here
    let (mut config, config_source) = match &cli.config {
        Some(path) => (Config::load_from(path)?, Some(path.clone())),
        None => Config::load()?,
    };

    // Initialize logging
    let level = if cli.verbose { "debug" } else { config.output.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = format!("exercise_video_updater={},update_exercise_videos={},warn", level, level);
        EnvFilter::new(directives)
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &config_source {
        Some(path) => info!("📄 Loaded configuration from: {}", path.display()),
        None => info!("📄 No configuration file found, using defaults"),
    }

    if let Some(path) = cli.catalog {
        config.catalog.path = path;
    }
    if cli.dry_run {
        config.update.dry_run = true;
    }
    if cli.limit.is_some() {
        config.update.limit = cli.limit;
    }

    config.validate()?;
    info!("🚀 Exercise video updater starting...");
    for line in config.summary().lines() {
        info!("{}", line);
    }

    let store = CatalogStore::new(&config.catalog.path);
    let updater = CatalogUpdater::from_config(&config)?;

    let report = match updater.run(&store).await {
        Ok(report) => report,
        Err(e) => {
            error!("Update failed: {}", e);
            return Err(e.into());
        }
    };

    info!("📊 {}", report.summary());
    if report.deferred > 0 {
        warn!("{} exercises still need a video; run again to continue", report.deferred);
    }
    report.ensure_completed()?;

    Ok(())
}
