//! Clip Reposter
//!
//! Runs once per invocation: search for Creative Commons videos, pick an
//! unpublished one, cut a random 30-40 second clip and upload it to a
//! Facebook page. Intended to be scheduled (cron, CI).
//!
//! # Usage
//!
//! ```bash
//! YT_API_KEY=... FB_PAGE_ID=... FB_PAGE_ACCESS_TOKEN=... reposter run
//! reposter history --json
//! ```
//!
//! # Exit status
//!
//! - 0: a clip was published
//! - 1: unexpected failure
//! - 2: missing or invalid configuration, or a required tool is absent
//! - 3: the run finished without publishing anything

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use clip_reposter::adapters::FileConfig;
use clip_reposter::app::{AppContainer, DefaultAppContainer};
use clip_reposter::cli::args::{HistoryArgs, RunArgs};
use clip_reposter::cli::{Cli, Commands};
use clip_reposter::config_initialization::{resolve_state_file, AppConfig};
use clip_reposter::domain::model::RunOutcome;
use clip_reposter::error::{
    ReposterError, EXIT_CONFIG, EXIT_FAILURE, EXIT_NOTHING_PUBLISHED, EXIT_PUBLISHED,
};
use clip_reposter::store::DedupStore;
use clip_reposter::utils::logging::{init_logging, LogFormat, LogLevel};

/// Main entry point for the reposter CLI
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (level, format) = match (
        LogLevel::parse(&cli.log_level),
        LogFormat::parse(&cli.log_format),
    ) {
        (Ok(level), Ok(format)) => (level, format),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    init_logging(level, format);

    let code = match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            e.downcast_ref::<ReposterError>()
                .map(ReposterError::exit_code)
                .unwrap_or(EXIT_FAILURE)
        }
    };

    std::process::exit(code);
}

async fn execute(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            execute_run_command(args, cli.config).await
        }
        Commands::History(args) => execute_history_command(args, cli.config),
    }
}

/// Resolve configuration and publish at most one clip
async fn execute_run_command(args: RunArgs, config_path: Option<PathBuf>) -> Result<i32> {
    let file = FileConfig::load(config_path.as_deref())?;
    let mut config = AppConfig::resolve(args, file)?;
    config.locate_tools()?;

    let container = DefaultAppContainer::new(&config);
    let mut store = DedupStore::load(config.state_file.clone());
    info!(
        published = store.len(),
        state_file = %config.state_file.display(),
        "Dedup record loaded"
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let outcome = container
        .publish_pipeline()
        .run(&mut store, &mut rng)
        .await
        .map_err(ReposterError::from)
        .context("Publish run failed")?;

    match outcome {
        RunOutcome::Published(clip) => {
            println!("{}", serde_json::to_string(&clip)?);
            Ok(EXIT_PUBLISHED)
        }
        RunOutcome::NothingPublished(reason) => {
            info!("Nothing published: {}", reason);
            Ok(EXIT_NOTHING_PUBLISHED)
        }
    }
}

/// Print the ids already in the dedup record
fn execute_history_command(args: HistoryArgs, config_path: Option<PathBuf>) -> Result<i32> {
    let file = FileConfig::load(config_path.as_deref())?;
    let store = DedupStore::load(resolve_state_file(&args, &file));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&store.ids())?);
    } else {
        for id in store.ids() {
            println!("{}", id);
        }
    }

    Ok(EXIT_PUBLISHED)
}
