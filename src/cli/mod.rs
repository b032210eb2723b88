//! CLI module for the reposter
//!
//! This module handles command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;

/// Clip Reposter
///
/// Finds a Creative Commons video, cuts a short clip out of it and publishes
/// the clip to a Facebook page, never reposting the same source twice.
#[derive(Parser, Debug)]
#[command(name = "reposter")]
#[command(about = "Republish short clips of Creative Commons videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "REPOSTER_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format (text, json)
    #[arg(long, env = "REPOSTER_LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: String,

    /// Settings file (default: ./reposter.toml when present)
    #[arg(long, env = "REPOSTER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find, cut and publish one clip
    Run(args::RunArgs),
    /// List source videos that have already been published
    History(args::HistoryArgs),
}
