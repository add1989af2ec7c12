use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Schedule (Gantt) tool for municipal project tracking.
/// Nothing is persisted between runs; files are the only input and output.
#[derive(Parser)]
#[command(name = "gantt", version, about = "Project schedule and timeline tool")]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `gantt_schedule=debug`. Overrides GANTT_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}
