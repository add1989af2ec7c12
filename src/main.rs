//! # gantt - project schedule CLI
//!
//! Command-line and terminal front end for the schedule engine in the
//! `gantt_schedule` library.
//!
//! ## Key Commands
//!
//! - `gantt template` - Write `gantt_chart_template.csv` to fill in
//! - `gantt timeline schedule.csv` - Import, derive and print the timeline
//! - `gantt timeline --add "Design|Team X|2024-03-01|4|2000"` - Add tasks by hand
//! - `gantt export schedule.csv -o clean.csv` - Rewrite a schedule in the canonical schema
//! - `gantt ui [schedule.csv]` - Interactive session with a form, imports and a Gantt view
//!
//! Nothing is stored between runs: a session's tasks live only as long as the
//! command or the interactive session that owns them.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod tui {
    pub mod app;
    pub mod chart;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use gantt_schedule::config;
use gantt_schedule::logging::{self, LogTarget};
use gantt_schedule::GanttError;

fn run(cli: Cli) -> Result<(), GanttError> {
    let config = config::load(cli.config.as_deref())?;

    let target = match cli.command {
        Commands::Ui { .. } => LogTarget::FileOnly,
        _ => LogTarget::Console,
    };
    logging::init(cli.log_level.as_deref(), &config.logging, target)?;

    match cli.command {
        Commands::Template { output } => cmd_template(&config, output),
        Commands::Timeline { files, add, strict, format, width } =>
            cmd_timeline(&config, files, add, strict, format, width),
        Commands::Export { input, output, strict } => cmd_export(&config, input, output, strict),
        Commands::Ui { file } => cmd_ui(&config, file),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
