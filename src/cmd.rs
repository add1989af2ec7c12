//! Command implementations for the CLI interface.
//!
//! Each handler owns the task collection for the duration of one command and
//! passes it explicitly through import, manual entry and derivation.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::info;

use gantt_schedule::config::GanttConfig;
use gantt_schedule::fields::OutputFormat;
use gantt_schedule::ingest::{normalize_manual, ManualEnd, ManualEntry};
use gantt_schedule::report;
use gantt_schedule::template::{read_schedule_file, write_schedule_file, write_template_file};
use gantt_schedule::{derive, GanttError, TaskCollection};

use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Write the schedule template (gantt_chart_template.csv).
    Template {
        /// Output file or directory (default: current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import schedules, derive the timeline and print it.
    Timeline {
        /// Schedule CSV files, loaded in order into one collection
        files: Vec<PathBuf>,
        /// Manual entry "Task|Resource|Start|End-or-weeks[|Salary[|Emergency days]]", repeatable
        #[arg(long = "add")]
        add: Vec<String>,
        /// Abort if any row is rejected
        #[arg(long)]
        strict: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Bar width for the table format
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        width: Option<u16>,
    },

    /// Normalize a schedule and write it back in the canonical schema.
    Export {
        /// Input schedule CSV
        input: PathBuf,
        /// Output CSV path
        #[arg(long, short)]
        output: PathBuf,
        /// Abort if any row is rejected
        #[arg(long)]
        strict: bool,
    },

    /// Launch the interactive schedule session.
    Ui {
        /// Schedule CSV to load at start
        file: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Write the template file.
pub fn cmd_template(config: &GanttConfig, output: Option<PathBuf>) -> Result<(), GanttError> {
    let target = output.unwrap_or_else(|| PathBuf::from("."));
    let path = write_template_file(&target, &config.template.file_name)?;
    println!("Template written to {}", path.display());
    Ok(())
}

/// Import one file into `collection`, reporting rejected rows on stderr.
fn import_into(collection: &mut TaskCollection, path: &Path, strict: bool) -> Result<(), GanttError> {
    let imported = read_schedule_file(path).map_err(|source| GanttError::Import {
        path: path.to_path_buf(),
        source,
    })?;

    for rejected in &imported.rejected {
        eprintln!("Warning: {}: {}", path.display(), rejected);
    }
    info!(
        path = %path.display(),
        accepted = imported.accepted.len(),
        rejected = imported.rejected.len(),
        "imported schedule"
    );

    let accepted = if strict {
        imported.into_strict().map_err(|rejected| GanttError::Rejected {
            path: path.to_path_buf(),
            count: rejected.len(),
        })?
    } else {
        imported.accepted
    };
    collection.extend(accepted);
    Ok(())
}

/// Parse a `--add` value into form fields.
pub fn parse_entry(s: &str) -> Result<ManualEntry, GanttError> {
    let invalid = |reason: &str| GanttError::Entry { entry: s.to_string(), reason: reason.to_string() };

    let parts: Vec<&str> = s.split('|').map(str::trim).collect();
    if !(4..=6).contains(&parts.len()) {
        return Err(invalid("expected Task|Resource|Start|End-or-weeks[|Salary[|Emergency days]]"));
    }

    let end = parts[3];
    let end = if end.contains('-') {
        ManualEnd::Date(end.to_string())
    } else {
        let weeks = end
            .trim_end_matches("weeks")
            .trim_end_matches('w')
            .trim();
        ManualEnd::Weeks(weeks.parse().map_err(|_| invalid("end must be a YYYY-MM-DD date or a week count"))?)
    };

    let salary = match parts.get(4).filter(|p| !p.is_empty()) {
        Some(p) => Some(p.parse::<f64>().map_err(|_| invalid("salary must be a number"))?),
        None => None,
    };
    let emergency_time = match parts.get(5).filter(|p| !p.is_empty()) {
        Some(p) => Some(p.parse::<u32>().map_err(|_| invalid("emergency time must be a whole number of days"))?),
        None => None,
    };

    Ok(ManualEntry {
        task: parts[0].to_string(),
        resource: parts[1].to_string(),
        start: parts[2].to_string(),
        end,
        salary,
        emergency_time,
    })
}

/// Build a collection from files and manual entries, then print its timeline.
pub fn cmd_timeline(
    config: &GanttConfig,
    files: Vec<PathBuf>,
    add: Vec<String>,
    strict: bool,
    format: OutputFormat,
    width: Option<u16>,
) -> Result<(), GanttError> {
    let strict = strict || config.import.strict;
    let mut collection = TaskCollection::new();

    for path in &files {
        import_into(&mut collection, path, strict)?;
    }
    for raw in &add {
        let entry = parse_entry(raw)?;
        collection.append(normalize_manual(&entry)?);
    }

    let table = derive(&collection);
    let width = width.map(usize::from).unwrap_or(config.display.chart_width);
    print!("{}", report::render(&table, format, width)?);
    Ok(())
}

/// Re-export a schedule in the canonical schema.
pub fn cmd_export(config: &GanttConfig, input: PathBuf, output: PathBuf, strict: bool) -> Result<(), GanttError> {
    let mut collection = TaskCollection::new();
    import_into(&mut collection, &input, strict || config.import.strict)?;
    write_schedule_file(&output, &collection)?;
    println!("Exported {} task(s) to {}", collection.len(), output.display());
    Ok(())
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &GanttConfig, file: Option<PathBuf>) -> Result<(), GanttError> {
    run_tui(config, file.as_deref())?;
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
