//! Configuration loading.
//!
//! Lookup order: an explicit `--config` path, then `./gantt.toml`, then
//! `~/.gantt/config.toml`. With none present the defaults apply. Every
//! section and key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GanttError;
use crate::fields::ImportMode;
use crate::template::TEMPLATE_FILE_NAME;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttConfig {
    pub import: ImportConfig,
    pub template: TemplateConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Preselected choice when a file is imported into a non-empty session.
    pub mode: ImportMode,
    /// Abort CLI imports on any rejected row.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub file_name: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self { file_name: TEMPLATE_FILE_NAME.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Bar columns used by the text timeline.
    pub chart_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { chart_width: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file directory; required for any logging in the interactive UI.
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), directory: None }
    }
}

/// `~/.gantt`, if a home directory is known.
pub fn data_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .filter(|h| !h.trim().is_empty())
        .map(|h| PathBuf::from(h).join(".gantt"))
}

/// Parse a config document.
pub fn parse(s: &str) -> Result<GanttConfig, GanttError> {
    toml::from_str(s).map_err(|e| GanttError::Config(e.to_string()))
}

/// Load a config file from an explicit path. The file must exist.
pub fn load_file(path: &Path) -> Result<GanttConfig, GanttError> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| GanttError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&s).map_err(|e| GanttError::Config(format!("{}: {}", path.display(), e)))
}

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "gantt.toml";

/// Resolve configuration using the standard lookup order.
pub fn load(explicit: Option<&Path>) -> Result<GanttConfig, GanttError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_from(explicit, &cwd, data_dir())
}

/// Lookup order: `explicit`, then `cwd/gantt.toml`, then `data_dir/config.toml`, then defaults.
pub fn load_from(explicit: Option<&Path>, cwd: &Path, home_dir: Option<PathBuf>) -> Result<GanttConfig, GanttError> {
    if let Some(path) = explicit {
        return load_file(path);
    }

    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return load_file(&local);
    }
    if let Some(home) = home_dir.map(|d| d.join("config.toml")).filter(|p| p.exists()) {
        return load_file(&home);
    }
    Ok(GanttConfig::default())
}
