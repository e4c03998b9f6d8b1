//! Logging
//!
//! Structured `tracing` output for the binary. Settings come from the
//! `[logging]` config section, then `TREEVIEW_LOG_*` environment variables,
//! then command-line flags. Output goes to stderr unless configured
//! otherwise, leaving stdout to the rendered page.

use crate::error::ApiError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Full filter override, in `EnvFilter` syntax
pub const FILTER_ENV: &str = "TREEVIEW_LOG";
/// Extra comma-separated directives appended to the configured level
pub const MODULES_ENV: &str = "TREEVIEW_LOG_MODULES";
pub const FORMAT_ENV: &str = "TREEVIEW_LOG_FORMAT";
pub const OUTPUT_ENV: &str = "TREEVIEW_LOG_OUTPUT";
pub const FILE_ENV: &str = "TREEVIEW_LOG_FILE";

const LOG_FILE_NAME: &str = "treeview.log";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
    #[serde(rename = "file+stderr")]
    #[value(name = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    Both,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl LogOutput {
    pub fn as_str(self) -> &'static str {
        match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
            LogOutput::FileAndStderr => "file+stderr",
            LogOutput::Both => "both",
        }
    }

    pub fn uses_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <LogFormat as ValueEnum>::from_str(s, true).map_err(|_| {
            ApiError::ConfigError(format!("Invalid log format: {} (must be 'json' or 'text')", s))
        })
    }
}

impl FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <LogOutput as ValueEnum>::from_str(s, true).map_err(|_| {
            ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                s
            ))
        })
    }
}

/// `[logging]` config section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Base level directive: trace, debug, info, warn, error, off
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Log file for the file outputs; unset uses the platform state directory
    pub file: Option<PathBuf>,
    /// ANSI colors for text written to a terminal stream
    pub color: bool,
    /// Per-target levels, e.g. `"treeview::tree" = "debug"`
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            file: None,
            color: true,
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Apply `TREEVIEW_LOG_FORMAT`, `TREEVIEW_LOG_OUTPUT` and `TREEVIEW_LOG_FILE`.
    pub fn apply_env(&mut self) -> Result<(), ApiError> {
        self.apply_overrides(
            non_empty_var(FORMAT_ENV).as_deref(),
            non_empty_var(OUTPUT_ENV).as_deref(),
            non_empty_var(FILE_ENV).map(PathBuf::from),
        )
    }

    fn apply_overrides(
        &mut self,
        format: Option<&str>,
        output: Option<&str>,
        file: Option<PathBuf>,
    ) -> Result<(), ApiError> {
        if let Some(format) = format {
            self.format = format.parse()?;
        }
        if let Some(output) = output {
            self.output = output.parse()?;
        }
        if file.is_some() {
            self.file = file;
        }
        Ok(())
    }

    /// Log file used by the file outputs.
    pub fn log_file(&self, repo: Option<&Path>) -> Result<PathBuf, ApiError> {
        match &self.file {
            Some(file) if !file.as_os_str().is_empty() => Ok(file.clone()),
            _ => default_log_file_path(repo),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// `<state dir>/treeview/<canonical repo path>/treeview.log`
fn default_log_file_path(repo: Option<&Path>) -> Result<PathBuf, ApiError> {
    let dirs = directories::ProjectDirs::from("", "", "treeview").ok_or_else(|| {
        ApiError::ConfigError("No home directory for the default log file".to_string())
    })?;
    let mut dir = dirs.state_dir().unwrap_or_else(|| dirs.cache_dir()).to_path_buf();
    if let Some(repo) = repo {
        let canonical = dunce::canonicalize(repo).map_err(|e| {
            ApiError::ConfigError(format!("Cannot resolve repository {}: {}", repo.display(), e))
        })?;
        dir.extend(canonical.components().filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        }));
    }
    Ok(dir.join(LOG_FILE_NAME))
}

/// Install the global subscriber.
///
/// `config` should already carry environment and command-line overrides.
/// `repo` scopes the default log file. Installing twice is an error.
pub fn init_logging(config: &LoggingConfig, repo: Option<&Path>) -> Result<(), ApiError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_filter(config)?;
    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::Both => BoxMakeWriter::new(io::stdout.and(io::stderr)),
        LogOutput::File => BoxMakeWriter::new(Mutex::new(open_log_file(&config.log_file(repo)?)?)),
        LogOutput::FileAndStderr => BoxMakeWriter::new(
            Mutex::new(open_log_file(&config.log_file(repo)?)?).and(io::stderr),
        ),
    };

    let registry = Registry::default().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color && !config.output.uses_file())
                    .with_writer(writer),
            )
            .try_init(),
    };
    installed.map_err(|e| ApiError::ConfigError(format!("Logging already initialised: {}", e)))
}

fn open_log_file(path: &Path) -> Result<File, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Cannot create log directory {}: {}", parent.display(), e))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ApiError::ConfigError(format!("Cannot open log file {}: {}", path.display(), e)))
}

/// `TREEVIEW_LOG` replaces everything; otherwise the configured level plus
/// module directives from config and `TREEVIEW_LOG_MODULES`.
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(FILTER_ENV) {
        return Ok(filter);
    }
    let env_modules = non_empty_var(MODULES_ENV).unwrap_or_default();
    filter_from(config, &env_modules)
}

fn filter_from(config: &LoggingConfig, extra: &str) -> Result<EnvFilter, ApiError> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ApiError::ConfigError(format!("Invalid log level {:?}: {}", config.level, e)))?;

    let directives = config
        .modules
        .iter()
        .map(|(target, level)| format!("{}={}", target, level))
        .chain(
            extra
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        );
    for directive in directives {
        let parsed = directive
            .parse()
            .map_err(|e| ApiError::ConfigError(format!("Invalid log directive {:?}: {}", directive, e)))?;
        filter = filter.add_directive(parsed);
    }
    Ok(filter)
}
