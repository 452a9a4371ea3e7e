#![forbid(unsafe_code)]

//! Tracing subscriber setup.
//!
//! The interactive UI owns the terminal, so logs only go to a file, and only
//! when `CLOUDSIM_LOG_FILE` is set. Headless script runs log to stderr,
//! leaving stdout to the transcript.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `CLOUDSIM_LOG_FILE` | append log lines to this path |
//! | `CLOUDSIM_LOG_FORMAT` | `json` for one JSON object per line |
//! | `CLOUDSIM_LOG` | `EnvFilter` directive, default `info` |

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// How the binary is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub file: Option<PathBuf>,
    pub json: bool,
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: None,
            json: false,
            filter: DEFAULT_FILTER.into(),
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            file: env("CLOUDSIM_LOG_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            json: env("CLOUDSIM_LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            filter: env("CLOUDSIM_LOG")
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILTER.into()),
        }
    }
}

#[derive(Debug)]
pub enum LogInitError {
    Open { path: PathBuf, source: io::Error },
    Filter { directive: String, message: String },
    Install(String),
}

impl fmt::Display for LogInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open log file {}: {source}", path.display())
            }
            Self::Filter { directive, message } => {
                write!(f, "invalid CLOUDSIM_LOG directive {directive:?}: {message}")
            }
            Self::Install(message) => write!(f, "cannot install log subscriber: {message}"),
        }
    }
}

impl std::error::Error for LogInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            _ => None,
        }
    }
}

enum Sink {
    File(File),
    Stderr,
}

/// Install the global subscriber. Returns `false` when logging stays off.
pub fn init_logging(settings: &LogSettings, mode: LogMode) -> Result<bool, LogInitError> {
    let sink = match (&settings.file, mode) {
        (Some(path), _) => Sink::File(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LogInitError::Open {
                    path: path.clone(),
                    source,
                })?,
        ),
        (None, LogMode::Script) => Sink::Stderr,
        (None, LogMode::Interactive) => return Ok(false),
    };

    let filter = EnvFilter::try_new(&settings.filter).map_err(|e| LogInitError::Filter {
        directive: settings.filter.clone(),
        message: e.to_string(),
    })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false);

    let installed = match (sink, settings.json) {
        (Sink::File(file), false) => builder.with_writer(Mutex::new(file)).try_init(),
        (Sink::File(file), true) => builder.json().with_writer(Mutex::new(file)).try_init(),
        (Sink::Stderr, false) => builder.with_writer(io::stderr).try_init(),
        (Sink::Stderr, true) => builder.json().with_writer(io::stderr).try_init(),
    };
    installed.map_err(|e| LogInitError::Install(e.to_string()))?;
    Ok(true)
}
