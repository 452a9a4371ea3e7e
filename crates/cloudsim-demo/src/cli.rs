#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args by hand (no external parser). Every flag that takes a value
//! can also be set through a `CLOUDSIM_*` environment variable; flags win
//! over the environment, which wins over defaults.

use std::env;
use std::fmt;

use crate::catalog::{ResourceId, known_ids};
use crate::config::{DEFAULT_ENV, DEFAULT_REGION};
use crate::simulation::{Action, MIN_SPEED, StalePolicy};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
cloudsim - AWS infrastructure demo with simulated Terraform runs

USAGE:
    cloudsim [OPTIONS]

OPTIONS:
    --env=NAME           Environment badge (default: dev)
    --region=NAME        Region badge (default: ap-south-1)
    --speed=F            Time scale for the scripted delays, 2.0 = twice as fast
    --stale=POLICY       On selection change mid-run: 'cancel' (default) or 'finish'
    --select=ID          Start with resource ID selected (vpc, ec2, s3, ...)
    --no-mouse           Disable mouse event capture
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --script=ACTIONS     Headless: run 'plan', 'apply', or 'plan,apply' and print output
    --list               Print the resource catalog as JSON
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    1-8             Select a resource
    Arrows / hjkl   Move the selection
    p               Terraform plan
    a               Terraform apply
    PgUp / PgDn     Scroll the output
    ?               Toggle help overlay
    q / Esc / Ctrl+C  Quit

ENVIRONMENT VARIABLES:
    CLOUDSIM_ENV              Override --env
    CLOUDSIM_REGION           Override --region
    CLOUDSIM_SPEED            Override --speed
    CLOUDSIM_STALE            Override --stale
    CLOUDSIM_SELECT           Override --select
    CLOUDSIM_EXIT_AFTER_MS    Override --exit-after-ms
    CLOUDSIM_LOG_FILE         Write logs to this file
    CLOUDSIM_LOG_FORMAT       'json' for JSON log lines
    CLOUDSIM_LOG              Log filter directive (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub env: String,
    pub region: String,
    /// Delay divisor; always finite and positive.
    pub speed: f64,
    pub stale: StalePolicy,
    pub select: Option<ResourceId>,
    pub mouse: bool,
    pub exit_after_ms: u64,
    /// Headless actions to run instead of the UI.
    pub script: Option<Vec<Action>>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            env: DEFAULT_ENV.into(),
            region: DEFAULT_REGION.into(),
            speed: 1.0,
            stale: StalePolicy::default(),
            select: None,
            mouse: true,
            exit_after_ms: 0,
            script: None,
        }
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    List,
    Help,
    Version,
}

/// A flag or environment variable that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    UnknownResource {
        key: &'static str,
        value: String,
    },
    UnknownArgument(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid {key} value {value:?}: expected {expected}"),
            Self::UnknownResource { key, value } => write!(
                f,
                "unknown resource {value:?} for {key}: expected one of {}",
                known_ids()
            ),
            Self::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Opts {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Command, ConfigError> {
        Self::parse_from(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Parse `args` (without the program name), reading variables through `env`.
    pub fn parse_from<I, F>(args: I, env: F) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first, so flags can override it.
        if let Some(val) = env("CLOUDSIM_ENV") {
            opts.env = parse_name("CLOUDSIM_ENV", &val)?;
        }
        if let Some(val) = env("CLOUDSIM_REGION") {
            opts.region = parse_name("CLOUDSIM_REGION", &val)?;
        }
        if let Some(val) = env("CLOUDSIM_SPEED") {
            opts.speed = parse_speed("CLOUDSIM_SPEED", &val)?;
        }
        if let Some(val) = env("CLOUDSIM_STALE") {
            opts.stale = parse_stale("CLOUDSIM_STALE", &val)?;
        }
        if let Some(val) = env("CLOUDSIM_SELECT") {
            opts.select = Some(parse_select("CLOUDSIM_SELECT", &val)?);
        }
        if let Some(val) = env("CLOUDSIM_EXIT_AFTER_MS") {
            opts.exit_after_ms = parse_millis("CLOUDSIM_EXIT_AFTER_MS", &val)?;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--list" => return Ok(Command::List),
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--env=") {
                        opts.env = parse_name("--env", val)?;
                    } else if let Some(val) = other.strip_prefix("--region=") {
                        opts.region = parse_name("--region", val)?;
                    } else if let Some(val) = other.strip_prefix("--speed=") {
                        opts.speed = parse_speed("--speed", val)?;
                    } else if let Some(val) = other.strip_prefix("--stale=") {
                        opts.stale = parse_stale("--stale", val)?;
                    } else if let Some(val) = other.strip_prefix("--select=") {
                        opts.select = Some(parse_select("--select", val)?);
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_millis("--exit-after-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--script=") {
                        opts.script = Some(parse_script("--script", val)?);
                    } else {
                        return Err(ConfigError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

fn invalid(key: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        expected,
    }
}

fn parse_name(key: &'static str, val: &str) -> Result<String, ConfigError> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        return Err(invalid(key, val, "a non-empty name"));
    }
    Ok(trimmed.to_string())
}

fn parse_speed(key: &'static str, val: &str) -> Result<f64, ConfigError> {
    match val.trim().parse::<f64>() {
        Ok(speed) if speed.is_finite() && speed >= MIN_SPEED => Ok(speed),
        _ => Err(invalid(key, val, "a number no smaller than 0.001")),
    }
}

fn parse_stale(key: &'static str, val: &str) -> Result<StalePolicy, ConfigError> {
    match val.trim() {
        "cancel" => Ok(StalePolicy::Cancel),
        "finish" => Ok(StalePolicy::Finish),
        _ => Err(invalid(key, val, "'cancel' or 'finish'")),
    }
}

fn parse_select(key: &'static str, val: &str) -> Result<ResourceId, ConfigError> {
    ResourceId::find(val.trim()).ok_or_else(|| ConfigError::UnknownResource {
        key,
        value: val.to_string(),
    })
}

fn parse_millis(key: &'static str, val: &str) -> Result<u64, ConfigError> {
    val.trim()
        .parse()
        .map_err(|_| invalid(key, val, "a whole number of milliseconds"))
}

fn parse_script(key: &'static str, val: &str) -> Result<Vec<Action>, ConfigError> {
    let actions = val
        .split(',')
        .map(|part| match part.trim() {
            "plan" => Ok(Action::Plan),
            "apply" => Ok(Action::Apply),
            _ => Err(invalid(key, val, "'plan', 'apply', or a comma-separated list")),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(actions)
}
