#![forbid(unsafe_code)]

//! Resolved application settings.

use std::time::Duration;

use cloudsim_runtime::ProgramConfig;

use crate::catalog::ResourceId;
use crate::cli::Opts;
use crate::simulation::{SimTimings, StalePolicy};

pub const DEFAULT_ENV: &str = "dev";
pub const DEFAULT_REGION: &str = "ap-south-1";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Label of the environment badge.
    pub env: String,
    /// Label of the region badge.
    pub region: String,
    pub timings: SimTimings,
    pub stale: StalePolicy,
    pub initial_selection: Option<ResourceId>,
    pub mouse: bool,
    /// Auto-quit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: DEFAULT_ENV.into(),
            region: DEFAULT_REGION.into(),
            timings: SimTimings::default(),
            stale: StalePolicy::default(),
            initial_selection: None,
            mouse: true,
            exit_after_ms: 0,
        }
    }
}

impl AppConfig {
    /// Runtime settings for the interactive program.
    pub fn program_config(&self) -> ProgramConfig {
        ProgramConfig {
            mouse: self.mouse,
            exit_after: (self.exit_after_ms > 0).then(|| Duration::from_millis(self.exit_after_ms)),
            ..ProgramConfig::default()
        }
    }
}

impl From<&Opts> for AppConfig {
    fn from(opts: &Opts) -> Self {
        Self {
            env: opts.env.clone(),
            region: opts.region.clone(),
            timings: SimTimings::default().scaled(opts.speed),
            stale: opts.stale,
            initial_selection: opts.select,
            mouse: opts.mouse,
            exit_after_ms: opts.exit_after_ms,
        }
    }
}
