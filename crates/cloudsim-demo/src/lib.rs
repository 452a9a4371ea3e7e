#![forbid(unsafe_code)]

//! AWS infrastructure demo with simulated Terraform runs.
//!
//! Eight hardcoded resources are shown as cards next to a static
//! architecture diagram. "Plan" and "Apply" are scripted, timed text
//! updates in a terminal-style panel; nothing talks to a cloud.
//!
//! - [`catalog`]: the fixed resource records and their canned diffs
//! - [`simulation`]: the plan/apply state machine
//! - [`app`]: the [`Model`](cloudsim_runtime::Model) tying selection,
//!   simulation, and input together
//! - [`views`]: rendering
//! - [`cli`], [`config`], [`logging`]: process setup
//! - [`script`]: headless runs for CI and piping

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod script;
pub mod simulation;
pub mod theme;
pub mod views;

pub use app::{AppModel, AppMsg};
pub use catalog::{RESOURCES, Resource, ResourceId, ResourceStatus};
pub use cli::{Command, ConfigError, Opts};
pub use config::AppConfig;
pub use error::RunError;
pub use simulation::{Phase, PlanScope, SimTimings, SimulationState, StalePolicy};
