#![forbid(unsafe_code)]

//! Runtime for cloudsim models.
//!
//! - [`Program`] drives a [`Model`] against the real terminal.
//! - [`ProgramSimulator`] drives the same model headlessly with virtual time.
//! - [`TimerQueue`] holds the cancellable timers both of them share.

pub mod program;
pub mod simulator;
pub mod timer;

pub use program::{Cmd, Model, Program, ProgramConfig};
pub use simulator::{CmdRecord, ProgramSimulator};
pub use timer::{TimerGroup, TimerId, TimerQueue};
