#![forbid(unsafe_code)]

//! Core: terminal lifecycle, geometry, and canonical input events.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod terminal_session;

#[cfg(feature = "tracing")]
pub use logging::{info, warn};
