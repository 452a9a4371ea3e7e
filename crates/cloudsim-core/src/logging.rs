#![forbid(unsafe_code)]

//! Logging support for terminal lifecycle events.
//!
//! Re-exports `info!` and `warn!` when the `tracing` feature is enabled and
//! provides no-op stand-ins otherwise, so this crate can log without forcing
//! a subscriber dependency on its users.

#[cfg(feature = "tracing")]
pub use tracing::{info, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_fields() {
        let signal = 15;
        crate::info!("session event");
        crate::warn!(signal, "termination signal received");
    }
}
