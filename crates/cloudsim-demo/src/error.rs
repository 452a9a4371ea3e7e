#![forbid(unsafe_code)]

use std::fmt;
use std::io;

use crate::cli::ConfigError;
use crate::logging::LogInitError;

/// Everything that can stop the binary.
#[derive(Debug)]
pub enum RunError {
    Io(io::Error),
    Config(ConfigError),
    Log(LogInitError),
}

impl RunError {
    /// Process exit status: 2 for bad configuration, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) | Self::Log(_) => 1,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "terminal I/O failed: {e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Log(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Log(e) => Some(e),
        }
    }
}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<LogInitError> for RunError {
    fn from(e: LogInitError) -> Self {
        Self::Log(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let config: RunError = ConfigError::UnknownArgument("--x".into()).into();
        assert_eq!(config.exit_code(), 2);
        assert_eq!(config.to_string(), "unknown argument: --x");
        let io: RunError = io::Error::other("boom").into();
        assert_eq!(io.exit_code(), 1);
        assert!(io.to_string().contains("boom"));
    }
}
