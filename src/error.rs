//! Error handling for the relay.
//!
//! Only conditions that end the process are errors. A message that matches
//! no command, a malformed line, or a command that fails to start are
//! normal outcomes and never surface here.

use std::path::PathBuf;

use multibot_proto::ProtocolError;
use thiserror::Error;

/// Fatal relay conditions. Each one terminates the process with exit code 1.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no PONG within {0:?} of PING")]
    PongTimeout(std::time::Duration),

    #[error("control connection closed")]
    ControlClosed,

    #[error("control connection read failed: {0}")]
    ControlRead(#[from] ProtocolError),

    #[error("control connection write failed: {0}")]
    ControlWrite(#[source] std::io::Error),

    #[error("protocol log write failed: {0}")]
    LogWrite(#[source] std::io::Error),

    #[error("local socket receive failed: {0}")]
    LocalRecv(#[source] std::io::Error),
}

impl RelayError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PongTimeout(_) => "pong_timeout",
            Self::ControlClosed => "control_closed",
            Self::ControlRead(_) => "control_read",
            Self::ControlWrite(_) => "control_write",
            Self::LogWrite(_) => "log_write",
            Self::LocalRecv(_) => "local_recv",
        }
    }
}

/// Result type for the relay loop.
pub type RelayResult<T = ()> = Result<T, RelayError>;

/// Startup failures, reported on stderr before the relay loop runs.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Use: multibot <user> <channel> <log>")]
    Usage,

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("invalid configuration:\n{}", list_errors(.0))]
    Validation(Vec<crate::config::ValidationError>),

    #[error("failed to open log {}: {source}", path.display())]
    OpenLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind local socket {}: {source}", path.display())]
    BindSocket {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn list_errors(errors: &[crate::config::ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationError;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RelayError::PongTimeout(std::time::Duration::from_secs(1)).error_code(),
            "pong_timeout"
        );
        assert_eq!(RelayError::ControlClosed.error_code(), "control_closed");
    }

    #[test]
    fn test_usage_message() {
        assert_eq!(
            BootstrapError::Usage.to_string(),
            "Use: multibot <user> <channel> <log>"
        );
    }

    #[test]
    fn test_validation_lists_every_error() {
        let err = BootstrapError::Validation(vec![
            ValidationError::ZeroLineLength,
            ValidationError::TooFewParams(1),
        ]);
        let text = err.to_string();
        assert!(text.contains("relay.max_line_len"));
        assert!(text.contains("protocol.max_params"));
    }
}
