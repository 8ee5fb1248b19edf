//! Diagnostics setup and span constructors.
//!
//! Diagnostics always go to stderr: stdout carries the IRC connection.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Honors `RUST_LOG`, defaulting to `info`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Standardized span constructors for relay observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span for one relay session.
    pub fn relay(nick: &str, socket: &str) -> Span {
        info_span!("relay", nick = %nick, socket = %socket)
    }

    /// Span for launching one command.
    pub fn dispatch(command: &str, origin: &str) -> Span {
        info_span!("dispatch", command = %command, origin = %origin)
    }
}
