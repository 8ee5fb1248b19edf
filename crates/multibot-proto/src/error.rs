//! Error types for the line framing layer.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors surfaced while framing a byte stream into lines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended in the middle of a line.
    #[error("stream closed with {pending} bytes of an unterminated line")]
    UnterminatedLine {
        /// Number of buffered bytes that never saw a delimiter.
        pending: usize,
    },
}
