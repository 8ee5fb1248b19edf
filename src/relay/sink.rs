//! Single exit point for lines sent to the IRC server.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::protocol_log::{Direction, ProtocolLog};
use crate::error::{RelayError, RelayResult};

/// Writes outbound lines to the control connection and the protocol log.
///
/// Lines starting with a sensitive prefix (credential exchange with
/// services) go to the server but are never logged.
pub struct OutboundSink<W, L> {
    control: W,
    log: ProtocolLog<L>,
    sensitive_prefixes: Vec<String>,
}

impl<W, L> OutboundSink<W, L>
where
    W: AsyncWrite + Unpin,
    L: AsyncWrite + Unpin,
{
    pub fn new(control: W, log: L, sensitive_prefixes: Vec<String>) -> Self {
        Self {
            control,
            log: ProtocolLog::new(log),
            sensitive_prefixes,
        }
    }

    pub fn is_sensitive(&self, line: &str) -> bool {
        self.sensitive_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }

    /// Send `line` (without terminator) to the server.
    pub async fn send(&mut self, line: &str) -> RelayResult {
        let mut wire = String::with_capacity(line.len() + 2);
        wire.push_str(line);
        wire.push_str("\r\n");

        self.control
            .write_all(wire.as_bytes())
            .await
            .map_err(RelayError::ControlWrite)?;
        self.control.flush().await.map_err(RelayError::ControlWrite)?;

        if self.is_sensitive(line) {
            trace!("outbound line withheld from protocol log");
            return Ok(());
        }
        self.log.record(Direction::Outbound, line).await
    }

    /// Record a line received from the server.
    pub async fn log_inbound(&mut self, line: &str) -> RelayResult {
        self.log.record(Direction::Inbound, line).await
    }

    #[cfg(test)]
    pub fn control(&self) -> &W {
        &self.control
    }

    #[cfg(test)]
    pub fn log(&self) -> &L {
        self.log.get_ref()
    }
}
