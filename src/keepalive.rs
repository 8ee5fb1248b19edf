//! PING/PONG liveness watchdog for the control connection.
//!
//! The watchdog only tracks deadlines; the relay loop sleeps until them and
//! calls back in. Every `ping_interval` a PING goes out and a PONG deadline
//! is armed. A PONG disarms it. Reaching the deadline while still waiting
//! is fatal: the connection is presumed dead and the process exits so the
//! supervisor can reconnect.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{RelayError, RelayResult};

/// Liveness probe sent to the server.
pub const PING_LINE: &str = "PING :localhost";
/// Reply to a server-initiated PING.
pub const PONG_LINE: &str = "PONG :localhost";

#[derive(Debug)]
pub struct Watchdog {
    ping_interval: Duration,
    pong_timeout: Duration,
    next_ping: Instant,
    pong_deadline: Option<Instant>,
}

impl Watchdog {
    /// Create a watchdog whose first PING is due one interval after `now`.
    pub fn new(ping_interval: Duration, pong_timeout: Duration, now: Instant) -> Self {
        Self {
            ping_interval,
            pong_timeout,
            next_ping: now + ping_interval,
            pong_deadline: None,
        }
    }

    /// When the next PING is due.
    pub fn next_ping(&self) -> Instant {
        self.next_ping
    }

    /// When the outstanding PING times out, if one is outstanding.
    pub fn pong_deadline(&self) -> Option<Instant> {
        self.pong_deadline
    }

    /// The ping interval elapsed. Returns the probe to send.
    ///
    /// An already armed deadline is kept, so a PONG is always required
    /// within `pong_timeout` of the oldest unanswered PING.
    pub fn on_ping_timer(&mut self, now: Instant) -> &'static str {
        self.next_ping = now + self.ping_interval;
        if self.pong_deadline.is_none() {
            self.pong_deadline = Some(now + self.pong_timeout);
        }
        debug!(deadline_in = ?self.pong_timeout, "sending keepalive PING");
        PING_LINE
    }

    /// A PONG arrived. Disarming an idle watchdog is a no-op.
    pub fn on_pong(&mut self) {
        if self.pong_deadline.take().is_some() {
            debug!("keepalive PONG received");
        }
    }

    /// The PONG deadline was reached.
    pub fn on_pong_timer(&mut self, now: Instant) -> RelayResult {
        match self.pong_deadline {
            Some(deadline) if now >= deadline => {
                warn!(timeout = ?self.pong_timeout, "keepalive PONG overdue");
                Err(RelayError::PongTimeout(self.pong_timeout))
            }
            _ => Ok(()),
        }
    }
}
