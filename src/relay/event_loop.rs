//! The relay event loop.
//!
//! One task, one `select!`: control input, local socket input, the two
//! keepalive deadlines and the reap tick are handled one at a time, each to
//! completion. All complete lines from one read are processed, in order,
//! before the loop polls again.

use std::time::Duration;

use multibot_proto::{Delimiter, LineBuffer, ProtocolError, sanitize_relay_line};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::{Instant, MissedTickBehavior, sleep_until};
use tracing::{Instrument, debug, info, trace};

use super::local::LocalChannel;
use super::sink::OutboundSink;
use crate::config::Config;
use crate::dispatch::{Dispatch, Dispatcher};
use crate::error::{RelayError, RelayResult};
use crate::keepalive::{PONG_LINE, Watchdog};
use crate::session::{Inbound, Session, classify};
use crate::telemetry::spans;

/// Bytes read from the control connection per wakeup.
const READ_CHUNK: usize = 4096;

/// Everything the relay loop owns.
pub struct Relay<R, W, L> {
    control_in: R,
    control_buf: LineBuffer,
    sink: OutboundSink<W, L>,
    local: LocalChannel,
    watchdog: Watchdog,
    dispatcher: Dispatcher,
    session: Session,
    max_params: usize,
    max_line_len: usize,
    reap_interval: Duration,
}

impl<R, W, L> Relay<R, W, L>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    L: AsyncWrite + Unpin,
{
    /// Wire up a relay. The keepalive clock starts now.
    pub fn new(
        config: &Config,
        session: Session,
        local: LocalChannel,
        control_in: R,
        control_out: W,
        log: L,
    ) -> Self {
        let dispatcher = Dispatcher::new(&config.commands, local.path());
        Self {
            control_in,
            control_buf: LineBuffer::new(Delimiter::CrLf),
            sink: OutboundSink::new(control_out, log, config.relay.sensitive_prefixes.clone()),
            local,
            watchdog: Watchdog::new(
                config.keepalive.ping_interval(),
                config.keepalive.pong_timeout(),
                Instant::now(),
            ),
            dispatcher,
            session,
            max_params: config.protocol.max_params,
            max_line_len: config.relay.max_line_len,
            reap_interval: config.keepalive.reap_interval(),
        }
    }

    /// Register with the server and relay until a fatal condition.
    pub async fn run(&mut self) -> RelayError {
        let span = spans::relay(self.session.nick(), &self.local.path().display().to_string());
        match self.serve().instrument(span).await {
            Ok(never) => match never {},
            Err(e) => e,
        }
    }

    async fn serve(&mut self) -> RelayResult<std::convert::Infallible> {
        for line in self.session.registration() {
            self.sink.send(&line).await?;
        }
        info!("registered, relaying");

        let mut scratch = vec![0u8; READ_CHUNK];
        let mut reap = tokio::time::interval(self.reap_interval);
        reap.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately, we don't want that
        reap.tick().await;

        loop {
            let next_ping = self.watchdog.next_ping();
            let pong_deadline = self.watchdog.pong_deadline();

            // Deadlines are checked before input so a due PONG timeout is
            // never pushed back by a PING or a busy connection.
            tokio::select! {
                biased;

                _ = sleep_until(pong_deadline.unwrap_or(next_ping)), if pong_deadline.is_some() => {
                    self.watchdog.on_pong_timer(Instant::now())?;
                }

                _ = sleep_until(next_ping) => {
                    let probe = self.watchdog.on_ping_timer(Instant::now());
                    self.sink.send(probe).await?;
                }

                read = self.control_in.read(&mut scratch) => {
                    match read.map_err(ProtocolError::from)? {
                        0 => return Err(RelayError::ControlClosed),
                        n => {
                            self.control_buf.append(&scratch[..n]);
                            self.drain_control().await?;
                        }
                    }
                }

                recv = self.local.recv() => {
                    recv.map_err(RelayError::LocalRecv)?;
                    self.drain_local().await?;
                }

                _ = reap.tick() => {
                    let collected = self.dispatcher.reap();
                    if collected > 0 {
                        trace!(collected, running = self.dispatcher.running(), "reaped commands");
                    }
                }
            }
        }
    }

    async fn drain_control(&mut self) -> RelayResult {
        while let Some(raw) = self.control_buf.extract_line() {
            let line = String::from_utf8_lossy(&raw);
            self.handle_control_line(&line).await?;
        }
        Ok(())
    }

    async fn handle_control_line(&mut self, line: &str) -> RelayResult {
        self.sink.log_inbound(line).await?;

        if line.starts_with(':') {
            if let Some(join) = self.session.join_once() {
                self.sink.send(&join).await?;
            }
        }

        match classify(line, self.max_params) {
            Inbound::Ping => self.sink.send(PONG_LINE).await?,
            Inbound::Pong => self.watchdog.on_pong(),
            Inbound::Message(msg) => match self.dispatcher.dispatch(&msg) {
                Dispatch::Spawned(resolved) => {
                    trace!(
                        command = %resolved.relative,
                        running = self.dispatcher.running(),
                        "command dispatched"
                    );
                }
                Dispatch::Failed(resolved) => {
                    debug!(command = %resolved.relative, "command not started");
                }
                Dispatch::NoMatch => {}
            },
            Inbound::Ignored => trace!(line, "ignored"),
        }
        Ok(())
    }

    async fn drain_local(&mut self) -> RelayResult {
        while let Some(raw) = self.local.next_line() {
            let line = sanitize_relay_line(&raw, self.max_line_len);
            self.sink.send(&line).await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn sink(&self) -> &OutboundSink<W, L> {
        &self.sink
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
