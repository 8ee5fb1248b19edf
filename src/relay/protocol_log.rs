//! Persistent protocol log.
//!
//! Append-only; one entry per protocol line:
//!
//! ```text
//! < 1700000000 123456 :nick!user@host PRIVMSG #chan :hi
//! > 1700000000 123789 PRIVMSG #chan :hello
//! ```

use chrono::Utc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{RelayError, RelayResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    fn marker(self) -> char {
        match self {
            Direction::Inbound => '<',
            Direction::Outbound => '>',
        }
    }
}

/// `"<seconds> <microseconds>"` of the current wall clock time.
pub fn timestamp() -> String {
    let now = Utc::now();
    format!("{} {}", now.timestamp(), now.timestamp_subsec_micros())
}

pub struct ProtocolLog<L> {
    out: L,
}

impl<L: AsyncWrite + Unpin> ProtocolLog<L> {
    pub fn new(out: L) -> Self {
        Self { out }
    }

    /// Append one entry and flush it.
    pub async fn record(&mut self, direction: Direction, line: &str) -> RelayResult {
        let entry = format!("{} {} {}\r\n", direction.marker(), timestamp(), line);
        self.out
            .write_all(entry.as_bytes())
            .await
            .map_err(RelayError::LogWrite)?;
        self.out.flush().await.map_err(RelayError::LogWrite)
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &L {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_entry(entry: &str) -> (&str, u64, u32, &str) {
        let mut parts = entry.splitn(4, ' ');
        let marker = parts.next().unwrap();
        let secs = parts.next().unwrap().parse().unwrap();
        let micros = parts.next().unwrap().parse().unwrap();
        (marker, secs, micros, parts.next().unwrap())
    }

    #[tokio::test]
    async fn test_entry_format() {
        let mut log = ProtocolLog::new(Vec::new());
        log.record(Direction::Inbound, "PING :srv").await.unwrap();
        log.record(Direction::Outbound, "PONG :localhost").await.unwrap();

        let text = String::from_utf8(log.get_ref().clone()).unwrap();
        let entries: Vec<&str> = text.split_terminator("\r\n").collect();
        assert_eq!(entries.len(), 2);

        let (marker, secs, micros, line) = split_entry(entries[0]);
        assert_eq!((marker, line), ("<", "PING :srv"));
        assert!(secs > 1_600_000_000);
        assert!(micros < 1_000_000);

        let (marker, _, _, line) = split_entry(entries[1]);
        assert_eq!((marker, line), (">", "PONG :localhost"));
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        let (secs, micros) = ts.split_once(' ').unwrap();
        assert!(secs.parse::<i64>().is_ok());
        assert!(micros.parse::<u32>().unwrap() < 1_000_000);
    }
}
