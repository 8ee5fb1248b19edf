//! Local datagram socket for command output.
//!
//! Commands learn the socket path from `IRC_SOCK` and send newline
//! terminated lines to it; each line is relayed to the server.

use std::io;
use std::path::{Path, PathBuf};

use bytes::BytesMut;
use multibot_proto::{Delimiter, LineBuffer};
use tokio::net::UnixDatagram;
use tracing::debug;

/// Largest datagram accepted in one receive.
const MAX_DATAGRAM: usize = 64 * 1024;

pub struct LocalChannel {
    socket: UnixDatagram,
    path: PathBuf,
    buffer: LineBuffer,
    scratch: Box<[u8]>,
}

impl LocalChannel {
    /// Bind at `path`, replacing a stale socket file left by a previous run.
    pub fn bind(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed stale socket"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        let socket = UnixDatagram::bind(&path)?;
        Ok(Self {
            socket,
            path,
            buffer: LineBuffer::new(Delimiter::Lf),
            scratch: vec![0u8; MAX_DATAGRAM].into_boxed_slice(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for one datagram and buffer its bytes. Cancel safe.
    pub async fn recv(&mut self) -> io::Result<usize> {
        let n = self.socket.recv(&mut self.scratch).await?;
        self.buffer.append(&self.scratch[..n]);
        Ok(n)
    }

    /// Next complete line received so far.
    pub fn next_line(&mut self) -> Option<BytesMut> {
        self.buffer.extract_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lines_span_datagrams() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("multibot.bot");
        let mut local = LocalChannel::bind(&path).unwrap();

        let client = UnixDatagram::unbound().unwrap();
        client.send_to(b"PRIVMSG #c :one\nPRIVMSG #c", &path).await.unwrap();
        client.send_to(b" :two\n", &path).await.unwrap();

        local.recv().await.unwrap();
        assert_eq!(local.next_line().as_deref(), Some(&b"PRIVMSG #c :one"[..]));
        assert!(local.next_line().is_none());

        local.recv().await.unwrap();
        assert_eq!(local.next_line().as_deref(), Some(&b"PRIVMSG #c :two"[..]));
    }

    #[tokio::test]
    async fn test_rebind_replaces_stale_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("multibot.bot");
        std::fs::write(&path, b"stale").unwrap();

        let local = LocalChannel::bind(&path).unwrap();
        assert_eq!(local.path(), path);
    }
}
