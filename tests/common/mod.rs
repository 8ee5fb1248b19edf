//! Test relay management.
//!
//! Spawns the multibot binary with piped stdio standing in for the IRC
//! server connection.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

/// A running relay with its own commands root, socket and log.
pub struct TestRelay {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    dir: TempDir,
}

impl TestRelay {
    /// Spawn a relay for `nick` in `#channel`. `extra_config` is appended
    /// to the generated config file.
    pub fn spawn(nick: &str, channel: &str, extra_config: &str) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let commands = dir.path().join("cmds");
        std::fs::create_dir_all(&commands)?;

        let config_path = dir.path().join("multibot.toml");
        let config_content = format!(
            r#"
[commands]
root = "{}"

[socket]
path_template = "{}/sock.{{nick}}"
{}
"#,
            commands.display(),
            dir.path().display(),
            extra_config
        );
        std::fs::write(&config_path, config_content)?;

        let mut child = Command::new(env!("CARGO_BIN_EXE_multibot"))
            .args([nick, channel])
            .arg(dir.path().join("protocol.log"))
            .env("MULTIBOT_CONFIG", &config_path)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("stdout not captured"))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            dir,
        })
    }

    pub fn commands_root(&self) -> PathBuf {
        self.dir.path().join("cmds")
    }

    pub fn socket_path(&self, nick: &str) -> PathBuf {
        self.dir.path().join(format!("sock.{nick}"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("protocol.log")
    }

    /// Install an executable command script under the commands root.
    pub fn install(&self, relative: &str, body: &str) -> anyhow::Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.commands_root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, body)?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Send one line as the server (CRLF appended).
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("server side already closed"))?;
        stdin.write_all(format!("{line}\r\n").as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Next line the relay sent to the server, without CR.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let line = timeout(Duration::from_secs(5), self.stdout.next_line())
            .await??
            .ok_or_else(|| anyhow::anyhow!("relay closed its output"))?;
        Ok(line.trim_end_matches('\r').to_string())
    }

    /// Close the server side of the connection.
    pub fn hang_up(&mut self) {
        self.stdin = None;
    }

    pub async fn wait(&mut self) -> anyhow::Result<ExitStatus> {
        Ok(timeout(Duration::from_secs(5), self.child.wait()).await??)
    }
}

/// Wait until `path` exists, up to five seconds.
pub async fn wait_for_file(path: &Path) -> bool {
    for _ in 0..250 {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
