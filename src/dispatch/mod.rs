//! Command lookup and launch.
//!
//! A sourced message is mapped to an executable under the commands root
//! (see [`candidates`] for the search order). The first executable regular
//! file found is started with the message parameters as arguments and the
//! sender's identity in its environment, then left to run on its own.

pub mod candidates;
mod children;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use multibot_proto::{Identity, ParsedMessage};
use nix::unistd::{AccessFlags, access};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::CommandsConfig;
use crate::telemetry::spans;

pub use children::DetachedChildren;

/// Path of the local relay socket.
pub const ENV_SOCK: &str = "IRC_SOCK";
pub const ENV_NICK: &str = "IRC_NICK";
pub const ENV_IDENT: &str = "IRC_IDENT";
pub const ENV_HOST: &str = "IRC_HOST";

/// A command selected for a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Path relative to the commands root, e.g. `PRIVMSG/_chan-chan.cmd`.
    pub relative: String,
    /// Absolute path that was probed.
    pub path: PathBuf,
}

/// Outcome of [`Dispatcher::dispatch`].
#[derive(Debug)]
pub enum Dispatch {
    /// No candidate was executable.
    NoMatch,
    /// The command was started.
    Spawned(Resolved),
    /// The command was found but could not be started.
    Failed(Resolved),
}

pub struct Dispatcher {
    /// Absolute commands root; probe base and child working directory.
    root: PathBuf,
    /// Root as configured, used to build the child's `argv[0]`.
    display_root: PathBuf,
    max_specificity: usize,
    socket_path: PathBuf,
    children: DetachedChildren,
}

impl Dispatcher {
    pub fn new(config: &CommandsConfig, socket_path: impl Into<PathBuf>) -> Self {
        let root = std::path::absolute(&config.root).unwrap_or_else(|_| config.root.clone());
        Self {
            root,
            display_root: config.root.clone(),
            max_specificity: config.max_specificity,
            socket_path: socket_path.into(),
            children: DetachedChildren::new(),
        }
    }

    /// Find the most specific executable for `msg`.
    pub fn resolve(&self, msg: &ParsedMessage<'_>) -> Option<Resolved> {
        candidates::candidates(msg, self.max_specificity)
            .into_iter()
            .find_map(|relative| {
                let path = self.root.join(&relative);
                if is_executable(&path) {
                    Some(Resolved { relative, path })
                } else {
                    None
                }
            })
    }

    /// Resolve `msg` and start the matching command, if any.
    pub fn dispatch(&mut self, msg: &ParsedMessage<'_>) -> Dispatch {
        let Some(resolved) = self.resolve(msg) else {
            debug!(command = ?msg.command(), "no command matched");
            return Dispatch::NoMatch;
        };

        let origin = msg.origin().unwrap_or_default();
        let _span = spans::dispatch(&resolved.relative, origin).entered();
        let identity = Identity::parse(origin);

        let mut cmd = Command::new(&resolved.path);
        cmd.arg0(self.display_root.join(&resolved.relative))
            .args(&msg.params()[1..])
            .current_dir(&self.root)
            .env(ENV_SOCK, &self.socket_path)
            .env(ENV_NICK, identity.nick)
            .env(ENV_IDENT, identity.ident)
            .env(ENV_HOST, identity.host)
            .stdin(Stdio::null())
            .stdout(Stdio::null());

        match cmd.spawn() {
            Ok(child) => {
                info!(pid = ?child.id(), "command started");
                self.children.track(resolved.relative.clone(), child);
                Dispatch::Spawned(resolved)
            }
            Err(e) => {
                warn!(error = %e, "failed to start command");
                Dispatch::Failed(resolved)
            }
        }
    }

    /// Collect finished commands.
    pub fn reap(&mut self) -> usize {
        if self.children.is_empty() {
            return 0;
        }
        self.children.reap()
    }

    /// Commands started and not yet collected.
    pub fn running(&self) -> usize {
        self.children.len()
    }
}

/// Regular file this process is allowed to execute.
fn is_executable(path: &Path) -> bool {
    let is_file = std::fs::metadata(path).is_ok_and(|meta| meta.is_file());
    is_file && access(path, AccessFlags::X_OK).is_ok()
}
