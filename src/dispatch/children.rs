//! Detached command processes.
//!
//! Commands run fire-and-forget: the relay never waits on them. Handles are
//! kept here only so finished processes can be collected instead of
//! lingering as zombies.

use tokio::process::Child;
use tracing::{debug, warn};

#[derive(Debug)]
struct Running {
    command: String,
    child: Child,
}

#[derive(Debug, Default)]
pub struct DetachedChildren {
    running: Vec<Running>,
}

impl DetachedChildren {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, command: impl Into<String>, child: Child) {
        self.running.push(Running {
            command: command.into(),
            child,
        });
    }

    /// Number of commands not yet collected.
    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Collect every command that has exited. Returns how many were collected.
    pub fn reap(&mut self) -> usize {
        let before = self.running.len();
        self.running.retain_mut(|run| match run.child.try_wait() {
            Ok(Some(status)) => {
                debug!(command = %run.command, %status, "command exited");
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!(command = %run.command, error = %e, "failed to poll command");
                false
            }
        });
        before - self.running.len()
    }
}
