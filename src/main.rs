//! multibot - IRC to local command relay
//!
//! Reads IRC from stdin, writes IRC to stdout, and runs executables from a
//! commands directory in response to messages. Commands reply through a
//! local datagram socket.
//!
//! Usage: `multibot <user> <channel> <log>`

mod config;
mod dispatch;
mod error;
mod keepalive;
mod relay;
mod session;
mod telemetry;

use crate::config::Config;
use crate::error::BootstrapError;
use crate::relay::{LocalChannel, Relay};
use crate::session::Session;
use tokio::fs::OpenOptions;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [nick, channel, log_path]: [String; 3] =
        args.try_into().map_err(|_| BootstrapError::Usage)?;

    // Initialize tracing
    telemetry::init();

    // Load configuration
    let config = Config::from_env().map_err(BootstrapError::from)?;
    config::validate(&config).map_err(BootstrapError::Validation)?;

    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .await
        .map_err(|source| BootstrapError::OpenLog {
            path: log_path.clone().into(),
            source,
        })?;

    let socket_path = config.socket.path_for(&nick);
    let local = LocalChannel::bind(&socket_path).map_err(|source| BootstrapError::BindSocket {
        path: socket_path.clone(),
        source,
    })?;

    info!(
        nick = %nick,
        channel = %channel,
        commands = %config.commands.root.display(),
        socket = %socket_path.display(),
        "Starting multibot"
    );

    let mut relay = Relay::new(
        &config,
        Session::new(nick, channel),
        local,
        tokio::io::stdin(),
        tokio::io::stdout(),
        log,
    );

    let err = relay.run().await;
    error!(code = err.error_code(), error = %err, "relay stopped");
    // A pending stdin read runs on a blocking thread that runtime shutdown
    // would wait on forever.
    std::process::exit(1)
}
