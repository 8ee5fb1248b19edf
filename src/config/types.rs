//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Relay configuration.
///
/// Every section is optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Command lookup.
    #[serde(default)]
    pub commands: CommandsConfig,
    /// Local datagram socket.
    #[serde(default)]
    pub socket: SocketConfig,
    /// PING/PONG watchdog.
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
    /// Outbound relay and protocol log.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Inbound line parsing.
    #[serde(default)]
    pub protocol: ProtocolConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the file named by `MULTIBOT_CONFIG`, or use defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(super::CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Command lookup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsConfig {
    /// Directory holding the `.cmd` executables. Also the child working directory.
    #[serde(default = "default_commands_root")]
    pub root: PathBuf,
    /// Number of message parameters used for the most specific lookup (1..=3).
    #[serde(default = "default_max_specificity")]
    pub max_specificity: usize,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            root: default_commands_root(),
            max_specificity: default_max_specificity(),
        }
    }
}

/// Local datagram socket configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocketConfig {
    /// Socket path; `{nick}` is replaced with the bot nickname.
    #[serde(default = "default_socket_template")]
    pub path_template: String,
}

impl SocketConfig {
    /// Socket path for `nick`.
    pub fn path_for(&self, nick: &str) -> PathBuf {
        PathBuf::from(self.path_template.replace("{nick}", nick))
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            path_template: default_socket_template(),
        }
    }
}

/// PING/PONG watchdog configuration.
///
/// A PING is sent every `ping_interval_secs`. If no PONG arrives within
/// `pong_timeout_secs` of a PING, the relay exits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeepaliveConfig {
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u64,
    #[serde(default = "default_pong_timeout")]
    pub pong_timeout_secs: u64,
    /// How often finished command processes are collected.
    #[serde(default = "default_reap_interval")]
    pub reap_interval_secs: u64,
}

impl KeepaliveConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn pong_timeout(&self) -> Duration {
        Duration::from_secs(self.pong_timeout_secs)
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs)
    }
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: default_ping_interval(),
            pong_timeout_secs: default_pong_timeout(),
            reap_interval_secs: default_reap_interval(),
        }
    }
}

/// Outbound relay configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Longest line accepted from the local socket, in bytes.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Outbound lines starting with any of these are not written to the protocol log.
    #[serde(default = "default_sensitive_prefixes")]
    pub sensitive_prefixes: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            sensitive_prefixes: default_sensitive_prefixes(),
        }
    }
}

/// Inbound parsing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    /// Maximum number of parameters kept from one line.
    #[serde(default = "default_max_params")]
    pub max_params: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_params: default_max_params(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.commands.root, PathBuf::from("multibot_cmds"));
        assert_eq!(config.commands.max_specificity, 2);
        assert_eq!(config.keepalive.ping_interval(), Duration::from_secs(300));
        assert_eq!(config.keepalive.pong_timeout(), Duration::from_secs(60));
        assert_eq!(config.relay.max_line_len, 512);
        assert_eq!(config.protocol.max_params, 10);
    }

    #[test]
    fn test_partial_section() {
        let config: Config = toml::from_str(
            r#"
            [keepalive]
            pong_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.keepalive.pong_timeout_secs, 5);
        assert_eq!(config.keepalive.ping_interval_secs, 300);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<Config, _> = toml::from_str("[relay]\nmax_len = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_path_for_nick() {
        let socket = SocketConfig::default();
        assert_eq!(socket.path_for("bot"), PathBuf::from("/tmp/multibot.bot"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[commands]\nroot = \"/srv/cmds\"\nmax_specificity = 3").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.commands.root, PathBuf::from("/srv/cmds"));
        assert_eq!(config.commands.max_specificity, 3);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/multibot.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
