//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::path::PathBuf;

// =============================================================================
// Command Lookup Defaults
// =============================================================================

pub fn default_commands_root() -> PathBuf {
    PathBuf::from("multibot_cmds")
}

pub fn default_max_specificity() -> usize {
    2
}

// =============================================================================
// Local Socket Defaults
// =============================================================================

pub fn default_socket_template() -> String {
    "/tmp/multibot.{nick}".to_string()
}

// =============================================================================
// Keepalive Defaults
// =============================================================================

pub fn default_ping_interval() -> u64 {
    60 * 5
}

pub fn default_pong_timeout() -> u64 {
    60
}

pub fn default_reap_interval() -> u64 {
    5
}

// =============================================================================
// Relay Defaults
// =============================================================================

pub fn default_max_line_len() -> usize {
    512
}

pub fn default_sensitive_prefixes() -> Vec<String> {
    vec!["PRIVMSG NickServ".to_string(), "NICKSERV".to_string()]
}

// =============================================================================
// Protocol Defaults
// =============================================================================

pub fn default_max_params() -> usize {
    multibot_proto::DEFAULT_MAX_PARAMS
}
