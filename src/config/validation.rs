//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("commands.max_specificity must be between 1 and 3, got {0}")]
    InvalidSpecificity(usize),
    #[error("socket.path_template must contain {{nick}}, got '{0}'")]
    SocketTemplateMissingNick(String),
    #[error("keepalive.{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("relay.max_line_len must be greater than zero")]
    ZeroLineLength,
    #[error("protocol.max_params must be at least 2, got {0}")]
    TooFewParams(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let specificity = config.commands.max_specificity;
    if !(1..=3).contains(&specificity) {
        errors.push(ValidationError::InvalidSpecificity(specificity));
    }

    if !config.socket.path_template.contains("{nick}") {
        errors.push(ValidationError::SocketTemplateMissingNick(
            config.socket.path_template.clone(),
        ));
    }

    let keepalive = &config.keepalive;
    for (name, value) in [
        ("ping_interval_secs", keepalive.ping_interval_secs),
        ("pong_timeout_secs", keepalive.pong_timeout_secs),
        ("reap_interval_secs", keepalive.reap_interval_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroInterval(name));
        }
    }

    if config.relay.max_line_len == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }

    if config.protocol.max_params < 2 {
        errors.push(ValidationError::TooFewParams(config.protocol.max_params));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
