//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and loading
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks run after loading

mod defaults;
mod types;
mod validation;

pub use types::{CommandsConfig, Config, ConfigError};
pub use validation::{ValidationError, validate};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "MULTIBOT_CONFIG";
