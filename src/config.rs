//! # Feature: Process Settings
//!
//! Environment-driven settings for the relay process. The moderation rules
//! themselves live in the JSON document handled by [`crate::config_store`];
//! this module only covers what the binary needs before it can connect.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Configurable command prefix and default presence text
//! - 1.0.0: Initial environment variable configuration

use anyhow::Result;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_ACTION_LOG_PATH: &str = "bot_logs.txt";
pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const DEFAULT_STATUS: &str = "Good Morning messages 👀";

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub config_path: PathBuf,
    pub action_log_path: PathBuf,
    pub command_prefix: String,
    pub default_status: String,
    pub log_level: String,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("DISCORD_TOKEN environment variable not set"))?;

        let command_prefix = lookup("COMMAND_PREFIX")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());

        Ok(Settings {
            discord_token,
            config_path: lookup("CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            action_log_path: lookup("ACTION_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ACTION_LOG_PATH)),
            command_prefix,
            default_status: lookup("DEFAULT_STATUS").unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
