//! # Feature: Moderation Configuration Store
//!
//! JSON document holding trigger phrases, privileged/exempt users, reply
//! templates and the self-cleanup delay. The document is re-read for every
//! unit of work; there is no in-memory cache shared between events.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Legacy key names accepted on load
//! - 1.1.0: Serialized read-modify-write through `ConfigStore::modify`
//! - 1.0.0: Initial load/save with first-run defaults

use crate::error::{RelayError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Reply templates. All three keys are required in the stored document.
///
/// The aliases accept documents written by the 0.x bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTemplates {
    #[serde(alias = "morning_block")]
    pub blocked_trigger: String,
    #[serde(alias = "boss_response")]
    pub privileged_notice: String,
    #[serde(alias = "mass_mention")]
    pub mass_mention_warning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Lower-case phrases, in the order they were added
    #[serde(alias = "blocked_words")]
    pub trigger_phrases: Vec<String>,
    #[serde(alias = "boss_users")]
    pub privileged_users: BTreeSet<u64>,
    #[serde(default, alias = "ignored_users")]
    pub exempt_users: BTreeSet<u64>,
    pub responses: ResponseTemplates,
    pub auto_react: bool,
    /// Seconds before the bot deletes its own warning; 0 disables cleanup
    #[serde(alias = "delete_after")]
    pub self_cleanup_delay_secs: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            trigger_phrases: ["good morning", "gm", "shubh prabhat", "gud morning", "morning"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            privileged_users: [1368236764564553829, 1025027158567043072, 1135951424199606434]
                .into_iter()
                .collect(),
            exempt_users: BTreeSet::new(),
            responses: ResponseTemplates {
                blocked_trigger:
                    "Andha nahi hai, subah ho gayi hai. Bade aaye Good Morning bolne wale 😎"
                        .to_string(),
                privileged_notice: "Malik, aap takleef na karein... main bol dunga sabko 😌"
                    .to_string(),
                mass_mention_warning: "Maan ja, kyun ban khayega 😤".to_string(),
            },
            auto_react: true,
            self_cleanup_delay_secs: 10,
        }
    }
}

impl Configuration {
    pub fn is_privileged(&self, user_id: u64) -> bool {
        self.privileged_users.contains(&user_id)
    }

    pub fn is_exempt(&self, user_id: u64) -> bool {
        self.exempt_users.contains(&user_id)
    }

    pub fn has_trigger(&self, phrase: &str) -> bool {
        self.trigger_phrases.iter().any(|p| p == phrase)
    }
}

/// File-backed configuration store
pub struct ConfigStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the configuration, creating the default document on first run
    pub async fn load(&self) -> Result<Configuration> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No configuration at {}, writing defaults",
                    self.path.display()
                );
                let config = Configuration::default();
                self.save(&config).await?;
                return Ok(config);
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(RelayError::ConfigCorrupt {
                    path: self.path.clone(),
                    reason: "file is not valid UTF-8".to_string(),
                });
            }
            Err(source) => {
                return Err(RelayError::ConfigIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| RelayError::ConfigCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Replace the stored configuration (temp file + rename)
    pub async fn save(&self, config: &Configuration) -> Result<()> {
        let body = serde_json::to_string_pretty(config).map_err(|e| RelayError::ConfigCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let tmp_path = self.temp_path();
        let io_err = |source| RelayError::ConfigIo {
            path: self.path.clone(),
            source,
        };

        tokio::fs::write(&tmp_path, body.as_bytes())
            .await
            .map_err(io_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(io_err)?;

        debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }

    /// Load, apply `edit`, and save only when `edit` reports a change.
    ///
    /// Calls are serialized so concurrent mutating commands in this process
    /// cannot overwrite each other.
    pub async fn modify<F>(&self, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut Configuration) -> bool,
    {
        let _guard = self.write_lock.lock().await;

        let mut config = self.load().await?;
        if !edit(&mut config) {
            return Ok(false);
        }
        self.save(&config).await?;
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// ============================================================================
// Tests
// ============================================================================
