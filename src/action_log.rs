//! # Feature: Moderation Audit Log
//!
//! Append-only text log of every moderation decision, one
//! `[YYYY-MM-DD HH:MM:SS] description` line per entry. Writing to it never
//! fails the caller.
//!
//! - **Version**: 1.0.1
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.1: Multi-line descriptions are folded onto one line
//! - 1.0.0: Initial release with append and tail

use crate::error::{RelayError, Result};
use chrono::Local;
use log::error;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Discord rejects messages over 2000 characters; leave room for the code fence
pub const MAX_LOG_REPLY_CHARS: usize = 1900;

#[derive(Debug, Clone)]
pub struct ActionLogger {
    path: PathBuf,
}

impl ActionLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ActionLogger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line. Line breaks in `description` are folded
    /// into spaces so every entry stays on a single line. Failures go to the
    /// diagnostic log only.
    pub async fn record(&self, description: impl AsRef<str>) {
        if let Err(e) = self.append(description.as_ref()).await {
            error!("Failed to record action: {e}");
        }
    }

    async fn append(&self, description: &str) -> Result<()> {
        let line = format!(
            "[{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            description.replace(['\r', '\n'], " ")
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| self.write_error(source))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|source| self.write_error(source))?;
        file.flush()
            .await
            .map_err(|source| self.write_error(source))?;
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> RelayError {
        RelayError::LogWrite {
            path: self.path.clone(),
            source,
        }
    }

    /// Last `max_lines` lines of the log; empty when the log does not exist
    pub async fn tail(&self, max_lines: usize) -> Vec<String> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    error!("Failed to read action log {}: {e}", self.path.display());
                }
                return Vec::new();
            }
        };

        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].iter().map(|l| l.to_string()).collect()
    }
}

/// Keep the last `max_chars` characters of `text`
pub fn truncate_recent(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let skip = total - max_chars;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

// ============================================================================
// Tests
// ============================================================================
