//! # Feature: Reply Self-Cleanup
//!
//! Deletes the bot's own warnings after a delay without holding up the
//! handler that sent them. Pending deletions are keyed by message id so a
//! message removed by a moderator first can cancel its timer.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true (`self_cleanup_delay_secs = 0`)
//!
//! ## Changelog
//! - 1.0.0: Spawned timers replace inline sleeps in the message handler

use crate::action_log::ActionLogger;
use crate::dispatcher::{Dispatcher, MessageRef, SharedDispatcher};
use dashmap::DashMap;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
pub struct CleanupScheduler {
    pending: Arc<DashMap<u64, JoinHandle<()>>>,
}

impl CleanupScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete `target` after `delay`. Returns immediately.
    pub fn schedule(
        &self,
        dispatcher: SharedDispatcher,
        actions: ActionLogger,
        target: MessageRef,
        delay: Duration,
    ) {
        let pending = self.pending.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.remove(&target.message_id);

            match dispatcher.delete(target).await {
                Ok(()) => debug!(
                    "Cleaned up reply {} in channel {}",
                    target.message_id, target.channel_id
                ),
                Err(e) => {
                    warn!(
                        "Failed to clean up reply {} in channel {}: {e}",
                        target.message_id, target.channel_id
                    );
                    actions
                        .record(format!(
                            "Failed to clean up reply {} in channel {}: {e}",
                            target.message_id, target.channel_id
                        ))
                        .await;
                }
            }
        });

        if let Some(previous) = self.pending.insert(target.message_id, handle) {
            previous.abort();
        }
    }

    /// Drop the pending deletion for a message that is already gone
    pub fn cancel(&self, message_id: u64) -> bool {
        match self.pending.remove(&message_id) {
            Some((_, handle)) => {
                handle.abort();
                debug!("Cancelled cleanup for message {message_id}");
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Abort every pending deletion (shutdown)
    pub fn cancel_all(&self) {
        let ids: Vec<u64> = self.pending.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            self.cancel(id);
        }
    }
}
