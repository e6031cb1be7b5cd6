//! # Feature: Trigger Moderation
//!
//! Runs the classifier on every inbound message and carries out the
//! resulting actions: delete and reply for standard authors, a notice and
//! reaction for privileged authors, audit-only for exempt authors, and a
//! warning for broadcast mentions. Warnings clean themselves up after the
//! configured delay.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Self-cleanup moved to spawned timers; permission fallback notice
//! - 1.0.0: Initial delete-and-reply moderation

use crate::classifier::{classify, Decision};
use crate::config_store::Configuration;
use crate::context::AppContext;
use crate::dispatcher::{Dispatcher, MessageRef, Reply, SharedDispatcher};
use crate::error::{Result, TransportError};
use crate::message::IncomingMessage;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

pub const PRIVILEGED_REACTION: char = '😌';
pub const DELETE_DENIED_NOTICE: &str = "I don't have permission to delete that message 😔";

#[derive(Clone)]
pub struct ModerationEngine {
    app: Arc<AppContext>,
}

impl ModerationEngine {
    pub fn new(app: Arc<AppContext>) -> Self {
        ModerationEngine { app }
    }

    /// Moderate one message. Returns the decisions that were acted on.
    ///
    /// A transport failure other than a permission denial aborts the rest of
    /// this message's handling.
    pub async fn handle(
        &self,
        dispatcher: SharedDispatcher,
        message: &IncomingMessage,
    ) -> Result<Vec<Decision>> {
        let config = self.app.config.load().await?;
        let decisions = classify(message, &config);

        for decision in &decisions {
            match decision {
                Decision::NoAction => {}
                Decision::PrivilegedTrigger { phrase } => {
                    self.privileged_notice(&dispatcher, message, &config, phrase)
                        .await?;
                }
                Decision::ExemptUserTrigger { phrase } => {
                    debug!("Exempt user {} used '{}'", message.author_id, phrase);
                    self.app
                        .actions
                        .record(format!(
                            "Ignored exempt user {}: {}",
                            message.author_tag,
                            message.raw_text.to_lowercase()
                        ))
                        .await;
                }
                Decision::BlockTrigger { phrase } => {
                    self.block(&dispatcher, message, &config, phrase).await?;
                }
                Decision::BroadcastMentionWarning => {
                    self.broadcast_warning(&dispatcher, message, &config).await?;
                }
            }
        }

        Ok(decisions)
    }

    async fn privileged_notice(
        &self,
        dispatcher: &SharedDispatcher,
        message: &IncomingMessage,
        config: &Configuration,
        phrase: &str,
    ) -> Result<()> {
        dispatcher
            .send(
                message.channel_id,
                Reply::text(format!(
                    "{} {}",
                    message.author_mention(),
                    config.responses.privileged_notice
                )),
            )
            .await?;

        self.app
            .actions
            .record(format!(
                "Ignored trigger '{}' from privileged user {}",
                phrase, message.author_tag
            ))
            .await;

        if config.auto_react {
            if let Err(e) = dispatcher
                .react(source_ref(message), PRIVILEGED_REACTION)
                .await
            {
                warn!("Failed to react to message {}: {e}", message.id);
            }
        }
        Ok(())
    }

    async fn block(
        &self,
        dispatcher: &SharedDispatcher,
        message: &IncomingMessage,
        config: &Configuration,
        phrase: &str,
    ) -> Result<()> {
        match dispatcher.delete(source_ref(message)).await {
            Ok(()) => {}
            Err(e @ TransportError::PermissionDenied(_)) => {
                warn!("Cannot delete message {}: {e}", message.id);
                self.app
                    .actions
                    .record(format!(
                        "Permission error trying to delete from {}",
                        message.author_tag
                    ))
                    .await;
                dispatcher
                    .send(
                        message.channel_id,
                        Reply::text(format!(
                            "{} {}",
                            message.author_mention(),
                            DELETE_DENIED_NOTICE
                        )),
                    )
                    .await?;
                return Ok(());
            }
            Err(e) => {
                error!("Failed to delete message {}: {e}", message.id);
                self.app
                    .actions
                    .record(format!(
                        "Failed to delete message from {}: {e}",
                        message.author_tag
                    ))
                    .await;
                return Err(e.into());
            }
        }

        info!(
            "Deleted message {} from {} (trigger '{}')",
            message.id, message.author_id, phrase
        );
        // The deletion is recorded even if the reply below fails
        self.app
            .actions
            .record(format!(
                "Deleted message: {} said: {}",
                message.author_tag,
                message.raw_text.to_lowercase()
            ))
            .await;

        let reply = dispatcher
            .send(
                message.channel_id,
                Reply::text(format!(
                    "{} {}",
                    message.author_mention(),
                    config.responses.blocked_trigger
                )),
            )
            .await?;

        self.schedule_cleanup(dispatcher, config, reply);
        Ok(())
    }

    async fn broadcast_warning(
        &self,
        dispatcher: &SharedDispatcher,
        message: &IncomingMessage,
        config: &Configuration,
    ) -> Result<()> {
        let reply = dispatcher
            .send(
                message.channel_id,
                Reply::text(format!(
                    "{} {}",
                    message.author_mention(),
                    config.responses.mass_mention_warning
                )),
            )
            .await?;

        self.app
            .actions
            .record(format!("Mass mention detected by {}", message.author_tag))
            .await;

        self.schedule_cleanup(dispatcher, config, reply);
        Ok(())
    }

    fn schedule_cleanup(
        &self,
        dispatcher: &SharedDispatcher,
        config: &Configuration,
        reply: MessageRef,
    ) {
        if config.self_cleanup_delay_secs == 0 {
            return;
        }
        self.app.cleanup.schedule(
            dispatcher.clone(),
            self.app.actions.clone(),
            reply,
            Duration::from_secs(config.self_cleanup_delay_secs),
        );
    }
}

fn source_ref(message: &IncomingMessage) -> MessageRef {
    MessageRef {
        channel_id: message.channel_id,
        message_id: message.id,
    }
}
