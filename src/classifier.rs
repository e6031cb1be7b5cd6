//! # Feature: Message Classifier
//!
//! Pure decision function mapping a message and the current configuration to
//! the moderation decisions the engine acts on. Trigger phrases match as
//! plain substrings of the lower-cased text, so `gm` also matches `telegram`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with trigger and broadcast-mention checks

use crate::config_store::Configuration;
use crate::message::IncomingMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoAction,
    /// Standard author used a trigger phrase: delete and reply
    BlockTrigger { phrase: String },
    /// Privileged author used a trigger phrase: reply, keep the message
    PrivilegedTrigger { phrase: String },
    /// Exempt author used a trigger phrase: audit only
    ExemptUserTrigger { phrase: String },
    BroadcastMentionWarning,
}

/// Classify a message. Never empty: `[NoAction]` when nothing applies.
///
/// A trigger decision, when present, always comes before the broadcast
/// warning.
pub fn classify(message: &IncomingMessage, config: &Configuration) -> Vec<Decision> {
    let mut decisions = Vec::with_capacity(2);
    let privileged = config.is_privileged(message.author_id);

    let content = message.raw_text.to_lowercase();
    let matched = config
        .trigger_phrases
        .iter()
        .find(|phrase| !phrase.is_empty() && content.contains(phrase.as_str()));

    if let Some(phrase) = matched {
        let phrase = phrase.clone();
        decisions.push(if privileged {
            Decision::PrivilegedTrigger { phrase }
        } else if config.is_exempt(message.author_id) {
            Decision::ExemptUserTrigger { phrase }
        } else {
            Decision::BlockTrigger { phrase }
        });
    }

    if message.contains_broadcast_mention && !privileged {
        decisions.push(Decision::BroadcastMentionWarning);
    }

    if decisions.is_empty() {
        decisions.push(Decision::NoAction);
    }
    decisions
}

// ============================================================================
// Tests
// ============================================================================
