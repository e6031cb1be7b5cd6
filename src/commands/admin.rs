//! Privileged commands: addword, removeword, setstatus

use super::require_privileged;
use crate::context::AppContext;
use crate::dispatcher::{Dispatcher, Reply};
use crate::error::Result;
use crate::message::IncomingMessage;
use log::info;

pub async fn add_word(app: &AppContext, message: &IncomingMessage, word: &str) -> Result<Reply> {
    require_privileged(&app.config.load().await?, message, "addword")?;

    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return Ok(Reply::text("Trigger phrase cannot be empty!"));
    }

    let added = app
        .config
        .modify(|config| {
            if config.has_trigger(&word) {
                false
            } else {
                config.trigger_phrases.push(word.clone());
                true
            }
        })
        .await?;

    if !added {
        return Ok(Reply::text(format!("Word '{word}' already in trigger list!")));
    }

    info!("User {} added trigger phrase '{}'", message.author_id, word);
    app.actions
        .record(format!("{} added trigger phrase: {}", message.author_tag, word))
        .await;
    Ok(Reply::text(format!("Word '{word}' added to trigger list ✅")))
}

pub async fn remove_word(
    app: &AppContext,
    message: &IncomingMessage,
    word: &str,
) -> Result<Reply> {
    require_privileged(&app.config.load().await?, message, "removeword")?;

    let word = word.trim().to_lowercase();
    let removed = app
        .config
        .modify(|config| {
            let before = config.trigger_phrases.len();
            config.trigger_phrases.retain(|p| p != &word);
            config.trigger_phrases.len() != before
        })
        .await?;

    if !removed {
        return Ok(Reply::text(format!("Word '{word}' not found in trigger list!")));
    }

    info!("User {} removed trigger phrase '{}'", message.author_id, word);
    app.actions
        .record(format!("{} removed trigger phrase: {}", message.author_tag, word))
        .await;
    Ok(Reply::text(format!("Word '{word}' removed from trigger list ✅")))
}

/// Presence is platform state only; the stored configuration is untouched
pub async fn set_status(
    app: &AppContext,
    dispatcher: &dyn Dispatcher,
    message: &IncomingMessage,
    status: &str,
) -> Result<Reply> {
    require_privileged(&app.config.load().await?, message, "setstatus")?;

    dispatcher.set_presence(status).await;
    info!("User {} changed status to '{}'", message.author_id, status);
    Ok(Reply::text(format!("Status changed to: {status} ✅")))
}
