//! Open commands: listwords, stats, showlog, help

use crate::action_log::{truncate_recent, MAX_LOG_REPLY_CHARS};
use crate::context::AppContext;
use crate::dispatcher::{Dispatcher, EmbedReply, Reply};
use crate::error::Result;

pub const SHOWLOG_LINES: usize = 15;

const STATS_COLOR: u32 = 0x00ff00;
const HELP_COLOR: u32 = 0xff0000;

pub async fn list_words(app: &AppContext) -> Result<Reply> {
    let config = app.config.load().await?;
    let words = if config.trigger_phrases.is_empty() {
        "(none)".to_string()
    } else {
        config.trigger_phrases.join(", ")
    };
    Ok(Reply::text(format!("**Trigger phrases:** {words}")))
}

pub async fn stats(app: &AppContext, dispatcher: &dyn Dispatcher) -> Result<Reply> {
    let config = app.config.load().await?;
    let platform = dispatcher.platform_stats().await;

    let ping = platform
        .latency
        .map(|latency| format!("{}ms", latency.as_millis()))
        .unwrap_or_else(|| "n/a".to_string());

    Ok(Reply::Embed(
        EmbedReply::new("🤖 Bot Statistics", STATS_COLOR)
            .field("Servers", platform.guild_count.to_string(), true)
            .field("Users", platform.user_count.to_string(), true)
            .field("Trigger Phrases", config.trigger_phrases.len().to_string(), true)
            .field("Privileged Users", config.privileged_users.len().to_string(), true)
            .field("Exempt Users", config.exempt_users.len().to_string(), true)
            .field("Ping", ping, true),
    ))
}

pub async fn show_log(app: &AppContext) -> Reply {
    let lines = app.actions.tail(SHOWLOG_LINES).await;
    if lines.is_empty() {
        return Reply::text("The action log is empty.");
    }

    let content = lines.join("\n");
    let content = truncate_recent(&content, MAX_LOG_REPLY_CHARS);
    Reply::text(format!("```\n{content}\n```"))
}

pub fn help(prefix: &str) -> Reply {
    Reply::Embed(
        EmbedReply::new("🤖 Dushman Bot Commands", HELP_COLOR)
            .field(format!("{prefix}showlog"), "Show recent moderation log", false)
            .field(format!("{prefix}stats"), "Show bot statistics", false)
            .field(format!("{prefix}listwords"), "List all trigger phrases", false)
            .field("**Privileged Commands:**", "\u{200b}", false)
            .field(format!("{prefix}addword <word>"), "Add a trigger phrase", false)
            .field(format!("{prefix}removeword <word>"), "Remove a trigger phrase", false)
            .field(format!("{prefix}setstatus <status>"), "Change bot status", false),
    )
}
