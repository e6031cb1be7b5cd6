//! # Feature: Prefix Commands
//!
//! Administrative command surface: `showlog`, `addword`, `removeword`,
//! `listwords`, `setstatus`, `stats` and `help`. Names are case sensitive and
//! take the rest of the line as their argument. Mutating commands are limited
//! to privileged users.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Usage replies for missing arguments
//! - 1.0.0: Initial command set

pub mod admin;
pub mod utility;

use crate::config_store::Configuration;
use crate::context::AppContext;
use crate::dispatcher::{Dispatcher, Reply, SharedDispatcher};
use crate::error::{RelayError, Result};
use crate::message::IncomingMessage;
use log::{debug, info};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowLog,
    AddWord(String),
    RemoveWord(String),
    ListWords,
    SetStatus(String),
    Stats,
    Help,
    /// Known command invoked without its required argument
    MissingArgument { name: &'static str, usage: &'static str },
    Unknown(String),
}

impl Command {
    /// Parse `text` as a command; `None` when it does not start with `prefix`
    pub fn parse(prefix: &str, text: &str) -> Option<Command> {
        let rest = text.strip_prefix(prefix)?;
        let (name, args) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], rest[idx..].trim()),
            None => (rest, ""),
        };

        if name.is_empty() {
            return None;
        }

        let with_arg = |name: &'static str, usage: &'static str, build: fn(String) -> Command| {
            if args.is_empty() {
                Command::MissingArgument { name, usage }
            } else {
                build(args.to_string())
            }
        };

        Some(match name {
            "showlog" => Command::ShowLog,
            "addword" => with_arg("addword", "addword <word>", Command::AddWord),
            "removeword" => with_arg("removeword", "removeword <word>", Command::RemoveWord),
            "listwords" => Command::ListWords,
            "setstatus" => with_arg("setstatus", "setstatus <status>", Command::SetStatus),
            "stats" => Command::Stats,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Command::ShowLog => "showlog",
            Command::AddWord(_) => "addword",
            Command::RemoveWord(_) => "removeword",
            Command::ListWords => "listwords",
            Command::SetStatus(_) => "setstatus",
            Command::Stats => "stats",
            Command::Help => "help",
            Command::MissingArgument { name, .. } => *name,
            Command::Unknown(name) => name.as_str(),
        }
    }
}

/// Fail with `UnauthorizedCommand` unless the author is privileged
pub(crate) fn require_privileged(
    config: &Configuration,
    message: &IncomingMessage,
    command: &str,
) -> Result<()> {
    if config.is_privileged(message.author_id) {
        Ok(())
    } else {
        Err(RelayError::UnauthorizedCommand {
            user_id: message.author_id,
            command: command.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct CommandHandler {
    app: Arc<AppContext>,
}

impl CommandHandler {
    pub fn new(app: Arc<AppContext>) -> Self {
        CommandHandler { app }
    }

    /// Run the command in `message`, if any, and send its reply.
    ///
    /// Returns the parsed command, or `None` for ordinary chat.
    pub async fn handle(
        &self,
        dispatcher: &SharedDispatcher,
        message: &IncomingMessage,
    ) -> Result<Option<Command>> {
        let command = match Command::parse(&self.app.command_prefix, &message.raw_text) {
            Some(command) => command,
            None => return Ok(None),
        };
        debug!("User {} invoked `{}`", message.author_id, command.name());

        let reply = match self.execute(dispatcher, message, &command).await {
            Ok(reply) => reply,
            Err(RelayError::UnauthorizedCommand { user_id, command: name }) => {
                info!("Denied `{name}` for user {user_id}");
                Reply::text(format!(
                    "Only privileged users can use `{}{}`!",
                    self.app.command_prefix, name
                ))
            }
            Err(e) => return Err(e),
        };

        dispatcher.send(message.channel_id, reply).await?;
        Ok(Some(command))
    }

    async fn execute(
        &self,
        dispatcher: &SharedDispatcher,
        message: &IncomingMessage,
        command: &Command,
    ) -> Result<Reply> {
        let app: &AppContext = &self.app;
        match command {
            Command::AddWord(word) => admin::add_word(app, message, word).await,
            Command::RemoveWord(word) => admin::remove_word(app, message, word).await,
            Command::SetStatus(status) => {
                admin::set_status(app, &**dispatcher, message, status).await
            }
            Command::ListWords => utility::list_words(app).await,
            Command::Stats => utility::stats(app, &**dispatcher).await,
            Command::ShowLog => Ok(utility::show_log(app).await),
            Command::Help => Ok(utility::help(&app.command_prefix)),
            Command::MissingArgument { usage, .. } => Ok(Reply::text(format!(
                "Usage: `{}{}`",
                app.command_prefix, usage
            ))),
            Command::Unknown(_) => Ok(Reply::text(format!(
                "Command not found! Use `{}help` for available commands.",
                app.command_prefix
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
