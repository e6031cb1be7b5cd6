//! Boundary to the chat platform client.
//!
//! The moderation core only talks to the platform through [`Dispatcher`];
//! connection handling, authentication and rate limiting stay on the other
//! side of it.

use crate::error::TransportError;
use serenity::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReply {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl EmbedReply {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        EmbedReply {
            title: title.into(),
            color,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Embed(EmbedReply),
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply::Text(content.into())
    }
}

/// Counters the platform client knows about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformStats {
    pub guild_count: usize,
    pub user_count: usize,
    /// Gateway heartbeat latency; `None` until the first heartbeat ack
    pub latency: Option<Duration>,
}

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, channel_id: u64, reply: Reply) -> Result<MessageRef, TransportError>;

    async fn delete(&self, target: MessageRef) -> Result<(), TransportError>;

    async fn react(&self, target: MessageRef, emoji: char) -> Result<(), TransportError>;

    /// Replace the bot's visible status text
    async fn set_presence(&self, text: &str);

    async fn platform_stats(&self) -> PlatformStats;
}

pub type SharedDispatcher = Arc<dyn Dispatcher>;
