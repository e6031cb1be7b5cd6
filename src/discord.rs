//! Serenity-backed [`Dispatcher`].

use crate::dispatcher::{Dispatcher, MessageRef, PlatformStats, Reply};
use crate::error::TransportError;
use crate::message::IncomingMessage;
use serenity::async_trait;
use serenity::client::bridge::gateway::{ShardId, ShardManager};
use serenity::http::HttpError;
use serenity::model::channel::{Message, ReactionType};
use serenity::model::gateway::Activity;
use serenity::model::id::{ChannelId, MessageId};
use serenity::model::ModelError;
use serenity::prelude::{Context, Mutex, TypeMapKey};
use std::sync::Arc;
use std::time::Duration;

/// Client data key giving handlers access to shard latency
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<Mutex<ShardManager>>;
}

impl From<&Message> for IncomingMessage {
    fn from(msg: &Message) -> Self {
        IncomingMessage::new(
            msg.id.0,
            msg.author.id.0,
            msg.author.tag(),
            msg.channel_id.0,
            msg.content.clone(),
        )
    }
}

/// Dispatcher for one event's serenity `Context`
pub struct SerenityDispatcher {
    ctx: Context,
}

impl SerenityDispatcher {
    pub fn new(ctx: Context) -> Self {
        SerenityDispatcher { ctx }
    }

    async fn shard_latency(&self) -> Option<Duration> {
        let shard_manager = {
            let data = self.ctx.data.read().await;
            data.get::<ShardManagerContainer>()?.clone()
        };

        let manager = shard_manager.lock().await;
        let runners = manager.runners.lock().await;
        runners
            .get(&ShardId(self.ctx.shard_id))
            .and_then(|runner| runner.latency)
    }
}

/// Map serenity failures onto the transport taxonomy (403 → permission denied)
pub fn map_error(err: serenity::Error) -> TransportError {
    match &err {
        serenity::Error::Http(http_err) => {
            if let HttpError::UnsuccessfulRequest(response) = &**http_err {
                if response.status_code.as_u16() == 403 {
                    return TransportError::PermissionDenied(response.error.message.clone());
                }
            }
        }
        serenity::Error::Model(ModelError::InvalidPermissions(missing)) => {
            return TransportError::PermissionDenied(format!("missing permissions: {missing:?}"));
        }
        _ => {}
    }
    TransportError::Other(err.to_string())
}

#[async_trait]
impl Dispatcher for SerenityDispatcher {
    async fn send(&self, channel_id: u64, reply: Reply) -> Result<MessageRef, TransportError> {
        let channel = ChannelId(channel_id);
        let sent = match reply {
            Reply::Text(content) => channel.say(&self.ctx.http, content).await,
            Reply::Embed(embed) => {
                channel
                    .send_message(&self.ctx.http, |m| {
                        m.embed(|e| {
                            e.title(&embed.title).color(embed.color);
                            for field in &embed.fields {
                                e.field(&field.name, &field.value, field.inline);
                            }
                            e
                        })
                    })
                    .await
            }
        }
        .map_err(map_error)?;

        Ok(MessageRef {
            channel_id,
            message_id: sent.id.0,
        })
    }

    async fn delete(&self, target: MessageRef) -> Result<(), TransportError> {
        ChannelId(target.channel_id)
            .delete_message(&self.ctx.http, MessageId(target.message_id))
            .await
            .map_err(map_error)
    }

    async fn react(&self, target: MessageRef, emoji: char) -> Result<(), TransportError> {
        ChannelId(target.channel_id)
            .create_reaction(
                &self.ctx.http,
                MessageId(target.message_id),
                ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(map_error)
    }

    async fn set_presence(&self, text: &str) {
        self.ctx.set_activity(Activity::watching(text)).await;
    }

    async fn platform_stats(&self) -> PlatformStats {
        PlatformStats {
            guild_count: self.ctx.cache.guild_count(),
            user_count: self.ctx.cache.user_count(),
            latency: self.shard_latency().await,
        }
    }
}
