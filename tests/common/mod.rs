//! Shared fixtures for the integration tests: an in-memory dispatcher that
//! records every platform call, and a harness wiring it to a temp-dir store.

#![allow(dead_code)]

use dushman::dispatcher::EmbedReply;
use dushman::{
    ActionLogger, AppContext, CommandHandler, ConfigStore, Configuration, Dispatcher,
    IncomingMessage, MessageRef, ModerationEngine, PlatformStats, Reply, ResponseTemplates,
    SharedDispatcher, TransportError,
};
use serenity::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const BOSS: u64 = 10;
pub const EXEMPT: u64 = 20;
pub const USER: u64 = 30;
pub const CHANNEL: u64 = 500;

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel_id: u64,
    pub reply: Reply,
    pub message: MessageRef,
}

impl SentMessage {
    pub fn text(&self) -> &str {
        match &self.reply {
            Reply::Text(text) => text,
            Reply::Embed(_) => panic!("expected a text reply, got an embed"),
        }
    }

    pub fn embed(&self) -> &EmbedReply {
        match &self.reply {
            Reply::Embed(embed) => embed,
            Reply::Text(text) => panic!("expected an embed, got text: {text}"),
        }
    }
}

pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<SentMessage>>,
    /// Every delete attempt, successful or not
    pub delete_attempts: Mutex<Vec<MessageRef>>,
    pub reactions: Mutex<Vec<(MessageRef, char)>>,
    pub presence: Mutex<Option<String>>,
    pub delete_error: Mutex<Option<TransportError>>,
    pub send_error: Mutex<Option<TransportError>>,
    pub stats: PlatformStats,
    next_id: AtomicU64,
}

impl Default for RecordingDispatcher {
    fn default() -> Self {
        RecordingDispatcher {
            sent: Mutex::new(Vec::new()),
            delete_attempts: Mutex::new(Vec::new()),
            reactions: Mutex::new(Vec::new()),
            presence: Mutex::new(None),
            delete_error: Mutex::new(None),
            send_error: Mutex::new(None),
            stats: PlatformStats {
                guild_count: 3,
                user_count: 42,
                latency: Some(Duration::from_millis(87)),
            },
            next_id: AtomicU64::new(9000),
        }
    }
}

impl RecordingDispatcher {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().iter().map(|m| m.text().to_string()).collect()
    }

    pub fn delete_attempts(&self) -> Vec<MessageRef> {
        self.delete_attempts.lock().unwrap().clone()
    }

    pub fn reactions(&self) -> Vec<(MessageRef, char)> {
        self.reactions.lock().unwrap().clone()
    }

    pub fn presence(&self) -> Option<String> {
        self.presence.lock().unwrap().clone()
    }

    pub fn fail_deletes(&self, error: TransportError) {
        *self.delete_error.lock().unwrap() = Some(error);
    }

    pub fn fail_sends(&self, error: TransportError) {
        *self.send_error.lock().unwrap() = Some(error);
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn send(&self, channel_id: u64, reply: Reply) -> Result<MessageRef, TransportError> {
        if let Some(error) = self.send_error.lock().unwrap().clone() {
            return Err(error);
        }
        let message = MessageRef {
            channel_id,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        self.sent.lock().unwrap().push(SentMessage {
            channel_id,
            reply,
            message,
        });
        Ok(message)
    }

    async fn delete(&self, target: MessageRef) -> Result<(), TransportError> {
        self.delete_attempts.lock().unwrap().push(target);
        match self.delete_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn react(&self, target: MessageRef, emoji: char) -> Result<(), TransportError> {
        self.reactions.lock().unwrap().push((target, emoji));
        Ok(())
    }

    async fn set_presence(&self, text: &str) {
        *self.presence.lock().unwrap() = Some(text.to_string());
    }

    async fn platform_stats(&self) -> PlatformStats {
        self.stats.clone()
    }
}

pub fn test_config() -> Configuration {
    Configuration {
        trigger_phrases: vec!["gm".to_string()],
        privileged_users: [BOSS].into_iter().collect(),
        exempt_users: [EXEMPT].into_iter().collect(),
        responses: ResponseTemplates {
            blocked_trigger: "no morning wishes here".to_string(),
            privileged_notice: "as you wish, boss".to_string(),
            mass_mention_warning: "do not ping everyone".to_string(),
        },
        auto_react: true,
        self_cleanup_delay_secs: 10,
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub app: Arc<AppContext>,
    pub engine: ModerationEngine,
    pub commands: CommandHandler,
    pub dispatcher: Arc<RecordingDispatcher>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Configuration) -> Self {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        store.save(&config).await.unwrap();

        let app = Arc::new(AppContext::new(
            store,
            ActionLogger::new(dir.path().join("actions.txt")),
            "!",
        ));

        Harness {
            engine: ModerationEngine::new(app.clone()),
            commands: CommandHandler::new(app.clone()),
            app,
            dispatcher: Arc::new(RecordingDispatcher::default()),
            dir,
        }
    }

    pub fn shared(&self) -> SharedDispatcher {
        self.dispatcher.clone()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("actions.txt"))
            .map(|raw| raw.lines().map(|l| l.to_string()).collect())
            .unwrap_or_default()
    }

    pub async fn config(&self) -> Configuration {
        self.app.config.load().await.unwrap()
    }
}

pub fn message(id: u64, author_id: u64, text: &str) -> IncomingMessage {
    IncomingMessage::new(id, author_id, format!("user{author_id}"), CHANNEL, text)
}
