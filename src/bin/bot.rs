//! Discord gateway entry point for the moderation relay
//!
//! Settings come from environment variables (a `.env` file is honoured).
//! Moderation rules come from the JSON file at `CONFIG_PATH`.

use anyhow::Result;
use dotenvy::dotenv;
use dushman::discord::{SerenityDispatcher, ShardManagerContainer};
use dushman::{
    AppContext, CommandHandler, Dispatcher, IncomingMessage, ModerationEngine, Reply,
    Settings, SharedDispatcher,
};
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::{Activity, Ready};
use serenity::model::id::{ChannelId, GuildId, MessageId};
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const MAX_RETRIES: u32 = 5;

/// Handler for the bot's Discord events
struct Handler {
    app: Arc<AppContext>,
    engine: ModerationEngine,
    commands: CommandHandler,
    default_status: String,
    /// Set after the first Ready so reconnects are not recorded again
    announced: AtomicBool,
}

impl Handler {
    fn new(app: Arc<AppContext>, default_status: String) -> Self {
        Handler {
            engine: ModerationEngine::new(app.clone()),
            commands: CommandHandler::new(app.clone()),
            app,
            default_status,
            announced: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let incoming = IncomingMessage::from(&msg);
        // Other bots are moderated like anyone else
        if incoming.is_own(ctx.cache.current_user_id().0) {
            return;
        }

        let dispatcher: SharedDispatcher = Arc::new(SerenityDispatcher::new(ctx));

        if let Err(e) = self.engine.handle(dispatcher.clone(), &incoming).await {
            error!(
                "Moderation failed for message {} in channel {}: {e}",
                incoming.id, incoming.channel_id
            );
        }

        // Commands run whatever moderation did with the message
        if let Err(e) = self.commands.handle(&dispatcher, &incoming).await {
            error!("Command error: {e}");
            if let Err(why) = dispatcher
                .send(incoming.channel_id, Reply::text("Something went wrong! 😔"))
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        _channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        self.app.cleanup.cancel(deleted_message_id.0);
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        info!("Connected to {} guilds", ready.guilds.len());

        if let Some(shard) = ready.shard {
            info!("Shard: {}/{}", shard[0] + 1, shard[1]);
        }

        ctx.set_activity(Activity::watching(&self.default_status)).await;

        if self.announced.swap(true, Ordering::SeqCst) {
            info!("Skipping startup record (reconnect)");
        } else {
            self.app.actions.record("Bot started and ready.").await;
        }
    }
}

/// Run the bot with retry logic
async fn run_bot(settings: &Settings, app: Arc<AppContext>) -> Result<()> {
    let mut retry_count = 0;

    loop {
        info!("Starting bot (attempt {}/{})", retry_count + 1, MAX_RETRIES);

        match run_bot_inner(settings, app.clone()).await {
            Ok(()) => {
                info!("Bot exited normally");
                return Ok(());
            }
            Err(e) => {
                retry_count += 1;
                if retry_count >= MAX_RETRIES {
                    error!("Bot failed after {} retries: {}", MAX_RETRIES, e);
                    return Err(e);
                }

                let delay = Duration::from_secs(5 * retry_count as u64);
                warn!("Bot failed: {}. Retrying in {:?}...", e, delay);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Single connection attempt
async fn run_bot_inner(settings: &Settings, app: Arc<AppContext>) -> Result<()> {
    let handler = Handler::new(app, settings.default_status.clone());

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&settings.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    let shard_manager = client.shard_manager.clone();
    let shutdown_handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating graceful shutdown...");
                shard_manager.lock().await.shutdown_all().await;
            }
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    info!("Connecting to Discord gateway...");

    // Blocks until disconnect or shutdown
    let result = client.start().await;
    shutdown_handle.abort();

    result.map_err(|e| {
        error!("Gateway connection failed: {e}");
        anyhow::anyhow!("Gateway connection failed: {}", e)
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {e}");
            eprintln!("Please set your bot token as an environment variable.");
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&settings.log_level),
    )
    .init();

    info!("Starting moderation relay...");
    info!("Configuration file: {}", settings.config_path.display());
    info!("Action log: {}", settings.action_log_path.display());

    let app = Arc::new(AppContext::from_settings(&settings));

    // Writes the default document on first run
    match app.config.load().await {
        Ok(config) => info!(
            "Loaded {} trigger phrase(s), {} privileged user(s)",
            config.trigger_phrases.len(),
            config.privileged_users.len()
        ),
        Err(e) => warn!("Configuration not usable yet: {e}"),
    }

    let result = run_bot(&settings, app.clone()).await;
    app.shutdown();

    match &result {
        Ok(()) => info!("Bot shut down successfully"),
        Err(e) => error!("Bot failed: {}", e),
    }
    result
}
