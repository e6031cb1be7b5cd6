// Core layer - settings, errors and shared types
pub mod config;
pub mod error;
pub mod message;

// Storage
pub mod action_log;
pub mod config_store;

// Moderation
pub mod classifier;
pub mod cleanup;
pub mod moderation;

// Application layer
pub mod commands;
pub mod context;

// Platform boundary
pub mod discord;
pub mod dispatcher;

pub use action_log::ActionLogger;
pub use classifier::{classify, Decision};
pub use commands::{Command, CommandHandler};
pub use config::Settings;
pub use config_store::{ConfigStore, Configuration, ResponseTemplates};
pub use context::AppContext;
pub use dispatcher::{Dispatcher, MessageRef, PlatformStats, Reply, SharedDispatcher};
pub use error::{RelayError, TransportError};
pub use message::IncomingMessage;
pub use moderation::ModerationEngine;
