//! Application context shared by every event handler.

use crate::action_log::ActionLogger;
use crate::cleanup::CleanupScheduler;
use crate::config::Settings;
use crate::config_store::ConfigStore;

/// Built once at startup and handed to handlers behind an `Arc`
pub struct AppContext {
    pub config: ConfigStore,
    pub actions: ActionLogger,
    pub cleanup: CleanupScheduler,
    pub command_prefix: String,
}

impl AppContext {
    pub fn new(
        config: ConfigStore,
        actions: ActionLogger,
        command_prefix: impl Into<String>,
    ) -> Self {
        AppContext {
            config,
            actions,
            cleanup: CleanupScheduler::new(),
            command_prefix: command_prefix.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            ConfigStore::new(settings.config_path.clone()),
            ActionLogger::new(settings.action_log_path.clone()),
            settings.command_prefix.clone(),
        )
    }

    /// Abort outstanding timers before the process exits
    pub fn shutdown(&self) {
        self.cleanup.cancel_all();
    }
}
