//! Shared gateway state

use gamma_core::config::Config;
use gamma_providers::CompletionProvider;
use std::sync::Arc;

use crate::history::HistoryStore;
use crate::quota::QuotaTracker;

#[derive(Clone)]
pub struct AppState {
    pub allowed_origins: Arc<Vec<String>>,
    pub history: Arc<HistoryStore>,
    pub quota: Arc<QuotaTracker>,
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    /// Wire up the gateway state from configuration and a provider
    pub fn new(config: &Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            allowed_origins: Arc::new(config.gateway.allowed_origins.clone()),
            history: Arc::new(HistoryStore::new(
                config.gateway.system_prompt.clone(),
                config.limits.max_history,
            )),
            quota: Arc::new(QuotaTracker::new(
                config.limits.question_limit,
                config.limits.window_secs,
            )),
            provider,
        }
    }
}
