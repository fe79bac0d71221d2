use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::wizard::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Remote text generator. `DisabledGenerator` when no API key is configured,
    /// which makes every strategy a fallback strategy.
    pub generator: Arc<dyn TextGenerator>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));
        Self {
            config,
            generator,
            sessions,
        }
    }
}
