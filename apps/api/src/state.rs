use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions and their assessment libraries.
    pub sessions: SessionStore,
    pub llm: LlmClient,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, llm: LlmClient) -> Self {
        Self {
            sessions: SessionStore::new(),
            llm,
            config,
        }
    }
}
