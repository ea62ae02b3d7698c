//! Shared application state

use std::sync::Arc;

use crate::config::RagConfig;
use crate::embeddings::OllamaEmbedder;
use crate::engine::RagEngine;
use crate::generation::OllamaGenerator;
use crate::store::PostgresFragmentStore;

/// Engine wired to the production providers
pub type ServiceEngine = RagEngine<OllamaEmbedder, PostgresFragmentStore, OllamaGenerator>;

/// Shared application state, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    engine: ServiceEngine,
}

impl AppState {
    pub fn new(config: RagConfig, engine: ServiceEngine) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, engine }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn engine(&self) -> &ServiceEngine {
        &self.inner.engine
    }
}
