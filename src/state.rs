// Shared state handed to every request handler

use std::sync::Arc;

use crate::services::AiServices;
use crate::storage::ClipStore;

#[derive(Clone)]
pub struct AppState {
    /// Engine handles, built once at startup
    pub services: Arc<AiServices>,
    /// Upload and speech-clip directory
    pub store: Arc<ClipStore>,
}

impl AppState {
    pub fn new(services: AiServices, store: ClipStore) -> Self {
        Self {
            services: Arc::new(services),
            store: Arc::new(store),
        }
    }
}
