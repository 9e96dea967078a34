use std::sync::Arc;

use crate::application::{ChatService, RetrievalService};
use crate::domain::ports::VectorIndex;
use crate::infrastructure::AppConfig;

/// Process-lifetime handles shared by all requests. Every field is
/// immutable after startup and safe for concurrent use; nothing here needs
/// teardown beyond process exit.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub retrieval_service: Arc<RetrievalService>,
    pub index: Arc<dyn VectorIndex>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        chat_service: Arc<ChatService>,
        retrieval_service: Arc<RetrievalService>,
        index: Arc<dyn VectorIndex>,
        config: AppConfig,
    ) -> Self {
        Self {
            chat_service,
            retrieval_service,
            index,
            config: Arc::new(config),
        }
    }
}
