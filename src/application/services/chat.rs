use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::Stream;
use tracing::{info, instrument};

use crate::application::services::prompt::{compose_prompt, format_matches};
use crate::application::services::relay::relay;
use crate::application::services::retrieval::RetrievalService;
use crate::domain::{ports::ChatModel, ChatError, ChatMessage};

/// Byte stream delivered to the transport layer. An `Err` item is terminal
/// and closes the response abnormally.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChatError>> + Send>>;

/// Orchestrates one request: retrieve context for the latest message, build
/// the augmented prompt, start generation, and hand back the relayed stream.
///
/// Holds no per-request state. Any failure before the model produces its
/// first fragment is returned as an error and no stream is opened; retrieval
/// failure is fatal to the request rather than degrading to an empty
/// context.
pub struct ChatService {
    retrieval: Arc<RetrievalService>,
    model: Arc<dyn ChatModel>,
    generation_timeout: Duration,
}

impl ChatService {
    pub fn new(retrieval: Arc<RetrievalService>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            retrieval,
            model,
            generation_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    #[instrument(skip(self, history), fields(turns = history.len()))]
    pub async fn respond(&self, history: &[ChatMessage]) -> Result<ByteStream, ChatError> {
        let last = history
            .last()
            .ok_or_else(|| ChatError::invalid_history("conversation history is empty"))?;
        if last.content.trim().is_empty() {
            return Err(ChatError::invalid_history("latest message has no content"));
        }

        let matches = self.retrieval.retrieve(&last.content).await?;
        info!(matches = matches.len(), "Retrieved context records");

        let context = format_matches(&matches);
        let messages = compose_prompt(history, &context)?;

        let upstream = tokio::time::timeout(
            self.generation_timeout,
            self.model.stream_chat(&messages),
        )
        .await
        .map_err(|_| ChatError::timeout("generation"))??;

        Ok(Box::pin(relay(upstream)))
    }
}
