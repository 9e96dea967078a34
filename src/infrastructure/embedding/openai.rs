use async_openai::{
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequestArgs, EncodingFormat},
    Client,
};
use async_trait::async_trait;

use crate::domain::{ports::EmbeddingService, ChatError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// Embedding adapter for an OpenAI-compatible `/embeddings` endpoint.
/// The client handle is process-wide and safe for concurrent use.
pub struct OpenAiEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedding {
    pub fn new(client: Client<OpenAIConfig>, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, ChatError> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(text.to_string())
            .encoding_format(EncodingFormat::Float)
            .build()
            .map_err(|e| ChatError::embedding(e.to_string()))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| ChatError::embedding(e.to_string()))?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| Embedding::new(d.embedding))
            .ok_or_else(|| ChatError::embedding("service returned no vectors"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
