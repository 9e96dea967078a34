use crate::domain::{errors::ChatError, Embedding};
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embeds one text into exactly one vector of the service's fixed
    /// dimensionality. A response with no vectors is an error, not an
    /// empty embedding.
    async fn embed(&self, text: &str) -> Result<Embedding, ChatError>;

    fn dimension(&self) -> usize;
}
