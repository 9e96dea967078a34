use crate::domain::{errors::ChatError, Embedding, ProfessorRecord, SimilarityMatch};
use async_trait::async_trait;

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns up to `top_k` nearest records, ranked by similarity, with
    /// metadata included. An empty result is not an error.
    async fn query(
        &self,
        vector: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SimilarityMatch>, ChatError>;

    async fn upsert(
        &self,
        record: &ProfessorRecord,
        embedding: &Embedding,
    ) -> Result<(), ChatError>;

    /// Liveness probe for readiness checks. Defaults to healthy for
    /// backends with no remote dependency.
    async fn health_check(&self) -> Result<(), ChatError> {
        Ok(())
    }
}
