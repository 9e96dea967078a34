use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorIndex},
    ChatError, ProfessorRecord, SimilarityMatch,
};

/// Embeds a query and fetches its nearest professor records from the index.
///
/// Stateless apart from the shared client handles; both outbound calls are
/// bounded by the configured timeouts.
pub struct RetrievalService {
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    default_top_k: usize,
    embed_timeout: Duration,
    query_timeout: Duration,
}

impl RetrievalService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            index,
            default_top_k,
            embed_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeouts(mut self, embed: Duration, query: Duration) -> Self {
        self.embed_timeout = embed;
        self.query_timeout = query;
        self
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SimilarityMatch>, ChatError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    #[instrument(skip(self, query), fields(top_k))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SimilarityMatch>, ChatError> {
        if query.trim().is_empty() {
            return Err(ChatError::invalid_history("query text is empty"));
        }

        let vector = tokio::time::timeout(self.embed_timeout, self.embedding.embed(query))
            .await
            .map_err(|_| ChatError::timeout("embedding"))??;

        tokio::time::timeout(self.query_timeout, self.index.query(&vector, top_k))
            .await
            .map_err(|_| ChatError::timeout("retrieval"))?
    }

    /// Embeds a record's review text and upserts it into the index.
    #[instrument(skip(self, record), fields(record_id = %record.id))]
    pub async fn index_record(&self, record: &ProfessorRecord) -> Result<(), ChatError> {
        let vector = tokio::time::timeout(self.embed_timeout, self.embedding.embed(&record.review))
            .await
            .map_err(|_| ChatError::timeout("embedding"))??;

        tokio::time::timeout(self.query_timeout, self.index.upsert(record, &vector))
            .await
            .map_err(|_| ChatError::timeout("retrieval"))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ports::VectorIndex, Embedding};
    use async_trait::async_trait;

    struct FixedEmbedding;

    #[async_trait]
    impl EmbeddingService for FixedEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, ChatError> {
            Ok(Embedding::new(vec![1.0, 0.0, 0.0]))
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    struct FixedIndex;

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn query(
            &self,
            _vector: &Embedding,
            top_k: usize,
        ) -> Result<Vec<SimilarityMatch>, ChatError> {
            Ok(vec![SimilarityMatch::new("Dr. Smith", 0.9); top_k.min(1)])
        }

        async fn upsert(
            &self,
            _record: &ProfessorRecord,
            _embedding: &Embedding,
        ) -> Result<(), ChatError> {
            Ok(())
        }
    }

    struct SlowEmbedding;

    #[async_trait]
    impl EmbeddingService for SlowEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, ChatError> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok(Embedding::new(vec![1.0, 0.0, 0.0]))
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    struct SlowIndex;

    #[async_trait]
    impl VectorIndex for SlowIndex {
        async fn query(
            &self,
            _vector: &Embedding,
            _top_k: usize,
        ) -> Result<Vec<SimilarityMatch>, ChatError> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok(Vec::new())
        }

        async fn upsert(
            &self,
            _record: &ProfessorRecord,
            _embedding: &Embedding,
        ) -> Result<(), ChatError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn empty_query_fails_without_external_calls() {
        let service = RetrievalService::new(Arc::new(FixedEmbedding), Arc::new(FixedIndex), 3);
        let err = service.retrieve("   ").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidHistory(_)));
    }

    #[tokio::test]
    async fn retrieve_returns_ranked_matches() {
        let service = RetrievalService::new(Arc::new(FixedEmbedding), Arc::new(FixedIndex), 3);
        let matches = service.retrieve("who teaches algorithms?").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "Dr. Smith");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_embedding_surfaces_embedding_timeout() {
        let service = RetrievalService::new(Arc::new(SlowEmbedding), Arc::new(FixedIndex), 3)
            .with_timeouts(Duration::from_secs(1), Duration::from_secs(1));

        let err = service.retrieve("who teaches compilers?").await.unwrap_err();
        assert!(matches!(err, ChatError::Timeout { stage: "embedding" }));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_index_surfaces_retrieval_timeout() {
        let service = RetrievalService::new(Arc::new(FixedEmbedding), Arc::new(SlowIndex), 3)
            .with_timeouts(Duration::from_secs(1), Duration::from_secs(1));

        let err = service.retrieve("who teaches compilers?").await.unwrap_err();
        assert!(matches!(err, ChatError::Timeout { stage: "retrieval" }));
    }
}
