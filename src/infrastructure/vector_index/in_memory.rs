use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{
    ports::VectorIndex, ChatError, Embedding, ProfessorRecord, SimilarityMatch,
};

/// Cosine-similarity index over an in-process vector. Used in tests and as
/// the local backend when no Qdrant URL is configured.
pub struct InMemoryVectorIndex {
    records: RwLock<Vec<(ProfessorRecord, Embedding)>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn query(
        &self,
        vector: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SimilarityMatch>, ChatError> {
        let store = self
            .records
            .read()
            .map_err(|e| ChatError::retrieval(e.to_string()))?;

        let mut scored: Vec<SimilarityMatch> = store
            .iter()
            .map(|(record, embedding)| {
                SimilarityMatch::new(&record.id, vector.cosine_similarity(embedding))
                    .with_metadata(record.metadata.clone())
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn upsert(
        &self,
        record: &ProfessorRecord,
        embedding: &Embedding,
    ) -> Result<(), ChatError> {
        let mut store = self
            .records
            .write()
            .map_err(|e| ChatError::retrieval(e.to_string()))?;

        store.retain(|(r, _)| r.id != record.id);
        store.push((record.clone(), embedding.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, subject: &str) -> ProfessorRecord {
        ProfessorRecord::new(id, format!("{id} review text")).with_field("subject", subject)
    }

    #[tokio::test]
    async fn query_ranks_by_similarity() {
        let index = InMemoryVectorIndex::new();

        index
            .upsert(&record("Dr. Smith", "CS"), &Embedding::new(vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();
        index
            .upsert(&record("Dr. Jones", "Math"), &Embedding::new(vec![0.0, 1.0, 0.0]))
            .await
            .unwrap();

        let results = index
            .query(&Embedding::new(vec![0.9, 0.1, 0.0]), 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "Dr. Smith");
        assert_eq!(results[0].metadata["subject"], "CS");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn top_k_limits_result_count() {
        let index = InMemoryVectorIndex::new();
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            index
                .upsert(
                    &record(name, "CS"),
                    &Embedding::new(vec![1.0, i as f32, 0.0]),
                )
                .await
                .unwrap();
        }

        let results = index
            .query(&Embedding::new(vec![1.0, 0.0, 0.0]), 3)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_record() {
        let index = InMemoryVectorIndex::new();
        let vector = Embedding::new(vec![1.0, 0.0, 0.0]);

        index.upsert(&record("Dr. Smith", "CS"), &vector).await.unwrap();
        index
            .upsert(&record("Dr. Smith", "Databases"), &vector)
            .await
            .unwrap();

        let results = index.query(&vector, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].metadata["subject"], "Databases");
    }

    #[tokio::test]
    async fn empty_index_returns_no_matches() {
        let index = InMemoryVectorIndex::new();
        let results = index
            .query(&Embedding::new(vec![1.0, 0.0, 0.0]), 3)
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
