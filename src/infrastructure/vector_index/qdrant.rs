use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::Map;
use uuid::Uuid;

use crate::domain::{
    ports::VectorIndex, ChatError, Embedding, ProfessorRecord, SimilarityMatch,
};

/// Professor records live in a single Qdrant collection; the record name is
/// kept in the payload because Qdrant point ids must be numeric or UUIDs.
pub struct QdrantVectorIndex {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantVectorIndex {
    pub async fn new(url: &str, collection: &str, dimension: usize) -> Result<Self, ChatError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| ChatError::retrieval(e.to_string()))?;

        let index = Self {
            client,
            collection: collection.to_string(),
            dimension,
        };

        index.ensure_collection().await?;

        Ok(index)
    }

    async fn ensure_collection(&self) -> Result<(), ChatError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| ChatError::retrieval(e.to_string()))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| ChatError::retrieval(e.to_string()))?;
        }

        Ok(())
    }

    fn point_id_for(name: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }
}

fn payload_value_to_json(value: &qdrant_client::qdrant::Value) -> Option<serde_json::Value> {
    if let Some(s) = value.as_str() {
        Some(serde_json::Value::String(s.to_string()))
    } else if let Some(i) = value.as_integer() {
        Some(serde_json::Value::from(i))
    } else if let Some(d) = value.as_double() {
        serde_json::Number::from_f64(d).map(serde_json::Value::Number)
    } else if let Some(b) = value.as_bool() {
        Some(serde_json::Value::Bool(b))
    } else {
        None
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorIndex {
    async fn query(
        &self,
        vector: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SimilarityMatch>, ChatError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection,
                    vector.as_slice().to_vec(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| ChatError::retrieval(e.to_string()))?;

        let matches = results
            .result
            .into_iter()
            .map(|point| {
                let mut metadata = Map::new();
                let mut id = String::new();

                for (key, value) in &point.payload {
                    if key.as_str() == "name" {
                        if let Some(name) = value.as_str() {
                            id = name.to_string();
                        }
                        continue;
                    }
                    if let Some(json) = payload_value_to_json(value) {
                        metadata.insert(key.clone(), json);
                    }
                }

                SimilarityMatch {
                    id,
                    score: point.score,
                    metadata,
                }
            })
            .filter(|m| !m.id.is_empty())
            .collect();

        Ok(matches)
    }

    async fn upsert(
        &self,
        record: &ProfessorRecord,
        embedding: &Embedding,
    ) -> Result<(), ChatError> {
        let mut fields = Map::new();
        fields.insert("name".into(), record.id.clone().into());
        fields.insert("review".into(), record.review.clone().into());
        for (key, value) in &record.metadata {
            fields.insert(key.clone(), value.clone());
        }

        let payload: Payload = serde_json::Value::Object(fields)
            .try_into()
            .map_err(|_| ChatError::retrieval("failed to build payload"))?;

        let point = PointStruct::new(
            Self::point_id_for(&record.id).to_string(),
            embedding.as_slice().to_vec(),
            payload,
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| ChatError::retrieval(e.to_string()))?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChatError> {
        self.client
            .health_check()
            .await
            .map(|_| ())
            .map_err(|e| ChatError::retrieval(e.to_string()))
    }
}
