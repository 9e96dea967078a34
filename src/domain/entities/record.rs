use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One ranked match from the similarity index: a professor record with its
/// metadata payload (subject, stars, and whatever else the index stores).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl SimilarityMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A professor record to be indexed: the review text gets embedded, the rest
/// is stored as payload and returned verbatim on query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorRecord {
    pub id: String,
    pub review: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ProfessorRecord {
    pub fn new(id: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            review: review.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
