use thiserror::Error;

/// Failures of the retrieval-augmented chat pipeline, one variant per stage.
///
/// Variants up to `GenerationStart` occur before any response byte is sent
/// and map to a structured HTTP error. `StreamInterrupted` occurs after the
/// stream is open and can only surface through the stream itself.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid conversation history: {0}")]
    InvalidHistory(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Retrieval(String),

    #[error("Generation failed to start: {0}")]
    GenerationStart(String),

    #[error("Generation interrupted mid-stream: {0}")]
    StreamInterrupted(String),

    #[error("Timed out during {stage}")]
    Timeout { stage: &'static str },
}

impl ChatError {
    pub fn invalid_history(msg: impl Into<String>) -> Self {
        Self::InvalidHistory(msg.into())
    }

    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }

    pub fn generation_start(msg: impl Into<String>) -> Self {
        Self::GenerationStart(msg.into())
    }

    pub fn interrupted(msg: impl Into<String>) -> Self {
        Self::StreamInterrupted(msg.into())
    }

    pub fn timeout(stage: &'static str) -> Self {
        Self::Timeout { stage }
    }

    /// Pipeline stage name, used in structured error responses and logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidHistory(_) => "validation",
            Self::Embedding(_) => "embedding",
            Self::Retrieval(_) => "retrieval",
            Self::GenerationStart(_) => "generation",
            Self::StreamInterrupted(_) => "streaming",
            Self::Timeout { stage } => stage,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
