pub mod chat_model;
pub mod config;
pub mod embedding;
pub mod vector_index;

pub use chat_model::OpenAiChatModel;
pub use config::AppConfig;
pub use embedding::OpenAiEmbedding;
pub use vector_index::{InMemoryVectorIndex, QdrantVectorIndex};
