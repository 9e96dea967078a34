mod chat_model;
mod embedding;
mod vector_index;

pub use chat_model::{ChatModel, TokenStream};
pub use embedding::EmbeddingService;
pub use vector_index::VectorIndex;
