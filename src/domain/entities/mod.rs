mod conversation;
mod embedding;
mod record;

pub use conversation::{ChatMessage, MessageRole};
pub use embedding::Embedding;
pub use record::{ProfessorRecord, SimilarityMatch};
