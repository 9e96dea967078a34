mod chat;
pub mod prompt;
pub mod relay;
mod retrieval;

pub use chat::{ByteStream, ChatService};
pub use retrieval::RetrievalService;
