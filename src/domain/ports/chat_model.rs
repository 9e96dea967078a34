use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::{errors::ChatError, ChatMessage};

/// Lazily-produced, ordered sequence of text fragments from the generative
/// model. An `Err` item is terminal; no further fragments follow it.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Starts a streamed completion for the given message list.
    ///
    /// Errors here mean the model rejected the request before producing any
    /// fragment; errors after the first fragment surface as `Err` items on
    /// the returned stream.
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<TokenStream, ChatError>;
}
