use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::domain::{
    ports::{ChatModel, TokenStream},
    ChatError, ChatMessage, MessageRole,
};
use crate::infrastructure::config::ChatModelConfig;

/// Streaming chat adapter for an OpenAI-compatible `/chat/completions`
/// endpoint. The client handle is process-wide and safe for concurrent use.
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(client: Client<OpenAIConfig>, config: &ChatModelConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
        }
    }
}

#[allow(deprecated)]
fn to_request_message(message: &ChatMessage) -> ChatCompletionRequestMessage {
    match message.role {
        MessageRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(message.content.clone()),
                name: None,
            })
        }
        MessageRole::User => {
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(message.content.clone()),
                name: None,
            })
        }
        MessageRole::Assistant => {
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    message.content.clone(),
                )),
                name: None,
                refusal: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<TokenStream, ChatError> {
        let outbound: Vec<ChatCompletionRequestMessage> =
            messages.iter().map(to_request_message).collect();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(outbound)
            .build()
            .map_err(|e| ChatError::generation_start(e.to_string()))?;

        debug!(model = %self.model, messages = messages.len(), "Starting completion stream");

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| ChatError::generation_start(e.to_string()))?;

        let fragments = stream.map(|item| match item {
            Ok(response) => Ok(response
                .choices
                .first()
                .and_then(|choice| choice.delta.content.clone())
                .unwrap_or_default()),
            Err(e) => Err(ChatError::interrupted(e.to_string())),
        });

        Ok(Box::pin(fragments))
    }
}
