mod openai;

pub use openai::OpenAiChatModel;
