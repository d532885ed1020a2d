pub mod chat_llm;

pub use chat_llm::OpenAiChatAdapter;
