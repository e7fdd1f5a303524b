//! LLM boundary: message types, the provider trait, and the
//! OpenAI-compatible HTTP implementation.

mod openai;
mod provider;
mod types;

pub use openai::OpenAiProvider;
pub use provider::LlmProvider;
pub use types::{ChatMessage, ChatRequest};
