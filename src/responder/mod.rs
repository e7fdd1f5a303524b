//! Retrieval-augmented answering: history-aware query rewriting,
//! retrieval, mode-specific prompting, and sentinel-based degradation.
//! `respond` never returns an error; failures become fixed answer text.

pub mod prompts;

use std::sync::Arc;

use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::session::SessionContext;
use crate::types::{LlmResponse, Mode};

pub struct Responder {
    provider: Arc<dyn LlmProvider>,
}

impl Responder {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Restate `message` so it stands alone without the conversation.
    /// With no history the message is already standalone; on rewrite
    /// failure the original message is used as-is.
    pub async fn rewrite_standalone(&self, message: &str, history: &[ChatMessage]) -> String {
        if history.is_empty() {
            return message.to_string();
        }

        let mut messages = vec![ChatMessage::system(
            prompts::SYSTEM_PROMPT_CREATE_INDEPENDENT_TEXT,
        )];
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(message));

        match self.provider.chat(ChatRequest::new(messages)).await {
            Ok(rewritten) if !rewritten.trim().is_empty() => rewritten.trim().to_string(),
            Ok(_) => message.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "standalone rewrite failed, using raw message");
                message.to_string()
            }
        }
    }

    /// Answer `message` against the session's index. Always returns a
    /// structurally valid response; degraded service is sentinel text
    /// in `answer` with empty context.
    pub async fn respond(
        &self,
        session: &mut SessionContext,
        message: &str,
        mode: Mode,
        k: usize,
    ) -> LlmResponse {
        let Some(retriever) = session.retriever.clone() else {
            tracing::warn!("respond called before the index was built");
            return error_response();
        };

        let history = session.history_messages();
        let standalone = self.rewrite_standalone(message, &history).await;

        tracing::debug!(index = retriever.index_size(), k, "retrieving context");
        let chunks = match retriever.search_text(&standalone, k).await {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::error!(error = %e, "retrieval failed");
                return error_response();
            }
        };

        let context = prompts::format_context(&chunks);
        let system_prompt = match mode {
            Mode::DocSearch => prompts::build_doc_search_prompt(message, &context),
            Mode::Inquiry => prompts::build_inquiry_prompt(message, &context),
        };

        let mut messages = vec![ChatMessage::system(system_prompt)];
        messages.extend(history);
        messages.push(ChatMessage::user(message));

        let answer = match self.provider.chat(ChatRequest::new(messages)).await {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                tracing::error!(error = %e, "generation failed");
                return error_response();
            }
        };

        // Doc-search prompts ask for an empty string on a match; an
        // empty answer is indistinguishable from "no wording", so it
        // is treated as the no-match sentinel.
        let answer = if mode == Mode::DocSearch && is_effectively_empty(&answer) {
            prompts::NO_DOC_MATCH_ANSWER.to_string()
        } else {
            answer
        };

        session.record_exchange(message, &answer);
        LlmResponse::new(answer, chunks)
    }
}

fn is_effectively_empty(answer: &str) -> bool {
    let trimmed = answer.trim();
    trimmed.is_empty() || trimmed == "\"\"" || trimmed == "「\"\"」"
}

fn error_response() -> LlmResponse {
    LlmResponse::error(prompts::build_error_message(
        prompts::GET_LLM_RESPONSE_ERROR_MESSAGE,
    ))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::CoreError;
    use crate::index::{Retriever, VectorIndexBuilder};
    use crate::types::{Chunk, DocMetadata};

    struct MockProvider {
        chat_answer: String,
        fail_chat: bool,
    }

    impl MockProvider {
        fn answering(answer: &str) -> Self {
            Self {
                chat_answer: answer.to_string(),
                fail_chat: false,
            }
        }

        fn failing() -> Self {
            Self {
                chat_answer: String::new(),
                fail_chat: true,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn chat(&self, _request: ChatRequest) -> Result<String, CoreError> {
            if self.fail_chat {
                return Err(CoreError::llm("mock chat failure"));
            }
            Ok(self.chat_answer.clone())
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
            Ok(inputs
                .iter()
                .map(|s| vec![s.chars().count() as f32, 1.0])
                .collect())
        }
    }

    async fn session_with_index(provider: Arc<dyn LlmProvider>) -> SessionContext {
        let chunks = vec![Chunk::new("社内規定の本文", DocMetadata::new("rules.txt"))];
        let index = VectorIndexBuilder::new(provider.clone(), 64)
            .build(chunks)
            .await
            .unwrap();

        let mut session = SessionContext::new();
        session.retriever = Some(Arc::new(Retriever::new(index, provider)));
        session
    }

    #[tokio::test]
    async fn missing_retriever_degrades_to_error_answer() {
        let responder = Responder::new(Arc::new(MockProvider::answering("unused")));
        let mut session = SessionContext::new();

        let response = responder
            .respond(&mut session, "質問", Mode::Inquiry, 5)
            .await;

        assert!(response.context.is_empty());
        assert!(response
            .answer
            .contains(prompts::GET_LLM_RESPONSE_ERROR_MESSAGE));
        assert!(response.is_valid());
        assert!(session.llm_history.is_empty());
    }

    #[tokio::test]
    async fn generation_failure_degrades_to_error_answer() {
        let provider: Arc<dyn LlmProvider> = Arc::new(MockProvider::failing());
        let mut session = session_with_index(provider.clone()).await;
        let responder = Responder::new(provider);

        let response = responder
            .respond(&mut session, "質問", Mode::Inquiry, 5)
            .await;

        assert!(response.context.is_empty());
        assert!(response
            .answer
            .contains(prompts::GET_LLM_RESPONSE_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn empty_doc_search_answer_becomes_no_match_sentinel() {
        let provider: Arc<dyn LlmProvider> = Arc::new(MockProvider::answering("\"\""));
        let mut session = session_with_index(provider.clone()).await;
        let responder = Responder::new(provider);

        let response = responder
            .respond(&mut session, "議事録ある？", Mode::DocSearch, 5)
            .await;

        assert_eq!(response.answer, prompts::NO_DOC_MATCH_ANSWER);
        assert_eq!(response.context.len(), 1);
    }

    #[tokio::test]
    async fn successful_answer_is_recorded_in_history() {
        let provider: Arc<dyn LlmProvider> = Arc::new(MockProvider::answering("規定は20日です。"));
        let mut session = session_with_index(provider.clone()).await;
        let responder = Responder::new(provider);

        let response = responder
            .respond(&mut session, "有給は？", Mode::Inquiry, 5)
            .await;

        assert_eq!(response.answer, "規定は20日です。");
        assert_eq!(response.context.len(), 1);
        assert_eq!(session.llm_history.len(), 2);
    }

    #[tokio::test]
    async fn rewrite_skips_the_model_without_history() {
        let responder = Responder::new(Arc::new(MockProvider::answering("rewritten")));
        let out = responder.rewrite_standalone("original", &[]).await;
        assert_eq!(out, "original");
    }

    #[tokio::test]
    async fn rewrite_uses_the_model_with_history() {
        let responder = Responder::new(Arc::new(MockProvider::answering("standalone form")));
        let history = vec![ChatMessage::user("earlier"), ChatMessage::assistant("ok")];
        let out = responder.rewrite_standalone("それで？", &history).await;
        assert_eq!(out, "standalone form");
    }
}
