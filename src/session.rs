//! Per-session state: conversation histories, the current retriever
//! snapshot, and the designated roster. Owned by the caller and passed
//! into every core call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::index::Retriever;
use crate::llm::ChatMessage;
use crate::roster::ActiveRoster;
use crate::types::{ConversationTurn, Role, TurnPayload};

pub struct SessionContext {
    pub id: Uuid,
    /// Turns fed back to the model: plain text only.
    pub llm_history: Vec<ConversationTurn>,
    /// Turns for the presentation layer; assistant entries may carry
    /// structured payloads.
    pub display_history: Vec<ConversationTurn>,
    /// Swapped wholesale on rebuild; clones of the old Arc stay valid.
    pub retriever: Option<Arc<Retriever>>,
    pub active_roster: Option<ActiveRoster>,
    pub indexed_at: Option<DateTime<Utc>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            llm_history: Vec::new(),
            display_history: Vec::new(),
            retriever: None,
            active_roster: None,
            indexed_at: None,
        }
    }

    /// Clear conversation state, keeping the index and roster.
    pub fn reset_conversation(&mut self) {
        self.llm_history.clear();
        self.display_history.clear();
    }

    /// Record one completed user/assistant exchange in both histories.
    pub fn record_exchange(&mut self, user_message: &str, answer: &str) {
        self.llm_history.push(ConversationTurn {
            role: Role::User,
            payload: TurnPayload::Text(user_message.to_string()),
        });
        self.llm_history.push(ConversationTurn {
            role: Role::Assistant,
            payload: TurnPayload::Text(answer.to_string()),
        });
    }

    pub fn record_display(&mut self, role: Role, payload: Value) {
        self.display_history.push(ConversationTurn {
            role,
            payload: TurnPayload::Display(payload),
        });
    }

    /// LLM history as chat messages. Structured payloads are skipped;
    /// only text turns go back to the model.
    pub fn history_messages(&self) -> Vec<ChatMessage> {
        self.llm_history
            .iter()
            .filter_map(|turn| match &turn.payload {
                TurnPayload::Text(text) => Some(match turn.role {
                    Role::User => ChatMessage::user(text),
                    Role::Assistant => ChatMessage::assistant(text),
                }),
                TurnPayload::Display(_) => None,
            })
            .collect()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchanges_land_in_llm_history_in_order() {
        let mut session = SessionContext::new();
        session.record_exchange("question", "answer");

        let messages = session.history_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "question");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[1].content, "answer");
    }

    #[test]
    fn display_payloads_stay_out_of_llm_history() {
        let mut session = SessionContext::new();
        session.record_display(Role::Assistant, serde_json::json!({"table": []}));
        assert!(session.history_messages().is_empty());
        assert_eq!(session.display_history.len(), 1);
    }

    #[test]
    fn reset_keeps_index_state() {
        let mut session = SessionContext::new();
        session.indexed_at = Some(Utc::now());
        session.record_exchange("a", "b");
        session.reset_conversation();

        assert!(session.llm_history.is_empty());
        assert!(session.indexed_at.is_some());
    }
}
