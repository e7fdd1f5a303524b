//! Employee-query routing: keyword detection plus a roster-specific
//! answer path that bypasses general retrieval. Every failure here is
//! demoted to `None` so the caller can fall back.

use std::sync::Arc;

use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::responder::prompts;
use crate::roster::classifier::EMPLOYEE_KEYWORDS;
use crate::roster::{ActiveRoster, RosterTable};
use crate::session::SessionContext;
use crate::types::{Chunk, DocMetadata, LlmResponse, Mode};

pub struct EmployeeRouter {
    provider: Arc<dyn LlmProvider>,
    roster_full_table_max_rows: usize,
}

impl EmployeeRouter {
    pub fn new(provider: Arc<dyn LlmProvider>, roster_full_table_max_rows: usize) -> Self {
        Self {
            provider,
            roster_full_table_max_rows,
        }
    }

    /// True when the message mentions any employee-related keyword.
    pub fn is_employee_query(message: &str) -> bool {
        let lower = message.to_lowercase();
        EMPLOYEE_KEYWORDS
            .iter()
            .any(|kw| lower.contains(&kw.to_lowercase()))
    }

    /// Answer directly from the roster file. Only inquiry-mode queries
    /// are routed; doc-search must keep returning document locations.
    /// Returns `None` unless the query is employee-related, a roster is
    /// designated, the file still parses, and generation succeeds.
    pub async fn answer_from_roster(
        &self,
        session: &SessionContext,
        message: &str,
        mode: Mode,
    ) -> Option<LlmResponse> {
        if mode != Mode::Inquiry || !Self::is_employee_query(message) {
            return None;
        }
        let roster = session.active_roster.as_ref()?;

        let table = match RosterTable::load(&roster.path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %roster.path.display(), error = %e, "roster unreadable, falling back");
                return None;
            }
        };
        let employee_data = table.serialize_for_prompt(self.roster_full_table_max_rows);

        tracing::info!(path = %roster.path.display(), "answering from roster");
        self.generate(session, message, &employee_data, roster).await
    }

    /// Last-resort roster path: generation with only the cached column
    /// list as context. Used when the general path found nothing for an
    /// employee-related query.
    pub async fn answer_from_columns(
        &self,
        session: &SessionContext,
        message: &str,
        mode: Mode,
    ) -> Option<LlmResponse> {
        if mode != Mode::Inquiry || !Self::is_employee_query(message) {
            return None;
        }
        let roster = session.active_roster.as_ref()?;

        let employee_data = format!("columns: {}", roster.columns.join(", "));
        tracing::info!(path = %roster.path.display(), "retrying with roster columns only");
        self.generate(session, message, &employee_data, roster).await
    }

    async fn generate(
        &self,
        session: &SessionContext,
        message: &str,
        employee_data: &str,
        roster: &ActiveRoster,
    ) -> Option<LlmResponse> {
        let system_prompt = prompts::build_employee_prompt(message, employee_data);
        let mut messages = vec![ChatMessage::system(system_prompt)];
        messages.extend(session.history_messages());
        messages.push(ChatMessage::user(message));

        let answer = match self.provider.chat(ChatRequest::new(messages)).await {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "roster generation failed, falling back");
                return None;
            }
        };
        if answer.is_empty() {
            return None;
        }

        let mut metadata = DocMetadata::new(roster.path.to_string_lossy().into_owned());
        metadata.is_employee_data = true;
        let context = vec![Chunk::new(employee_data, metadata)];
        Some(LlmResponse::new(answer, context))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::CoreError;
    use crate::roster::classifier;

    struct MockProvider {
        answer: Result<String, String>,
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn chat(&self, _request: ChatRequest) -> Result<String, CoreError> {
            self.answer.clone().map_err(CoreError::llm)
        }

        async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
            Err(CoreError::embedding("not used"))
        }
    }

    fn router(answer: Result<&str, &str>) -> EmployeeRouter {
        EmployeeRouter::new(
            Arc::new(MockProvider {
                answer: answer.map(str::to_string).map_err(str::to_string),
            }),
            20,
        )
    }

    fn session_with_roster(dir: &Path) -> SessionContext {
        let path = dir.join("社員名簿.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "氏名,部署,スキル").unwrap();
        writeln!(file, "山田太郎,人事部,採用").unwrap();
        writeln!(file, "鈴木一郎,営業部,提案").unwrap();

        let mut session = SessionContext::new();
        session.active_roster = classifier::classify(&[path]);
        assert!(session.active_roster.is_some());
        session
    }

    #[test]
    fn keyword_detection_covers_both_languages() {
        assert!(EmployeeRouter::is_employee_query("人事部の従業員一覧を教えて"));
        assert!(EmployeeRouter::is_employee_query("Who is in the HR department?"));
        assert!(!EmployeeRouter::is_employee_query("経費精算の締め切りは？"));
    }

    #[tokio::test]
    async fn roster_answer_has_single_tagged_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_roster(dir.path());

        let response = router(Ok("山田太郎さんが人事部です。"))
            .answer_from_roster(&session, "人事部の従業員一覧を教えて", Mode::Inquiry)
            .await
            .unwrap();

        assert_eq!(response.context.len(), 1);
        assert!(response.context[0].metadata.is_employee_data);
        assert!(response.context[0].content.contains("山田太郎"));
    }

    #[tokio::test]
    async fn no_roster_means_no_route() {
        let session = SessionContext::new();
        let out = router(Ok("unused"))
            .answer_from_roster(&session, "人事部の従業員一覧を教えて", Mode::Inquiry)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn non_employee_query_is_not_routed() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_roster(dir.path());
        let out = router(Ok("unused"))
            .answer_from_roster(&session, "経費精算の締め切りは？", Mode::Inquiry)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn doc_search_mode_is_not_routed() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_roster(dir.path());

        let direct = router(Ok("unused"))
            .answer_from_roster(&session, "部署の議事録を検索して", Mode::DocSearch)
            .await;
        assert!(direct.is_none());

        let columns = router(Ok("unused"))
            .answer_from_columns(&session, "部署の議事録を検索して", Mode::DocSearch)
            .await;
        assert!(columns.is_none());
    }

    #[tokio::test]
    async fn generation_failure_demotes_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_roster(dir.path());
        let out = router(Err("boom"))
            .answer_from_roster(&session, "社員のスキルは？", Mode::Inquiry)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn missing_roster_file_demotes_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with_roster(dir.path());
        if let Some(roster) = session.active_roster.as_mut() {
            roster.path = dir.path().join("deleted.csv");
        }
        let out = router(Ok("unused"))
            .answer_from_roster(&session, "社員のスキルは？", Mode::Inquiry)
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn column_fallback_uses_cached_columns() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_roster(dir.path());

        let response = router(Ok("列は氏名、部署、スキルです。"))
            .answer_from_columns(&session, "名簿にはどんな項目がある？", Mode::Inquiry)
            .await
            .unwrap();

        assert_eq!(response.context.len(), 1);
        assert!(response.context[0].content.contains("氏名"));
        assert!(response.context[0].metadata.is_employee_data);
    }
}
