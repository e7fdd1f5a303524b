//! Pipeline orchestration: ingestion (load, classify, chunk, index)
//! and query answering through an ordered strategy chain.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use walkdir::WalkDir;

use crate::change;
use crate::chunker::Chunker;
use crate::core::config::AppConfig;
use crate::core::errors::CoreError;
use crate::index::{Retriever, VectorIndexBuilder};
use crate::ingest::{DocumentLoader, SUPPORTED_EXTENSIONS};
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::responder::{prompts, Responder};
use crate::roster::{classifier, RosterTable};
use crate::router::EmployeeRouter;
use crate::session::SessionContext;
use crate::types::{LlmResponse, Mode, SourceDocument};

/// Summary of one ingestion run.
#[derive(Debug)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub roster: Option<PathBuf>,
}

pub struct ChatEngine {
    config: AppConfig,
    provider: Arc<dyn LlmProvider>,
    loader: DocumentLoader,
    chunker: Chunker,
    responder: Responder,
    router: EmployeeRouter,
}

impl ChatEngine {
    pub fn new(config: AppConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(&config));
        Ok(Self::with_provider(config, provider))
    }

    /// Build the engine around a caller-supplied provider.
    pub fn with_provider(config: AppConfig, provider: Arc<dyn LlmProvider>) -> Self {
        tracing::info!(provider = provider.name(), "engine initialized");
        let loader = DocumentLoader::new(Duration::from_secs(config.web_timeout_secs));
        let chunker = Chunker::new(config.chunk_size, config.chunk_overlap);
        let responder = Responder::new(provider.clone());
        let router = EmployeeRouter::new(provider.clone(), config.roster_full_table_max_rows);
        Self {
            config,
            provider,
            loader,
            chunker,
            responder,
            router,
        }
    }

    /// Run the full ingestion pipeline and install the results in the
    /// session: load sources, designate a roster, chunk, embed, and
    /// replace the index snapshot.
    pub async fn ingest(&self, session: &mut SessionContext) -> Result<IngestReport, CoreError> {
        let documents = self
            .loader
            .load_all(&self.config.data_dir, &self.config.web_urls)
            .await;

        let csv_paths = distinct_csv_paths(&documents);
        session.active_roster = classifier::classify(&csv_paths);
        let roster_source = session
            .active_roster
            .as_ref()
            .map(|r| r.path.to_string_lossy().into_owned());

        // The roster gets department-scoped chunks instead of the
        // generic row-wise treatment; its row documents are set aside.
        let general: Vec<SourceDocument> = documents
            .iter()
            .filter(|d| Some(&d.metadata.source) != roster_source.as_ref())
            .cloned()
            .collect();
        let mut chunks = self.chunker.split_all(&general);

        if let Some(roster) = &session.active_roster {
            match RosterTable::load(&roster.path) {
                Ok(table) => chunks.extend(table.to_chunks()),
                Err(e) => {
                    tracing::warn!(path = %roster.path.display(), error = %e, "roster chunking failed");
                }
            }
        }

        let chunk_count = chunks.len();
        let index = VectorIndexBuilder::new(self.provider.clone(), self.config.embed_batch_size)
            .build(chunks)
            .await?;
        session.retriever = Some(Arc::new(Retriever::new(index, self.provider.clone())));
        session.indexed_at = Some(Utc::now());

        Ok(IngestReport {
            documents: documents.len(),
            chunks: chunk_count,
            roster: session.active_roster.as_ref().map(|r| r.path.clone()),
        })
    }

    /// Answer one message. Strategies are tried in order: the roster
    /// path for employee queries, then general retrieval, then a
    /// columns-only roster retry when retrieval found nothing. Always
    /// returns a structurally valid response.
    pub async fn respond(
        &self,
        session: &mut SessionContext,
        message: &str,
        mode: Mode,
    ) -> LlmResponse {
        if let Some(response) = self.router.answer_from_roster(session, message, mode).await {
            session.record_exchange(message, &response.answer);
            return response;
        }

        let k = if EmployeeRouter::is_employee_query(message) {
            self.config.retriever_k_employee
        } else {
            self.config.retriever_k
        };
        let general = self.responder.respond(session, message, mode, k).await;

        if general.answer.contains(prompts::INQUIRY_NO_MATCH_ANSWER) {
            if let Some(response) = self
                .router
                .answer_from_columns(session, message, mode)
                .await
            {
                // The sentinel exchange was already recorded; replace
                // it with the answer the caller will actually see.
                let len = session.llm_history.len();
                session.llm_history.truncate(len.saturating_sub(2));
                session.record_exchange(message, &response.answer);
                return response;
            }
        }

        general
    }

    /// Supported files under the data directory modified since the
    /// last ingestion. Empty when nothing was ever indexed.
    pub fn stale_sources(&self, session: &SessionContext) -> Vec<PathBuf> {
        let Some(reference) = session.indexed_at else {
            return Vec::new();
        };

        let paths: Vec<PathBuf> = WalkDir::new(&self.config.data_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        change::stale_sources(&paths, reference)
    }
}

fn distinct_csv_paths(documents: &[SourceDocument]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for doc in documents {
        let path = PathBuf::from(&doc.metadata.source);
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}
