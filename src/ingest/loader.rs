//! Document loader: recursive directory walk with per-extension parsers,
//! plus a fixed list of web pages. Any per-entry failure is logged and
//! skipped; the batch always completes.

use std::path::Path;
use std::time::Duration;

use walkdir::WalkDir;

use super::normalize::normalize_document;
use super::{csv, docx, pdf, web};
use crate::core::errors::CoreError;
use crate::types::{DocMetadata, SourceDocument};

/// Extensions the loader knows how to parse.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "csv", "txt"];

pub struct DocumentLoader {
    web_timeout: Duration,
}

impl DocumentLoader {
    pub fn new(web_timeout: Duration) -> Self {
        Self { web_timeout }
    }

    /// Load the whole corpus: files under `root`, then the given web
    /// pages, all normalized for the current platform.
    pub async fn load_all(&self, root: &Path, urls: &[String]) -> Vec<SourceDocument> {
        let mut documents = self.load_directory(root);
        tracing::info!(count = documents.len(), "documents loaded from files");

        let web_documents = self.load_web(urls).await;
        tracing::info!(count = web_documents.len(), "documents loaded from web pages");
        documents.extend(web_documents);

        for doc in &mut documents {
            normalize_document(doc);
        }
        documents
    }

    /// Recursively load every supported file under `root`. Traversal and
    /// parse errors are logged per entry and never abort the walk.
    pub fn load_directory(&self, root: &Path) -> Vec<SourceDocument> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            match load_file(entry.path()) {
                Ok(docs) => documents.extend(docs),
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "skipping file");
                }
            }
        }

        documents
    }

    /// Fetch each URL; one failed fetch does not fail the batch.
    pub async fn load_web(&self, urls: &[String]) -> Vec<SourceDocument> {
        let client = match reqwest::Client::builder().timeout(self.web_timeout).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "failed to build web client, skipping web pages");
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for url in urls {
            tracing::info!(%url, "loading web page");
            match web::fetch_web_document(&client, url).await {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!(%url, error = %e, "web page fetch failed, skipping");
                }
            }
        }
        documents
    }
}

/// Dispatch a file to its parser by extension. Unsupported extensions
/// produce no documents and no error.
fn load_file(path: &Path) -> Result<Vec<SourceDocument>, CoreError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf::load_pdf_documents(path),
        "docx" => docx::load_docx_documents(path),
        "csv" => csv::load_csv_documents(path),
        "txt" => {
            let content = std::fs::read_to_string(path)?;
            let metadata = DocMetadata::new(path.to_string_lossy().into_owned());
            Ok(vec![SourceDocument::new(content, metadata)])
        }
        _ => {
            tracing::debug!(path = %path.display(), "unsupported extension, skipping");
            Ok(Vec::new())
        }
    }
}
