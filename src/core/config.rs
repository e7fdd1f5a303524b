//! Application configuration and paths.
//!
//! `AppConfig` is deserialized from a TOML file with serde defaults for
//! every field, so an empty file (or no file at all) yields a runnable
//! configuration. `validate` is called once at engine construction.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root folder recursively scanned for corpus files.
    pub data_dir: PathBuf,
    /// Fixed list of web pages loaded in addition to the file corpus.
    pub web_urls: Vec<String>,
    /// Timeout for each web page fetch, in seconds.
    pub web_timeout_secs: u64,
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters.
    pub chunk_overlap: usize,
    /// Documents retrieved per query.
    pub retriever_k: usize,
    /// Documents retrieved when a query is roster-related. Higher than the
    /// default to increase recall over a small, homogeneous roster corpus.
    pub retriever_k_employee: usize,
    /// Roster rows at or below this count are injected as a full table;
    /// above it a department-count summary is prepended.
    pub roster_full_table_max_rows: usize,
    /// Chunks embedded per provider call.
    pub embed_batch_size: usize,
    /// Chat model identifier passed to the provider.
    pub model: String,
    /// Embedding model identifier passed to the provider.
    pub embedding_model: String,
    /// Sampling temperature for generation.
    pub temperature: f32,
    /// Base URL of the OpenAI-compatible endpoint.
    pub llm_base_url: String,
    /// Environment variable holding the API key, if the endpoint needs one.
    pub api_key_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            web_urls: Vec::new(),
            web_timeout_secs: 30,
            chunk_size: 1000,
            chunk_overlap: 100,
            retriever_k: 5,
            retriever_k_employee: 15,
            roster_full_table_max_rows: 20,
            embed_batch_size: 64,
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: 0.5,
            llm_base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&raw).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.chunk_size == 0 {
            return Err(CoreError::Config("chunk_size must be positive".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(CoreError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.retriever_k == 0 || self.retriever_k_employee == 0 {
            return Err(CoreError::Config(
                "retriever document counts must be positive".into(),
            ));
        }
        if self.embed_batch_size == 0 {
            return Err(CoreError::Config("embed_batch_size must be positive".into()));
        }
        Ok(())
    }

    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env).ok().filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub log_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let log_dir = env::var("CORPUS_CHAT_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./logs"));
        let _ = fs::create_dir_all(&log_dir);
        AppPaths { log_dir }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
