use thiserror::Error;

/// Errors produced by the ingestion and retrieval core.
///
/// Query-time entry points (`ChatEngine::respond`) never surface these to
/// the caller; they are demoted to sentinel answers. Ingestion
/// (`ChatEngine::ingest`) does return them, since a failed index build
/// leaves nothing to answer from.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("llm request failed: {0}")]
    Llm(String),
    #[error("embedding request failed: {0}")]
    Embedding(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn llm<E: std::fmt::Display>(err: E) -> Self {
        CoreError::Llm(err.to_string())
    }

    pub fn embedding<E: std::fmt::Display>(err: E) -> Self {
        CoreError::Embedding(err.to_string())
    }

    pub fn parse<P: AsRef<std::path::Path>, E: std::fmt::Display>(path: P, err: E) -> Self {
        CoreError::Parse {
            path: path.as_ref().to_string_lossy().into_owned(),
            message: err.to_string(),
        }
    }
}
