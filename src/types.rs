//! Domain types shared across the pipeline.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Answer mode selected by the user for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Surface likely source locations without composing an answer.
    DocSearch,
    /// Generate a grounded natural-language answer with citations.
    Inquiry,
}

/// Source metadata carried by every document and chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocMetadata {
    /// File path or URL the content was loaded from.
    pub source: String,
    /// 1-based page number for paginated formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// 0-based row index for row-wise tabular sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Department a roster chunk was scoped to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Set on chunks derived from the active employee roster.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_employee_data: bool,
}

impl DocMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        DocMetadata {
            source: source.into(),
            ..Default::default()
        }
    }
}

/// A loaded unit of content. Immutable after normalization; several
/// documents may share the same `source` (e.g. PDF pages).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub content: String,
    pub metadata: DocMetadata,
}

impl SourceDocument {
    pub fn new(content: impl Into<String>, metadata: DocMetadata) -> Self {
        SourceDocument {
            content: content.into(),
            metadata,
        }
    }
}

/// A bounded slice of a document (or a synthetic table aggregation) —
/// the unit stored in and retrieved from the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Content hash, stable across rebuilds of the same corpus.
    pub id: String,
    pub content: String,
    pub metadata: DocMetadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: DocMetadata) -> Self {
        let content = content.into();
        let mut hasher = Sha256::new();
        hasher.update(metadata.source.as_bytes());
        hasher.update(content.as_bytes());
        let id = hex::encode(&hasher.finalize()[..8]);
        Chunk {
            id,
            content,
            metadata,
        }
    }
}

/// Result of a query against the core: answer text plus the chunks that
/// supported it, in retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub answer: String,
    pub context: Vec<Chunk>,
}

impl LlmResponse {
    pub fn new(answer: impl Into<String>, context: Vec<Chunk>) -> Self {
        LlmResponse {
            answer: answer.into(),
            context,
        }
    }

    /// Fixed error answer with empty context, used wherever the pipeline
    /// degrades instead of raising.
    pub fn error(message: impl Into<String>) -> Self {
        LlmResponse {
            answer: message.into(),
            context: Vec::new(),
        }
    }

    /// A response is valid when the provider actually produced an answer.
    /// Empty doc-search answers are normalized to the no-match sentinel
    /// before construction, so an empty answer here means a misbehaving
    /// provider.
    pub fn is_valid(&self) -> bool {
        !self.answer.trim().is_empty()
    }
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the display-facing history. User turns carry raw text;
/// assistant turns carry whatever structured content the presentation
/// layer built from an `LlmResponse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub payload: TurnPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnPayload {
    Text(String),
    Display(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ids_are_stable_and_source_scoped() {
        let a = Chunk::new("hello", DocMetadata::new("a.txt"));
        let b = Chunk::new("hello", DocMetadata::new("a.txt"));
        let c = Chunk::new("hello", DocMetadata::new("b.txt"));
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn error_response_has_empty_context() {
        let resp = LlmResponse::error("failed");
        assert!(resp.context.is_empty());
        assert!(resp.is_valid());
        assert!(!LlmResponse::new("  ", vec![]).is_valid());
    }
}
