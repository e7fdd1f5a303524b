//! Retrieval-augmented chat core over an internal document corpus.
//!
//! The pipeline ingests PDF/DOCX/CSV/TXT files and a fixed set of web
//! pages, normalizes and chunks them, embeds the chunks into an
//! in-memory vector index, and answers questions in doc-search or
//! inquiry mode. CSV sources are additionally scored against an
//! employee-roster heuristic; when one qualifies, employee-related
//! questions are routed through a roster-specific answer path.
//!
//! [`engine::ChatEngine`] is the entry point; per-user state lives in
//! [`session::SessionContext`].

pub mod change;
pub mod chunker;
pub mod core;
pub mod engine;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod responder;
pub mod roster;
pub mod router;
pub mod session;
pub mod types;

pub use engine::{ChatEngine, IngestReport};
pub use session::SessionContext;
pub use types::{Chunk, LlmResponse, Mode, SourceDocument};
