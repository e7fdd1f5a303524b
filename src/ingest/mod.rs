//! Corpus ingestion: directory walking, format-specific parsers, web
//! fetching, and platform text normalization.

pub mod csv;
pub mod docx;
pub mod loader;
pub mod normalize;
pub mod pdf;
pub mod web;

pub use loader::{DocumentLoader, SUPPORTED_EXTENSIONS};
