//! PDF text extraction.
//!
//! `pdf-extract` has better font encoding handling than raw lopdf, but
//! panics on some malformed files, so extraction runs under
//! `catch_unwind` with a lopdf operator-stream fallback.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use crate::core::errors::CoreError;
use crate::types::{DocMetadata, SourceDocument};

/// Extract one `SourceDocument` per page.
pub fn load_pdf_documents(path: &Path) -> Result<Vec<SourceDocument>, CoreError> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(path)
    }));

    let pages = match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), error = %e, "pdf-extract failed, trying lopdf fallback");
            return load_pdf_via_lopdf(path);
        }
        Err(_) => {
            tracing::warn!(path = %path.display(), "pdf-extract panicked, trying lopdf fallback");
            return load_pdf_via_lopdf(path);
        }
    };

    Ok(pages_to_documents(path, pages))
}

fn pages_to_documents(path: &Path, pages: Vec<String>) -> Vec<SourceDocument> {
    let source = path.to_string_lossy().into_owned();
    pages
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| {
            let mut metadata = DocMetadata::new(source.clone());
            metadata.page = Some(i as u32 + 1);
            SourceDocument::new(text, metadata)
        })
        .collect()
}

/// Fallback extraction via lopdf's content streams. Less accurate for
/// complex fonts but more tolerant of malformed files.
fn load_pdf_via_lopdf(path: &Path) -> Result<Vec<SourceDocument>, CoreError> {
    use lopdf::{Document, Object};

    let doc = Document::load(path).map_err(|e| CoreError::parse(path, e))?;
    let source = path.to_string_lossy().into_owned();
    let mut documents = Vec::new();

    for (page_num, page_id) in doc.get_pages() {
        let Ok(content) = doc.get_page_content(page_id) else {
            continue;
        };
        let operations = lopdf::content::Content::decode(&content)
            .map(|c| c.operations)
            .unwrap_or_default();

        let mut text = String::new();
        for op in operations {
            match op.operator.as_str() {
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        text.push_str(&decode_pdf_string(bytes));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(arr)) = op.operands.first() {
                        for item in arr {
                            if let Object::String(bytes, _) = item {
                                text.push_str(&decode_pdf_string(bytes));
                            }
                        }
                    }
                }
                "Td" | "TD" | "T*" | "'" | "\"" => {
                    if !text.ends_with('\n') && !text.ends_with(' ') {
                        text.push(' ');
                    }
                }
                "ET" => {
                    if !text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                _ => {}
            }
        }

        if !text.trim().is_empty() {
            let mut metadata = DocMetadata::new(source.clone());
            metadata.page = Some(page_num);
            documents.push(SourceDocument::new(text, metadata));
        }
    }

    Ok(documents)
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    // UTF-8 first, then Latin-1 fallback.
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| bytes.iter().map(|&b| b as char).collect())
}
