//! DOCX text extraction: the file is a ZIP archive whose
//! `word/document.xml` holds all runs of text.

use std::io::Read;
use std::path::Path;

use crate::core::errors::CoreError;
use crate::types::{DocMetadata, SourceDocument};

/// Extract the whole document as one `SourceDocument`.
pub fn load_docx_documents(path: &Path) -> Result<Vec<SourceDocument>, CoreError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| CoreError::parse(path, e))?;

    let mut doc_xml = archive
        .by_name("word/document.xml")
        .map_err(|_| CoreError::parse(path, "no document.xml in archive"))?;

    let mut xml = String::new();
    doc_xml
        .read_to_string(&mut xml)
        .map_err(|e| CoreError::parse(path, e))?;

    let text = plaintext_from_document_xml(&xml);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let metadata = DocMetadata::new(path.to_string_lossy().into_owned());
    Ok(vec![SourceDocument::new(text, metadata)])
}

/// Pull text runs (`w:t`) out of the document XML, inserting a line break
/// per paragraph (`w:p`) and unescaping XML entities.
pub fn plaintext_from_document_xml(xml: &str) -> String {
    let mut result = String::new();
    let mut in_text = false;
    let mut chars = xml.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '<' {
            let mut tag = String::new();
            for tc in chars.by_ref() {
                if tc == '>' {
                    break;
                }
                tag.push(tc);
            }

            // Exact tag-name match: `w:tbl`, `w:tc`, `w:pPr` and
            // friends must not be mistaken for `w:t` / `w:p`.
            let name = tag.split_whitespace().next().unwrap_or("");
            if name == "w:t" && !tag.ends_with('/') {
                in_text = true;
            } else if name == "/w:t" {
                in_text = false;
            } else if name == "w:p" && !tag.ends_with('/') {
                if !result.is_empty() && !result.ends_with('\n') {
                    result.push('\n');
                }
            }
        } else if in_text {
            result.push(c);
        }
    }

    result
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}
