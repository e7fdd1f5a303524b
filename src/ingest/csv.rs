//! CSV loading: one document per row, rendered as `header: value` lines
//! so the row stays self-describing after chunking and retrieval.

use std::path::Path;

use crate::core::errors::CoreError;
use crate::types::{DocMetadata, SourceDocument};

pub fn load_csv_documents(path: &Path) -> Result<Vec<SourceDocument>, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| CoreError::parse(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| CoreError::parse(path, e))?
        .clone();

    let source = path.to_string_lossy().into_owned();
    let mut documents = Vec::new();

    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CoreError::parse(path, e))?;

        let mut lines = Vec::with_capacity(record.len());
        for (i, value) in record.iter().enumerate() {
            if value.trim().is_empty() {
                continue;
            }
            let header = headers.get(i).unwrap_or("").trim();
            lines.push(format!("{}: {}", header, value.trim()));
        }
        if lines.is_empty() {
            continue;
        }

        let mut metadata = DocMetadata::new(source.clone());
        metadata.row = Some(row_index);
        documents.push(SourceDocument::new(lines.join("\n"), metadata));
    }

    Ok(documents)
}
