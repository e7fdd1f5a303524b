//! Parsed roster table: department grouping and plain-text serialization
//! for prompt injection and index chunks.

use std::path::{Path, PathBuf};

use crate::core::errors::CoreError;
use crate::roster::classifier::DEPARTMENT_COLUMN_KEYWORDS;
use crate::types::{Chunk, DocMetadata};

#[derive(Debug, Clone)]
pub struct RosterTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| CoreError::parse(path, e))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| CoreError::parse(path, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CoreError::parse(path, e))?;
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        Ok(RosterTable {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first department-like column, if any.
    pub fn department_column(&self) -> Option<usize> {
        self.headers.iter().position(|h| {
            let lower = h.to_lowercase();
            DEPARTMENT_COLUMN_KEYWORDS
                .iter()
                .any(|kw| lower.contains(&kw.to_lowercase()))
        })
    }

    /// Distinct department values in first-seen order.
    pub fn departments(&self) -> Vec<String> {
        let Some(col) = self.department_column() else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        for row in &self.rows {
            let value = row.get(col).map(|v| v.as_str()).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            if !seen.iter().any(|s: &String| s == value) {
                seen.push(value.to_string());
            }
        }
        seen
    }

    fn format_row(&self, row: &[String]) -> String {
        row.iter()
            .enumerate()
            .filter(|(_, v)| !v.is_empty())
            .map(|(i, v)| {
                let header = self.headers.get(i).map(|h| h.as_str()).unwrap_or("");
                format!("{}: {}", header, v)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whole table as plain text, one formatted row per line.
    pub fn serialize_full(&self) -> String {
        let mut out = format!("columns: {}\n", self.headers.join(", "));
        for row in &self.rows {
            out.push_str(&self.format_row(row));
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    /// Rows of one department as plain text.
    pub fn serialize_department(&self, department: &str) -> String {
        let col = self.department_column();
        let mut out = format!(
            "department: {}\ncolumns: {}\n",
            department,
            self.headers.join(", ")
        );
        for row in &self.rows {
            let matches = col
                .map(|c| row.get(c).map(|v| v == department).unwrap_or(false))
                .unwrap_or(false);
            if matches {
                out.push_str(&self.format_row(row));
                out.push('\n');
            }
        }
        out.trim_end().to_string()
    }

    /// Serialization used for direct prompt injection: the full table when
    /// small enough, otherwise a department-count summary followed by the
    /// full table.
    pub fn serialize_for_prompt(&self, max_full_rows: usize) -> String {
        let full = self.serialize_full();
        if self.row_count() <= max_full_rows {
            return full;
        }

        let col = self.department_column();
        let mut summary = format!("total rows: {}\n", self.row_count());
        if col.is_some() {
            for dept in self.departments() {
                let count = self
                    .rows
                    .iter()
                    .filter(|row| col.map(|c| row.get(c) == Some(&dept)).unwrap_or(false))
                    .count();
                summary.push_str(&format!("{}: {}名\n", dept, count));
            }
        }
        format!("{}\n{}", summary.trim_end(), full)
    }

    /// Index chunks for the roster: one chunk per distinct department plus
    /// one whole-table chunk; without a department column, the whole-table
    /// chunk alone. All tagged as employee data.
    pub fn to_chunks(&self) -> Vec<Chunk> {
        let source = self.path.to_string_lossy().into_owned();
        let mut chunks = Vec::new();

        for dept in self.departments() {
            let mut metadata = DocMetadata::new(source.clone());
            metadata.is_employee_data = true;
            metadata.department = Some(dept.clone());
            chunks.push(Chunk::new(self.serialize_department(&dept), metadata));
        }

        let mut metadata = DocMetadata::new(source);
        metadata.is_employee_data = true;
        chunks.push(Chunk::new(self.serialize_full(), metadata));
        chunks
    }
}
