//! Window-based text chunking with boundary-aware splits. Windows
//! overlap so each chunk repeats the tail of the previous one,
//! preserving continuity across retrieval hits.

use crate::types::{Chunk, SourceDocument};

#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    /// `chunk_overlap` must be strictly smaller than `chunk_size`;
    /// config validation enforces this before construction.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split one document's content into overlapping windows. Each
    /// window ends at a paragraph break when one falls in its second
    /// half, else at a sentence break, else at the size limit.
    pub fn split(&self, content: &str) -> Vec<String> {
        let chars: Vec<char> = content.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        if chars.len() <= self.chunk_size {
            return vec![content.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let hard_end = (start + self.chunk_size).min(chars.len());
            let end = if hard_end == chars.len() {
                hard_end
            } else {
                find_break(&chars, start, hard_end)
            };

            chunks.push(chars[start..end].iter().collect());

            if end == chars.len() {
                break;
            }
            // Overlap never pushes the window backwards past progress.
            start = end.saturating_sub(self.chunk_overlap).max(start + 1);
        }

        chunks
    }

    /// Chunk a batch of documents, carrying each document's metadata
    /// into every chunk it produces.
    pub fn split_all(&self, documents: &[SourceDocument]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for doc in documents {
            for piece in self.split(&doc.content) {
                chunks.push(Chunk::new(piece, doc.metadata.clone()));
            }
        }
        tracing::info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "documents chunked"
        );
        chunks
    }
}

/// Best break position in `(start, hard_end]`, searched backwards but
/// only within the window's second half so chunks never degenerate.
fn find_break(chars: &[char], start: usize, hard_end: usize) -> usize {
    let min_end = start + (hard_end - start) / 2;

    // Paragraph boundary first.
    for i in (min_end..hard_end).rev() {
        if chars[i] == '\n' && i > start && chars[i - 1] == '\n' {
            return i + 1;
        }
    }
    // Then sentence boundary.
    for i in (min_end..hard_end).rev() {
        if matches!(chars[i], '。' | '！' | '？' | '\n')
            || (matches!(chars[i], '.' | '!' | '?')
                && chars.get(i + 1).map(|c| c.is_whitespace()).unwrap_or(true))
        {
            return i + 1;
        }
    }
    hard_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocMetadata;

    /// Verify the chunks are in-order slices of the original that
    /// overlap or touch, together covering the whole text.
    fn assert_round_trip(content: &str, chunks: &[String]) {
        let original: Vec<char> = content.chars().collect();
        let mut start = 0;
        let mut covered_to = 0;
        for chunk in chunks {
            let chunk_chars: Vec<char> = chunk.chars().collect();
            // Latest match that still touches covered text, so repeated
            // content (e.g. "aaaa…") does not pin every chunk to the
            // earliest occurrence.
            let position = (start..=original.len() - chunk_chars.len())
                .rev()
                .filter(|&i| i <= covered_to)
                .find(|&i| original[i..i + chunk_chars.len()] == chunk_chars[..])
                .unwrap_or_else(|| panic!("chunk not found in order: {chunk}"));
            assert!(position <= covered_to, "gap before chunk: {chunk}");
            covered_to = position + chunk_chars.len();
            start = position;
        }
        assert_eq!(covered_to, original.len());
    }

    #[test]
    fn short_content_is_a_single_chunk() {
        let chunker = Chunker::new(1000, 100);
        let chunks = chunker.split("short text");
        assert_eq!(chunks, vec!["short text".to_string()]);
    }

    #[test]
    fn round_trip_preserves_content_and_order() {
        let chunker = Chunker::new(50, 10);
        let content = "最初の文です。次の文はもう少し長く書いてあります。\n\n\
                       第二段落はここから始まります。途中で切れても復元できること。\
                       最後の文がこの確認の対象です。";
        let chunks = chunker.split(content);
        assert!(chunks.len() > 1);
        assert_round_trip(content, &chunks);
    }

    #[test]
    fn round_trip_without_any_boundaries() {
        let chunker = Chunker::new(20, 5);
        let content: String = std::iter::repeat('a').take(95).collect();
        let chunks = chunker.split(&content);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
        assert_round_trip(&content, &chunks);
    }

    #[test]
    fn prefers_paragraph_breaks() {
        let chunker = Chunker::new(40, 5);
        let content = format!("{}\n\n{}", "あ".repeat(30), "い".repeat(30));
        let chunks = chunker.split(&content);
        assert!(chunks[0].ends_with('\n'));
    }

    #[test]
    fn split_all_carries_metadata() {
        let chunker = Chunker::new(1000, 100);
        let docs = vec![
            SourceDocument::new("one", DocMetadata::new("a.txt")),
            SourceDocument::new("two", DocMetadata::new("b.txt")),
        ];
        let chunks = chunker.split_all(&docs);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.source, "a.txt");
        assert_eq!(chunks[1].metadata.source, "b.txt");
    }
}
