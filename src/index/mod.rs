//! In-memory vector index over chunk embeddings, built in batches and
//! searched by cosine similarity.

pub mod math;

use std::sync::Arc;

use crate::core::errors::CoreError;
use crate::llm::LlmProvider;
use crate::types::Chunk;

/// Immutable snapshot of embedded chunks. A rebuild produces a new
/// index; in-flight searches keep reading the old one.
pub struct VectorIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
}

impl VectorIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-k chunks by cosine similarity to the query embedding,
    /// descending, ties broken by insertion order.
    pub fn search_embedding(&self, query: &[f32], k: usize) -> Vec<Chunk> {
        let scores: Vec<f32> = self
            .entries
            .iter()
            .map(|(_, embedding)| math::cosine_similarity(query, embedding))
            .collect();

        math::rank_descending(&scores, k)
            .into_iter()
            .map(|i| self.entries[i].0.clone())
            .collect()
    }
}

pub struct VectorIndexBuilder {
    provider: Arc<dyn LlmProvider>,
    batch_size: usize,
}

impl VectorIndexBuilder {
    pub fn new(provider: Arc<dyn LlmProvider>, batch_size: usize) -> Self {
        Self {
            provider,
            batch_size,
        }
    }

    /// Embed every chunk and assemble the index. A failed batch fails
    /// the whole build; ingestion retries from scratch next run.
    pub async fn build(&self, chunks: Vec<Chunk>) -> Result<VectorIndex, CoreError> {
        let mut entries = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(self.batch_size.max(1)) {
            let inputs: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.provider.embed(&inputs).await?;
            for (chunk, embedding) in batch.iter().zip(embeddings) {
                entries.push((chunk.clone(), embedding));
            }
        }

        tracing::info!(chunks = entries.len(), "vector index built");
        Ok(VectorIndex { entries })
    }
}

/// Query-side handle pairing the index snapshot with the embedding
/// provider.
pub struct Retriever {
    index: VectorIndex,
    provider: Arc<dyn LlmProvider>,
}

impl Retriever {
    pub fn new(index: VectorIndex, provider: Arc<dyn LlmProvider>) -> Self {
        Self { index, provider }
    }

    pub fn index_size(&self) -> usize {
        self.index.len()
    }

    pub async fn search_text(&self, query: &str, k: usize) -> Result<Vec<Chunk>, CoreError> {
        let embeddings = self.provider.embed(&[query.to_string()]).await?;
        let query_embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::embedding("provider returned no query embedding"))?;
        Ok(self.index.search_embedding(&query_embedding, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocMetadata;

    fn chunk(text: &str) -> Chunk {
        Chunk::new(text, DocMetadata::new("test.txt"))
    }

    fn index(entries: Vec<(Chunk, Vec<f32>)>) -> VectorIndex {
        VectorIndex { entries }
    }

    #[test]
    fn search_orders_by_similarity() {
        let idx = index(vec![
            (chunk("far"), vec![0.0, 1.0]),
            (chunk("near"), vec![1.0, 0.1]),
            (chunk("exact"), vec![1.0, 0.0]),
        ]);

        let hits = idx.search_embedding(&[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "exact");
        assert_eq!(hits[1].content, "near");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let idx = index(vec![
            (chunk("first"), vec![1.0, 0.0]),
            (chunk("second"), vec![1.0, 0.0]),
        ]);

        let hits = idx.search_embedding(&[1.0, 0.0], 2);
        assert_eq!(hits[0].content, "first");
        assert_eq!(hits[1].content, "second");
    }

    #[test]
    fn k_larger_than_index_returns_everything() {
        let idx = index(vec![(chunk("only"), vec![1.0])]);
        assert!(!idx.is_empty());
        assert_eq!(idx.search_embedding(&[1.0], 10).len(), 1);
    }
}
