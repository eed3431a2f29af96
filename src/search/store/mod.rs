mod file;
mod types;

pub use file::IndexStore;
pub use types::{Chunk, CourseChunk, DiscourseChunk, IndexStats, SearchResult};

use crate::error::CorpusError;

/// One indexed unit: a chunk paired with its embedding.
///
/// Pairing them in a single entry removes any chance of the chunk and
/// embedding collections drifting out of alignment after construction.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// The in-memory corpus index.
///
/// Built once per corpus version, loaded read-only by the query path, and
/// never mutated in place. Concurrent reads are safe behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Index {
    model: String,
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Pair order-aligned chunk and embedding collections into an index.
    ///
    /// The input order is preserved; it is the only mapping from a
    /// similarity score back to its chunk.
    pub fn build(
        model: impl Into<String>,
        dimensions: usize,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, CorpusError> {
        if chunks.len() != embeddings.len() {
            return Err(CorpusError::LengthMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }
        for (index, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dimensions {
                return Err(CorpusError::DimensionMismatch {
                    index,
                    expected: dimensions,
                    actual: embedding.len(),
                });
            }
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();

        Ok(Self {
            model: model.into(),
            dimensions,
            entries,
        })
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn stats(&self, index_size_bytes: u64) -> IndexStats {
        let discourse_chunks = self
            .entries
            .iter()
            .filter(|e| matches!(e.chunk, Chunk::Discourse(_)))
            .count();

        IndexStats {
            total_chunks: self.entries.len(),
            discourse_chunks,
            course_chunks: self.entries.len() - discourse_chunks,
            model: self.model.clone(),
            dimensions: self.dimensions,
            index_size_bytes,
        }
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
