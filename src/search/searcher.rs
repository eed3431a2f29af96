use std::sync::Arc;

use crate::config::SearchConfig;
use crate::error::EmbeddingError;

use super::embedder::Embedder;
use super::store::{cosine_similarity, Index, SearchResult};

/// Ranks index entries against a query by cosine similarity.
///
/// The index is read-only for the process lifetime, so a `Searcher` can
/// serve any number of concurrent queries without locking.
pub struct Searcher {
    index: Arc<Index>,
    embedder: Arc<dyn Embedder>,
    min_similarity: f32,
}

impl Searcher {
    pub fn new(index: Arc<Index>, embedder: Arc<dyn Embedder>, config: &SearchConfig) -> Self {
        Self {
            index,
            embedder,
            min_similarity: config.min_similarity,
        }
    }

    /// Embed the query and return the top `top_k` entries above the
    /// relevance floor, ordered by descending similarity.
    ///
    /// An empty result means nothing relevant was found; embedding
    /// failures surface as errors and are never mapped to empty results.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, EmbeddingError> {
        let query_embedding = self.embedder.embed(query).await?;
        Ok(rank(
            &self.index,
            &query_embedding,
            top_k,
            self.min_similarity,
        ))
    }
}

/// Brute-force rank: score every entry, stable-sort descending, truncate
/// to `top_k`, then drop scores at or below the floor.
///
/// The floor runs after truncation on purpose: a low-quality top-k
/// returns fewer (possibly zero) results instead of back-filling from
/// beyond the cutoff. Callers rely on that count contract.
pub fn rank(index: &Index, query: &[f32], top_k: usize, floor: f32) -> Vec<SearchResult> {
    let mut scored: Vec<(usize, f32)> = index
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| (i, cosine_similarity(query, &entry.embedding)))
        .collect();

    // Stable sort keeps original index order for equal scores, so results
    // are deterministic across calls.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    scored
        .into_iter()
        .filter(|(_, score)| passes_floor(*score, floor))
        .map(|(i, score)| SearchResult::new(index.entries()[i].chunk.clone(), score))
        .collect()
}

/// A score exactly at the floor is excluded.
fn passes_floor(score: f32, floor: f32) -> bool {
    score > floor
}
