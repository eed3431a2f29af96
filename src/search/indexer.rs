use std::sync::Arc;

use anyhow::Result;

use super::embedder::Embedder;
use super::store::{Chunk, Index};

const BATCH_SIZE: usize = 32;

/// Builds a fresh index from chunked documents.
///
/// Indexing failures are always fatal: if any batch fails to embed, the
/// whole build is abandoned and nothing is returned for persisting.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Embed all chunks in batches and pair them into an index.
    ///
    /// Embeddings come back in input order, batch by batch, keeping the
    /// chunk/vector alignment the index depends on.
    pub async fn build_index(&self, chunks: Vec<Chunk>) -> Result<Index> {
        let mut embeddings = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.content().to_string()).collect();
            let batch_embeddings = self.embedder.embed_batch(&texts).await?;
            embeddings.extend(batch_embeddings);
        }

        let index = Index::build(
            self.embedder.model(),
            self.embedder.dimensions(),
            chunks,
            embeddings,
        )?;

        Ok(index)
    }
}
