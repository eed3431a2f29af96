mod ollama;

pub use ollama::OllamaEmbedder;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EmbedderConfig;
use crate::error::EmbeddingError;

/// Maps text to fixed-dimension dense vectors.
///
/// One instance is constructed at process start and shared by the index
/// build and query paths, so corpus and query vectors always come from
/// the same model.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
    fn dimensions(&self) -> usize;
    fn model(&self) -> &str;
    async fn health_check(&self) -> Result<(), EmbeddingError>;
}

pub fn create_embedder(config: &EmbedderConfig) -> Arc<dyn Embedder> {
    Arc::new(OllamaEmbedder::new(
        &config.endpoint,
        &config.model,
        config.dimensions,
    ))
}
