mod openai;

pub use openai::OpenAiGenerator;

use anyhow::Result;
use async_trait::async_trait;

use crate::search::store::Chunk;

/// Produces a free-text answer from a question and retrieved context.
///
/// The retrieval core only supplies and bounds the context; the prompt
/// and model choice live behind this trait.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(
        &self,
        question: &str,
        context: &[Chunk],
        image: Option<&str>,
    ) -> Result<String>;
}
