pub mod chunker;
pub mod embedder;
pub mod indexer;
pub mod searcher;
pub mod store;

pub use chunker::Chunker;
pub use embedder::{create_embedder, Embedder, OllamaEmbedder};
pub use indexer::Indexer;
pub use searcher::Searcher;
pub use store::{
    Chunk, CourseChunk, DiscourseChunk, Index, IndexEntry, IndexStats, IndexStore, SearchResult,
};
