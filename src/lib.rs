pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod respond;
pub mod search;

pub use config::Config;
pub use error::{CorpusError, EmbeddingError};
pub use respond::{assemble, no_information_response, Link, Response};
pub use search::{Chunk, Chunker, Index, IndexStore, Indexer, SearchResult, Searcher};
