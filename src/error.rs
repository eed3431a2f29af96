use std::path::PathBuf;

use thiserror::Error;

/// Failures loading or validating the persisted corpus index.
///
/// All of these are fatal at startup: the serving path must refuse to
/// answer queries rather than rank against a half-loaded index.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("index file not found at {}. Run `course-ta process` first to build the index", .0.display())]
    Missing(PathBuf),

    #[error("failed to read index file: {0}")]
    Io(#[from] std::io::Error),

    #[error("index file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("index is corrupt: {chunks} chunks but {embeddings} embeddings")]
    LengthMismatch { chunks: usize, embeddings: usize },

    #[error("embedding {index} has {actual} dimensions, index declares {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "index was built with model '{indexed}' ({indexed_dims} dims) but the configured \
         embedder is '{configured}' ({configured_dims} dims); rebuild the index"
    )]
    ModelMismatch {
        indexed: String,
        indexed_dims: usize,
        configured: String,
        configured_dims: usize,
    },
}

/// Failures talking to the embedding backend.
///
/// At build time the whole build aborts and nothing is persisted; at query
/// time the failure propagates to the caller as-is. It is never converted
/// into an empty result set.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot connect to embedding backend at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("embedding model '{0}' not available on the backend")]
    ModelUnavailable(String),

    #[error("embedding backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("embedding backend returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
