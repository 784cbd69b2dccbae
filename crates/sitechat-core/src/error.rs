//! Error kinds surfaced by the retrieval core.
//!
//! Every variant propagates to the caller unchanged. The core never serves a
//! partially built or stale index in place of an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected settings, e.g. a chunk overlap that is not smaller than the window.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The embedding backend could not be constructed. Fatal, not retried.
    #[error("Failed to load embedding model: {0}")]
    ModelLoad(String),

    /// A vector whose length differs from the corpus dimension.
    #[error("Dimension mismatch at position {position}: expected {expected}, got {actual}")]
    DimensionMismatch { position: usize, expected: usize, actual: usize },

    /// The corpus text file could not be read or is not UTF-8.
    #[error("Cannot read corpus {}: {source}", .path.display())]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("Store {} is corrupt: {reason}", .path.display())]
    StoreCorrupt { path: PathBuf, reason: String },

    /// Chunks and embeddings in a store are not position-aligned.
    #[error("Store {} is inconsistent: {reason}", .path.display())]
    StoreInconsistent { path: PathBuf, reason: String },

    /// Index and chunk sequence disagree at query time. Indicates a bug.
    #[error("Search failed: {0}")]
    Search(String),

    /// Inference failed on an already loaded model.
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
