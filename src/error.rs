//! Error types for the similarity engine

use thiserror::Error;

/// Result type alias for news-similarity operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building artifacts or answering queries
#[derive(Error, Debug)]
pub enum Error {
    /// Artifacts are missing, unreadable or inconsistent. Run the build first.
    #[error("model not ready: {0}")]
    ModelNotReady(String),

    /// Requested article index is outside the corpus
    #[error("article index {idx} out of range (corpus has {len} articles)")]
    ArticleNotFound { idx: usize, len: usize },

    /// No term survived tokenization and stop-word filtering
    #[error("empty vocabulary: no terms left after filtering {docs} documents")]
    EmptyVocabulary { docs: usize },

    /// Input table has none of the recognized text columns
    #[error("no text columns found (expected one of {expected:?}, got {found:?})")]
    NoTextColumns {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// No input CSV was given or found
    #[error("no input data: {0}")]
    NoInputData(String),

    /// Row index outside the fitted matrix
    #[error("vector index {index} out of range ({rows} rows)")]
    IndexOutOfRange { index: usize, rows: usize },

    /// Neighbor count of zero
    #[error("invalid neighbor count {k}: must be at least 1")]
    InvalidNeighborCount { k: usize },

    /// Vector dimensionality differs from the fitted one
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration value rejected
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Cbor(#[from] serde_cbor::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// true for the "not ready" state, the only one recoverable by rebuilding
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Error::ModelNotReady(_))
    }
}
