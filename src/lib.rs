/// News article similarity engine.
///
/// Fits a TF-IDF vector space over a corpus of articles, indexes it for
/// exhaustive cosine nearest-neighbor search and answers "articles similar to
/// article i" queries. The fitted model is persisted as three artifacts and
/// served over HTTP or the command line.
pub mod articles;
pub mod config;
pub mod error;
pub mod knn;
pub mod pipeline;
pub mod server;
pub mod utils;
pub mod vectorizer;

/// Error type and `Result` alias shared by every module
pub use error::{Error, Result};

/// TF-IDF Vectorizer
/// Learns a vocabulary and IDF weights from a corpus and maps any text to an
/// L2-normalized sparse vector over that vocabulary.
///
/// `TFIDFVectorizer<N, E>` has the following generic parameters:
/// - `N`: weight type (`f32`, `f64`)
/// - `E`: TF-IDF calculation engine (e.g. `DefaultTFIDFEngine`)
///
/// # Serialization
/// Supported (CBOR artifact `tfidf.cbor`).
pub use vectorizer::{TFIDFVectorizer, VectorizerConfig};

/// TF IDF Calculation Engine Trait
/// Implement it to plug another weighting strategy into `TFIDFVectorizer<N, E>`.
/// `DefaultTFIDFEngine` uses raw counts and smoothed idf.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Corpus statistics (document frequency, total count) used for IDF and
/// vocabulary selection
pub use vectorizer::corpus::Corpus;

/// Per-document term counts
pub use vectorizer::term::TermFrequency;

/// Sparse vector type used for every document vector
pub use utils::math::vector::SparseVec;

/// Nearest-neighbor index contract and the brute-force implementation
pub use knn::{BruteForceIndex, Neighbor, NeighborIndex};

/// Article table, keyword search hits
pub use articles::{search::SearchHit, ArticleTable, TextLayout};

/// Configuration
pub use config::Config;

/// Build and query pipelines
pub use pipeline::{build_artifacts, load_artifacts, recommend, Artifacts, Recommendation};
