//! Search error types for evx-search.

/// Errors that abort a whole search.
///
/// Per-entity problems (unknown ids, zero baselines) are not represented
/// here; they are logged and the entity is dropped.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A literature provider failed under the fail-fast policy.
    #[error("source error: {0}")]
    Source(#[from] evx_sources::SourceError),

    /// Error from the association index.
    #[error("database error: {0}")]
    Database(#[from] evx_db::error::DatabaseError),

    /// An entity catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// The result still exceeds the size cap with every detail list empty.
    #[error("response too large: {bytes} bytes exceeds {limit}")]
    ResponseTooLarge {
        /// Serialized size after shrinking.
        bytes: usize,
        /// Configured cap in bytes.
        limit: usize,
    },

    /// A result map could not be serialized for size measurement.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
