//! Errors raised by the association store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A query failed or returned data that could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A row or input value violates a table invariant (unknown entity
    /// type, negative count, sentiment outside `[-1, 1]`).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
