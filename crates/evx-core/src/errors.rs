//! Cross-cutting error types for Evidex.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `SourceError`) are defined in
//! their respective crates. The errors here are raised per entity while a
//! search is being scored and are isolated by the caller: one bad entity is
//! logged and skipped, never fatal to the whole query.

use thiserror::Error;

use crate::enums::EntityType;

/// Errors that can be raised by any Evidex crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An association references an entity id missing from the catalog.
    #[error("Unknown entity: {entity_type} {id}")]
    UnknownEntity { entity_type: EntityType, id: String },

    /// A metric denominator was zero for an entity.
    #[error("Division by zero computing {metric} for '{entity}'")]
    DivisionByZero { entity: String, metric: &'static str },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
