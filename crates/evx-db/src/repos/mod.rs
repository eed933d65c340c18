//! Query and insert methods on [`crate::AssociationStore`], one module per table.
//!
//! Each module adds methods via `impl AssociationStore` blocks.

pub mod articles;
pub mod associations;
pub mod popular_queries;
pub mod sentiments;

pub use associations::BaselineCounters;
