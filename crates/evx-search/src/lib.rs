//! # evx-search
//!
//! Evidence ranking for Evidex.
//!
//! A query flows through:
//! - [`evx_sources::ResourceFanout`] for the candidate article ids
//! - [`evx_db::AssociationStore`] for the associations of those articles
//! - [`aggregate`] grouping associations per entity
//! - [`metrics`] scoring each entity against its baseline
//! - [`overrides`] applying the configured business overrides (drugs only)
//! - [`filter`] dropping low-precision outliers and bounding the response
//!
//! [`engine::SearchEngine`] wires these together and owns the immutable
//! snapshot (catalogs, baselines, article metadata, sentiment) they read.

pub mod aggregate;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod overrides;

pub use engine::{SearchEngine, Snapshot};
pub use error::SearchError;
