//! # evx-core
//!
//! Core types, query normalization, and error types for Evidex.
//!
//! This crate provides the foundational types shared across all Evidex crates:
//! - Entity, article, and association records
//! - Entity-type and article-source enums (with per-source URL templates)
//! - Query text normalization used for cache keys and keyword matching
//! - Scored search response types and the RPC envelope
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod query;
pub mod responses;

pub use errors::CoreError;
