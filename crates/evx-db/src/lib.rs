//! # evx-db
//!
//! libSQL association index for Evidex.
//!
//! Holds article ↔ entity associations, article metadata, per-article
//! sentiment, and the popular-query cache. The search path only reads;
//! the insert methods exist for ingestion collaborators and fixtures.
//!
//! Reads are not isolated across calls: ingestion may commit between the
//! baseline snapshot and a later intersection query, so counters used for
//! precision/recall can come from slightly different points in time.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use error::DatabaseError;
use libsql::Builder;

/// Handle to the association index.
///
/// Wraps a libSQL database and connection. All query methods live in
/// [`repos`] as `impl AssociationStore` blocks.
pub struct AssociationStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl AssociationStore {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Creates the schema if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(path, "association index opened");
        Ok(store)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
