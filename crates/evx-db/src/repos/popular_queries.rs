//! Popular-query cache: normalized query text → candidate article ids.

use evx_core::query::normalize_query;

use crate::AssociationStore;
use crate::error::DatabaseError;

impl AssociationStore {
    /// Cached candidate ids for `query`, looked up by its normalized form.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the stored id list is
    /// not a JSON array of strings.
    pub async fn popular_query(&self, query: &str) -> Result<Option<Vec<String>>, DatabaseError> {
        let key = normalize_query(query);
        let mut rows = self
            .conn()
            .query(
                "SELECT pmids FROM popular_queries WHERE query = ?1",
                [key.as_str()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let raw = row.get::<String>(0)?;
        let ids: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| DatabaseError::Query(format!("Invalid JSON in popular_queries: {e}")))?;
        Ok(Some(ids))
    }

    /// Store candidate ids for `query` under its normalized form.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails.
    pub async fn put_popular_query(&self, query: &str, ids: &[String]) -> Result<(), DatabaseError> {
        let key = normalize_query(query);
        let raw = serde_json::to_string(ids).map_err(|e| DatabaseError::Other(e.into()))?;
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO popular_queries (query, pmids) VALUES (?1, ?2)",
                libsql::params![key.as_str(), raw.as_str()],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_uses_normalized_key() {
        let store = AssociationStore::open_local(":memory:").await.unwrap();
        store
            .put_popular_query("Molnupiravir,  Omicron!", &["1".into(), "2".into()])
            .await
            .unwrap();

        let hit = store.popular_query("molnupiravir omicron").await.unwrap();
        assert_eq!(hit, Some(vec!["1".to_string(), "2".to_string()]));
        assert_eq!(store.popular_query("molnupiravir").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_cache_row_is_an_error() {
        let store = AssociationStore::open_local(":memory:").await.unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO popular_queries (query, pmids) VALUES ('x', 'not json')",
                (),
            )
            .await
            .unwrap();
        assert!(matches!(
            store.popular_query("x").await,
            Err(DatabaseError::Query(_))
        ));
    }
}
