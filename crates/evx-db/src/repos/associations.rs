//! Article ↔ entity associations and baseline counters.

use std::collections::{HashMap, HashSet};

use evx_core::entities::Association;
use evx_core::enums::EntityType;

use crate::AssociationStore;
use crate::error::DatabaseError;
use crate::helpers::{ID_CHUNK_SIZE, count_to_u64, parse_entity_type, placeholders, sorted_ids};

/// Distinct-article count per `(entity_id, entity_type)` across the whole index.
pub type BaselineCounters = HashMap<(String, EntityType), u64>;

const SELECT_ASSOCIATIONS: &str = "SELECT pmid, db_name, item_id, item_type FROM article_items";

fn row_to_association(row: &libsql::Row) -> Result<Association, DatabaseError> {
    Ok(Association {
        article_id: row.get::<String>(0)?,
        source: row.get::<String>(1)?,
        entity_id: row.get::<String>(2)?,
        entity_type: parse_entity_type(&row.get::<String>(3)?)?,
    })
}

impl AssociationStore {
    /// Every association whose article id is in `article_ids`.
    ///
    /// `None` returns the whole table (startup use only); `Some` of an empty
    /// set returns nothing. Large sets are queried in chunks.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row holds an unknown
    /// entity type.
    pub async fn associations_for_articles(
        &self,
        article_ids: Option<&HashSet<String>>,
    ) -> Result<Vec<Association>, DatabaseError> {
        let Some(article_ids) = article_ids else {
            let sql = format!("{SELECT_ASSOCIATIONS} ORDER BY pmid, item_id");
            return self.query_associations(&sql, Vec::new()).await;
        };

        let ids = sorted_ids(article_ids);
        let mut out = Vec::new();
        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let sql = format!(
                "{SELECT_ASSOCIATIONS} WHERE pmid IN ({}) ORDER BY pmid, item_id",
                placeholders(chunk.len())
            );
            out.extend(self.query_associations(&sql, chunk.to_vec()).await?);
        }
        tracing::debug!(
            candidates = ids.len(),
            associations = out.len(),
            "associations fetched"
        );
        Ok(out)
    }

    async fn query_associations(
        &self,
        sql: &str,
        params: Vec<String>,
    ) -> Result<Vec<Association>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_association(&row)?);
        }
        Ok(out)
    }

    /// Total distinct-article count per entity across the whole index.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the aggregation query fails.
    pub async fn baseline_counters(&self) -> Result<BaselineCounters, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT item_id, item_type, COUNT(DISTINCT pmid)
                 FROM article_items
                 GROUP BY item_id, item_type",
                (),
            )
            .await?;

        let mut counters = HashMap::new();
        while let Some(row) = rows.next().await? {
            let entity_id = row.get::<String>(0)?;
            let entity_type = parse_entity_type(&row.get::<String>(1)?)?;
            let count = count_to_u64(row.get::<i64>(2)?)?;
            counters.insert((entity_id, entity_type), count);
        }
        Ok(counters)
    }

    /// Insert or replace association edges in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert or the commit fails.
    pub async fn insert_associations(
        &self,
        associations: &[Association],
    ) -> Result<(), DatabaseError> {
        let tx = self.conn().transaction().await?;
        for a in associations {
            tx.execute(
                "INSERT OR REPLACE INTO article_items (pmid, db_name, item_id, item_type)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    a.article_id.as_str(),
                    a.source.as_str(),
                    a.entity_id.as_str(),
                    a.entity_type.as_str()
                ],
            )
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
