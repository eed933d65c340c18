//! Per-article sentiment scores written by the scoring batch job.

use std::collections::{HashMap, HashSet};

use crate::AssociationStore;
use crate::error::DatabaseError;
use crate::helpers::{ID_CHUNK_SIZE, placeholders, sorted_ids};

const SELECT_SENTIMENTS: &str = "SELECT pmid, sentiment_score FROM article_sentiments";

impl AssociationStore {
    /// Sentiment in `[-1, 1]` keyed by article id. `None` loads the whole
    /// table. Rows with a NULL score are omitted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn sentiments(
        &self,
        article_ids: Option<&HashSet<String>>,
    ) -> Result<HashMap<String, f64>, DatabaseError> {
        let mut out = HashMap::new();
        match article_ids {
            None => {
                self.collect_sentiments(SELECT_SENTIMENTS, Vec::new(), &mut out)
                    .await?;
            }
            Some(ids) => {
                for chunk in sorted_ids(ids).chunks(ID_CHUNK_SIZE) {
                    let sql = format!(
                        "{SELECT_SENTIMENTS} WHERE pmid IN ({})",
                        placeholders(chunk.len())
                    );
                    self.collect_sentiments(&sql, chunk.to_vec(), &mut out).await?;
                }
            }
        }
        Ok(out)
    }

    async fn collect_sentiments(
        &self,
        sql: &str,
        params: Vec<String>,
        out: &mut HashMap<String, f64>,
    ) -> Result<(), DatabaseError> {
        let mut rows = self
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        while let Some(row) = rows.next().await? {
            if let Some(score) = row.get::<Option<f64>>(1)? {
                out.insert(row.get::<String>(0)?, score);
            }
        }
        Ok(())
    }

    /// Insert or replace sentiment scores in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for a score outside `[-1, 1]`,
    /// or `DatabaseError` if an insert or the commit fails.
    pub async fn insert_sentiments(&self, scores: &[(String, f64)]) -> Result<(), DatabaseError> {
        if let Some((id, score)) = scores.iter().find(|(_, s)| !(-1.0..=1.0).contains(s)) {
            return Err(DatabaseError::InvalidState(format!(
                "sentiment {score} for article {id} is outside [-1, 1]"
            )));
        }

        let tx = self.conn().transaction().await?;
        for (id, score) in scores {
            tx.execute(
                "INSERT OR REPLACE INTO article_sentiments (pmid, sentiment_score) VALUES (?1, ?2)",
                libsql::params![id.as_str(), *score],
            )
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_scores_and_skips_nulls() {
        let store = AssociationStore::open_local(":memory:").await.unwrap();
        store
            .insert_sentiments(&[("1".into(), 0.5), ("2".into(), -0.25)])
            .await
            .unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO article_sentiments (pmid, sentiment_score) VALUES ('3', NULL)",
                (),
            )
            .await
            .unwrap();

        let all = store.sentiments(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!((all["2"] + 0.25).abs() < f64::EPSILON);

        let ids: HashSet<String> = ["1".to_string(), "3".to_string()].into();
        let some = store.sentiments(Some(&ids)).await.unwrap();
        assert_eq!(some.len(), 1);
        assert!((some["1"] - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn rejects_out_of_range_scores() {
        let store = AssociationStore::open_local(":memory:").await.unwrap();
        let err = store
            .insert_sentiments(&[("1".into(), 1.5)])
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
        assert!(store.sentiments(None).await.unwrap().is_empty());
    }
}
