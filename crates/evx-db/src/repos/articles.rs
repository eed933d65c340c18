//! Article metadata (title, url, full-text id).

use std::collections::{HashMap, HashSet};

use evx_core::entities::ArticleMetadata;

use crate::AssociationStore;
use crate::error::DatabaseError;
use crate::helpers::{ID_CHUNK_SIZE, get_opt_string, placeholders, sorted_ids};

const SELECT_TITLES: &str = "SELECT pmid, db_name, url, title, pmcid FROM article_titles";

fn row_to_article(row: &libsql::Row) -> Result<ArticleMetadata, DatabaseError> {
    Ok(ArticleMetadata {
        id: row.get::<String>(0)?,
        source: get_opt_string(row, 1)?.unwrap_or_default(),
        url: get_opt_string(row, 2)?,
        title: get_opt_string(row, 3)?,
        full_text_id: get_opt_string(row, 4)?,
    })
}

impl AssociationStore {
    /// Metadata keyed by article id. `None` loads the whole table.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn titles_and_metadata(
        &self,
        article_ids: Option<&HashSet<String>>,
    ) -> Result<HashMap<String, ArticleMetadata>, DatabaseError> {
        let mut out = HashMap::new();
        match article_ids {
            None => self.collect_articles(SELECT_TITLES, Vec::new(), &mut out).await?,
            Some(ids) => {
                for chunk in sorted_ids(ids).chunks(ID_CHUNK_SIZE) {
                    let sql = format!(
                        "{SELECT_TITLES} WHERE pmid IN ({})",
                        placeholders(chunk.len())
                    );
                    self.collect_articles(&sql, chunk.to_vec(), &mut out).await?;
                }
            }
        }
        Ok(out)
    }

    async fn collect_articles(
        &self,
        sql: &str,
        params: Vec<String>,
        out: &mut HashMap<String, ArticleMetadata>,
    ) -> Result<(), DatabaseError> {
        let mut rows = self
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        while let Some(row) = rows.next().await? {
            let article = row_to_article(&row)?;
            out.insert(article.id.clone(), article);
        }
        Ok(())
    }

    /// Insert or replace article metadata in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert or the commit fails.
    pub async fn insert_articles(&self, articles: &[ArticleMetadata]) -> Result<(), DatabaseError> {
        let tx = self.conn().transaction().await?;
        for a in articles {
            tx.execute(
                "INSERT OR REPLACE INTO article_titles (pmid, db_name, url, title, pmcid)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    a.id.as_str(),
                    a.source.as_str(),
                    a.url.as_deref(),
                    a.title.as_deref(),
                    a.full_text_id.as_deref()
                ],
            )
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
