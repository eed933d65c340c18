//! Per-query orchestration.
//!
//! [`SearchEngine`] owns an immutable [`Snapshot`] taken at construction:
//! catalogs, baseline counters keyed by entity name, article metadata and
//! sentiment. Searches share it without locking. [`SearchEngine::refresh`]
//! builds a new engine over a fresh snapshot; the old one keeps serving
//! until dropped.
//!
//! The association index is read again on every search. Ingestion may
//! commit between the snapshot and that read, so intersection counts can be
//! newer than the baselines they are divided by.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use evx_config::{EvidexConfig, SearchConfig};
use evx_core::entities::{ArticleMetadata, Association};
use evx_core::enums::EntityType;
use evx_core::query::normalize_query;
use evx_core::responses::{ItemMap, RpcResponse, SearchRequest, SearchResponse};
use evx_db::AssociationStore;
use evx_db::repos::BaselineCounters;
use evx_sources::ResourceFanout;

use crate::aggregate::aggregate;
use crate::catalog::{Catalog, Catalogs};
use crate::error::SearchError;
use crate::filter::{FilterSettings, filter};
use crate::metrics::score;
use crate::overrides::OverrideTable;

// ── Snapshot ───────────────────────────────────────────────────────

/// Read-only state shared by every search of one engine instance.
#[derive(Debug)]
pub struct Snapshot {
    catalogs: Arc<Catalogs>,
    drug_baseline: HashMap<String, u64>,
    target_baseline: HashMap<String, u64>,
    articles: HashMap<String, ArticleMetadata>,
    sentiments: HashMap<String, f64>,
}

impl Snapshot {
    /// Read baselines, article metadata and sentiment from the store.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Database`] if any read fails.
    pub async fn load(store: &AssociationStore, catalogs: Arc<Catalogs>) -> Result<Self, SearchError> {
        let counters = store.baseline_counters().await?;
        let articles = store.titles_and_metadata(None).await?;
        let sentiments = store.sentiments(None).await?;
        let snapshot = Self::from_parts(catalogs, &counters, articles, sentiments);
        tracing::info!(
            drugs = snapshot.drug_baseline.len(),
            targets = snapshot.target_baseline.len(),
            articles = snapshot.articles.len(),
            sentiments = snapshot.sentiments.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    #[must_use]
    pub fn from_parts(
        catalogs: Arc<Catalogs>,
        counters: &BaselineCounters,
        articles: HashMap<String, ArticleMetadata>,
        sentiments: HashMap<String, f64>,
    ) -> Self {
        Self {
            drug_baseline: baseline_by_name(counters, &catalogs.drugs),
            target_baseline: baseline_by_name(counters, &catalogs.targets),
            catalogs,
            articles,
            sentiments,
        }
    }

    #[must_use]
    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Baseline counters of one entity type, keyed by entity name.
    #[must_use]
    pub const fn baseline(&self, entity_type: EntityType) -> &HashMap<String, u64> {
        match entity_type {
            EntityType::Drug => &self.drug_baseline,
            EntityType::Target => &self.target_baseline,
        }
    }

    #[must_use]
    pub const fn articles(&self) -> &HashMap<String, ArticleMetadata> {
        &self.articles
    }

    #[must_use]
    pub const fn sentiments(&self) -> &HashMap<String, f64> {
        &self.sentiments
    }
}

/// Re-key store counters by catalog name. Ids outside the catalog (e.g.
/// drugs excluded by the catalog filter) have no baseline.
fn baseline_by_name(counters: &BaselineCounters, catalog: &Catalog) -> HashMap<String, u64> {
    counters
        .iter()
        .filter(|((_, ty), _)| *ty == catalog.entity_type())
        .filter_map(|((id, _), count)| {
            catalog
                .get(id)
                .map(|entity| (entity.name.clone(), *count))
        })
        .collect()
}

// ── Engine ─────────────────────────────────────────────────────────

pub struct SearchEngine {
    store: Arc<AssociationStore>,
    fanout: Arc<ResourceFanout>,
    snapshot: Arc<Snapshot>,
    overrides: OverrideTable,
    filter: FilterSettings,
    use_query_cache: bool,
}

impl SearchEngine {
    /// Build an engine, taking the snapshot from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Database`] if the snapshot cannot be read.
    pub async fn new(
        store: Arc<AssociationStore>,
        fanout: Arc<ResourceFanout>,
        catalogs: Catalogs,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        let snapshot = Snapshot::load(&store, Arc::new(catalogs)).await?;
        Ok(Self {
            store,
            fanout,
            snapshot: Arc::new(snapshot),
            overrides: OverrideTable::from_config(&config.overrides),
            filter: FilterSettings::from_config(config),
            use_query_cache: config.use_query_cache,
        })
    }

    /// Open the store, providers and catalogs named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if any of them cannot be opened or loaded.
    pub async fn from_config(config: &EvidexConfig) -> Result<Self, SearchError> {
        let store = AssociationStore::open_local(&config.database.path).await?;
        let fanout = ResourceFanout::from_config(&config.sources)?;
        let catalogs = Catalogs::load(&config.catalogs)?;
        Self::new(Arc::new(store), Arc::new(fanout), catalogs, &config.search).await
    }

    /// A new engine over a fresh snapshot. `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Database`] if the snapshot cannot be read.
    pub async fn refresh(&self) -> Result<Self, SearchError> {
        let snapshot = Snapshot::load(&self.store, Arc::clone(&self.snapshot.catalogs)).await?;
        tracing::info!("snapshot refreshed");
        Ok(Self {
            store: Arc::clone(&self.store),
            fanout: Arc::clone(&self.fanout),
            snapshot: Arc::new(snapshot),
            overrides: self.overrides.clone(),
            filter: self.filter,
            use_query_cache: self.use_query_cache,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn default_limit(&self) -> usize {
        self.filter.limit
    }

    /// Rank drugs and targets for `query`.
    ///
    /// Returns `{drugs: {}, targets: {}}` without reading the association
    /// index when no candidate articles are found. A query with no
    /// searchable text has no candidates and is not sent to the sources.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Source`] / [`SearchError::Database`] when
    /// resolution or the index read fails, and
    /// [`SearchError::ResponseTooLarge`] from the filter.
    pub async fn search(
        &self,
        query: &str,
        do_filter: bool,
        include_detail: bool,
        limit: usize,
    ) -> Result<SearchResponse, SearchError> {
        if normalize_query(query).is_empty() {
            tracing::debug!(query, "blank query");
            return Ok(SearchResponse::empty());
        }

        let candidates = self.candidates(query).await?;
        if candidates.is_empty() {
            tracing::debug!(query, "no candidate articles");
            return Ok(SearchResponse::empty());
        }

        let associations = self.store.associations_for_articles(Some(&candidates)).await?;
        let query_count = candidates.len() as u64;

        let mut drugs = self.score_type(EntityType::Drug, &associations, query_count, include_detail);
        self.overrides.apply(query, &mut drugs);
        let mut targets =
            self.score_type(EntityType::Target, &associations, query_count, include_detail);

        if do_filter {
            let settings = self.filter.with_limit(limit);
            drugs = filter(drugs, &settings)?;
            targets = filter(targets, &settings)?;
        }

        tracing::debug!(
            query,
            candidates = query_count,
            associations = associations.len(),
            drugs = drugs.len(),
            targets = targets.len(),
            "search complete"
        );
        Ok(SearchResponse { drugs, targets })
    }

    /// Serve one RPC request. Failures become `{code: 0, result: message}`.
    pub async fn handle(&self, request: &SearchRequest) -> RpcResponse {
        match self
            .search(
                &request.query,
                request.apply_filter,
                request.include_pmids_per_item,
                self.default_limit(),
            )
            .await
        {
            Ok(response) => RpcResponse::success(response),
            Err(e) => {
                tracing::warn!(query = %request.query, %e, "search failed");
                RpcResponse::failure(e.to_string())
            }
        }
    }

    async fn candidates(&self, query: &str) -> Result<HashSet<String>, SearchError> {
        if self.use_query_cache {
            if let Some(ids) = self.store.popular_query(query).await? {
                tracing::debug!(query, ids = ids.len(), "query cache hit");
                return Ok(ids.into_iter().collect());
            }
        }
        let resolution = self.fanout.resolve_ids(query).await?;
        tracing::debug!(statuses = ?resolution.statuses, "sources resolved");
        Ok(resolution.ids)
    }

    fn score_type(
        &self,
        entity_type: EntityType,
        associations: &[Association],
        query_count: u64,
        include_detail: bool,
    ) -> ItemMap {
        let snapshot = &self.snapshot;
        let aggregates = aggregate(
            associations,
            snapshot.catalogs.get(entity_type),
            include_detail.then_some(&snapshot.articles),
        );
        score(
            query_count,
            aggregates,
            snapshot.baseline(entity_type),
            &snapshot.sentiments,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evx_core::entities::Entity;
    use evx_core::responses::{CODE_FAILURE, RpcResult};
    use pretty_assertions::assert_eq;

    fn catalogs() -> Catalogs {
        let entity = |id: &str, name: &str, entity_type| Entity {
            id: id.into(),
            name: name.into(),
            entity_type,
        };
        Catalogs {
            drugs: Catalog::from_entities(
                EntityType::Drug,
                vec![entity("DB1", "Favipiravir", EntityType::Drug)],
            ),
            targets: Catalog::from_entities(
                EntityType::Target,
                vec![entity("P1", "Spike glycoprotein", EntityType::Target)],
            ),
        }
    }

    async fn engine() -> SearchEngine {
        engine_with(&SearchConfig::default()).await
    }

    async fn engine_with(config: &SearchConfig) -> SearchEngine {
        let store = AssociationStore::open_local(":memory:").await.unwrap();
        store
            .insert_associations(&[
                Association {
                    article_id: "1".into(),
                    entity_id: "DB1".into(),
                    entity_type: EntityType::Drug,
                    source: "PubMed".into(),
                },
                Association {
                    article_id: "2".into(),
                    entity_id: "DB404".into(),
                    entity_type: EntityType::Drug,
                    source: "PubMed".into(),
                },
            ])
            .await
            .unwrap();
        let fanout = ResourceFanout::new(Vec::new(), evx_config::FanoutPolicy::FailFast, None);
        SearchEngine::new(
            Arc::new(store),
            Arc::new(fanout),
            catalogs(),
            config,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn snapshot_keys_baselines_by_name() {
        let engine = engine().await;
        let drugs = engine.snapshot().baseline(EntityType::Drug);
        assert_eq!(drugs.get("Favipiravir"), Some(&1));
        assert_eq!(drugs.len(), 1);
        assert!(engine.snapshot().baseline(EntityType::Target).is_empty());
    }

    #[tokio::test]
    async fn blank_query_gives_empty_ranking() {
        let engine = engine().await;
        for query in ["?!", "   ", ""] {
            let response = engine.search(query, true, false, 50).await.unwrap();
            assert_eq!(response, SearchResponse::empty());
        }

        let envelope = engine
            .handle(&SearchRequest {
                query: " ?! ".into(),
                apply_filter: true,
                include_pmids_per_item: false,
            })
            .await;
        assert_eq!(envelope, RpcResponse::success(SearchResponse::empty()));
    }

    #[tokio::test]
    async fn handle_maps_errors_to_failure_envelope() {
        let config = SearchConfig {
            use_query_cache: true,
            ..SearchConfig::default()
        };
        let engine = engine_with(&config).await;
        engine
            .store
            .put_popular_query("favipiravir", &["1".to_string()])
            .await
            .unwrap();
        engine
            .store
            .conn()
            .execute("DROP TABLE article_items", ())
            .await
            .unwrap();

        let response = engine
            .handle(&SearchRequest {
                query: "favipiravir".into(),
                apply_filter: true,
                include_pmids_per_item: false,
            })
            .await;
        assert_eq!(response.code, CODE_FAILURE);
        assert!(matches!(response.result, RpcResult::Error(ref m) if m.contains("database error")));
    }

    #[tokio::test]
    async fn no_sources_means_empty_ranking() {
        let engine = engine().await;
        let response = engine.search("covid", true, false, 50).await.unwrap();
        assert_eq!(response, SearchResponse::empty());
    }

    #[tokio::test]
    async fn refresh_sees_new_associations() {
        let engine = engine().await;
        engine
            .store
            .insert_associations(&[Association {
                article_id: "3".into(),
                entity_id: "DB1".into(),
                entity_type: EntityType::Drug,
                source: "Crossref".into(),
            }])
            .await
            .unwrap();
        assert_eq!(engine.snapshot().baseline(EntityType::Drug)["Favipiravir"], 1);

        let refreshed = engine.refresh().await.unwrap();
        assert_eq!(refreshed.snapshot().baseline(EntityType::Drug)["Favipiravir"], 2);
        assert_eq!(engine.snapshot().baseline(EntityType::Drug)["Favipiravir"], 1);
    }
}
