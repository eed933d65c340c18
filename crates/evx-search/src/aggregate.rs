//! Groups query associations per entity.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use evx_core::entities::{ArticleMetadata, Association};
use evx_core::responses::ArticleDetail;

use crate::catalog::Catalog;

/// Query-intersection data for one entity, before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAggregate {
    pub entity_id: String,
    /// Distinct query articles associated with the entity (TP).
    pub counter: u64,
    /// Those articles, ordered by id.
    pub article_ids: Vec<String>,
    /// Resolved metadata per article; empty unless requested.
    pub details: Vec<ArticleDetail>,
}

/// Aggregates keyed by entity display name.
pub type AggregateMap = BTreeMap<String, ItemAggregate>;

/// Presentation record for one article. Missing metadata degrades to empty
/// fields instead of failing.
#[must_use]
pub fn article_detail(article_id: &str, metadata: Option<&ArticleMetadata>) -> ArticleDetail {
    let Some(meta) = metadata else {
        return ArticleDetail {
            pmid: article_id.to_string(),
            ..ArticleDetail::default()
        };
    };
    let pdf_url = meta.pdf_url();
    ArticleDetail {
        pmid: article_id.to_string(),
        title: meta.title.clone().unwrap_or_default(),
        db_name: meta.source.clone(),
        url: meta.canonical_url(),
        has_pdf: pdf_url.is_some(),
        pdf_url: pdf_url.unwrap_or_default(),
    }
}

/// Group `associations` of the catalog's entity type by entity.
///
/// Rows of the other type are ignored. Entity ids missing from the catalog
/// are logged and skipped. When `metadata` is given each aggregate also
/// carries one [`ArticleDetail`] per article.
#[must_use]
pub fn aggregate(
    associations: &[Association],
    catalog: &Catalog,
    metadata: Option<&HashMap<String, ArticleMetadata>>,
) -> AggregateMap {
    let entity_type = catalog.entity_type();

    let mut by_id: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for a in associations.iter().filter(|a| a.entity_type == entity_type) {
        by_id
            .entry(a.entity_id.as_str())
            .or_default()
            .insert(a.article_id.as_str());
    }

    let mut by_name: BTreeMap<String, (&str, BTreeSet<&str>)> = BTreeMap::new();
    let mut unknown = 0usize;
    for (id, articles) in by_id {
        match catalog.name_of(id) {
            Ok(name) => {
                let entry = by_name
                    .entry(name.to_string())
                    .or_insert_with(|| (id, BTreeSet::new()));
                entry.1.extend(articles);
            }
            Err(e) => {
                unknown += 1;
                tracing::debug!(%e, "skipping entity");
            }
        }
    }
    if unknown > 0 {
        tracing::warn!(%entity_type, unknown, "associations reference entities missing from the catalog");
    }

    let out: AggregateMap = by_name
        .into_iter()
        .map(|(name, (id, articles))| {
            let details = metadata.map_or_else(Vec::new, |meta| {
                articles
                    .iter()
                    .map(|article| article_detail(article, meta.get(*article)))
                    .collect()
            });
            let aggregate = ItemAggregate {
                entity_id: id.to_string(),
                counter: articles.len() as u64,
                article_ids: articles.into_iter().map(str::to_string).collect(),
                details,
            };
            (name, aggregate)
        })
        .collect();

    tracing::debug!(%entity_type, entities = out.len(), "aggregated");
    out
}
