//! Search response types and the RPC envelope.
//!
//! Field names follow the wire format existing consumers already parse
//! (`item_pmids`, `Precision`, `F-0.5`, ...), hence the serde renames.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One article attached to a ranked entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct ArticleDetail {
    pub pmid: String,
    pub title: String,
    pub db_name: String,
    pub url: String,
    pub has_pdf: bool,
    pub pdf_url: String,
}

/// Precision/recall scores for one entity against one query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Metrics {
    /// Articles matching both the query and the entity (TP).
    #[serde(rename = "(Search + {}) Publications")]
    pub query_publications: u64,
    /// All articles associated with the entity (baseline counter).
    #[serde(rename = "{} Publications")]
    pub total_publications: u64,
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "F-0.5")]
    pub f_beta: f64,
    pub sentiment: f64,
    pub ranking_score: f64,
}

/// A scored entity as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoredItem {
    /// Distinct query articles associated with the entity.
    pub counter: u64,
    /// Article detail; empty unless requested.
    #[serde(default)]
    pub item_pmids: Vec<ArticleDetail>,
    pub metrics: Metrics,
}

/// Scored entities keyed by catalog name.
pub type ItemMap = BTreeMap<String, ScoredItem>;

/// Ranking for one query, split by entity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SearchResponse {
    pub drugs: ItemMap,
    pub targets: ItemMap,
}

impl SearchResponse {
    /// The `{drugs: {}, targets: {}}` result.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty() && self.targets.is_empty()
    }

    /// Drugs ordered by descending ranking score, ties by name.
    #[must_use]
    pub fn ranked_drugs(&self) -> Vec<(&str, &ScoredItem)> {
        ranked(&self.drugs)
    }

    /// Targets ordered by descending ranking score, ties by name.
    #[must_use]
    pub fn ranked_targets(&self) -> Vec<(&str, &ScoredItem)> {
        ranked(&self.targets)
    }
}

/// Order an item map by descending ranking score. The sort is stable over
/// the map's name order, so equal scores stay alphabetical.
#[must_use]
pub fn ranked(items: &ItemMap) -> Vec<(&str, &ScoredItem)> {
    let mut out: Vec<(&str, &ScoredItem)> =
        items.iter().map(|(k, v)| (k.as_str(), v)).collect();
    out.sort_by(|a, b| b.1.metrics.ranking_score.total_cmp(&a.1.metrics.ranking_score));
    out
}

/// Upstream request for one search.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_true", alias = "filter1")]
    pub apply_filter: bool,
    #[serde(default, alias = "add_pmids1")]
    pub include_pmids_per_item: bool,
}

const fn default_true() -> bool {
    true
}

/// Status code for a successful search.
pub const CODE_OK: u16 = 200;
/// Status code for a failed search. Callers branch on this.
pub const CODE_FAILURE: u16 = 0;

/// Payload of the RPC envelope: a ranking on success, a message on failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum RpcResult {
    Ranking(SearchResponse),
    Error(String),
}

/// `{code, result}` envelope returned by the RPC adapter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RpcResponse {
    pub code: u16,
    pub result: RpcResult,
}

impl RpcResponse {
    #[must_use]
    pub const fn success(response: SearchResponse) -> Self {
        Self {
            code: CODE_OK,
            result: RpcResult::Ranking(response),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: CODE_FAILURE,
            result: RpcResult::Error(message.into()),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code != CODE_FAILURE
    }
}
