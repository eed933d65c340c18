//! Ranking, filtering, and override settings.

use serde::{Deserialize, Serialize};

const fn default_limit() -> u32 {
    50
}

const fn default_max_response_mb() -> f64 {
    2.5
}

const fn default_precision_quantile() -> f64 {
    0.9
}

const fn default_max_shrink_iterations() -> u32 {
    16
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum entities returned per type after filtering.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Serialized response budget per entity type, in MiB.
    #[serde(default = "default_max_response_mb")]
    pub max_response_mb: f64,

    /// Entities must have precision strictly above this quantile to survive filtering.
    #[serde(default = "default_precision_quantile")]
    pub precision_quantile: f64,

    /// Quarterings of article lists before they are cleared outright.
    #[serde(default = "default_max_shrink_iterations")]
    pub max_shrink_iterations: u32,

    /// Look up candidates in the popular-query cache before the fan-out.
    /// The engine never writes the cache.
    #[serde(default)]
    pub use_query_cache: bool,

    #[serde(default)]
    pub overrides: Vec<OverrideRuleConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            max_response_mb: default_max_response_mb(),
            precision_quantile: default_precision_quantile(),
            max_shrink_iterations: default_max_shrink_iterations(),
            use_query_cache: false,
            overrides: vec![OverrideRuleConfig::default()],
        }
    }
}

/// Business override: queries mentioning any trigger force a fixed ranking
/// score onto the listed drugs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OverrideRuleConfig {
    /// Case-insensitive substrings of the raw query.
    pub trigger_substrings: Vec<String>,
    /// Catalog names that receive the forced score.
    pub boosted_entities: Vec<String>,
    pub forced_score: f64,
}

impl Default for OverrideRuleConfig {
    fn default() -> Self {
        Self {
            trigger_substrings: ["covid", "omicron", "delta", "sars-cov", "corona"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            boosted_entities: vec!["Favipiravir".to_string(), "Ivermectin".to_string()],
            forced_score: 1.0,
        }
    }
}
