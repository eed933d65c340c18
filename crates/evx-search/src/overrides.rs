//! Declarative ranking overrides.
//!
//! A rule fires when the query contains any trigger substring
//! (case-insensitive) and forces the ranking score of its boosted entities.
//! Rules run after scoring and before filtering.

use evx_config::OverrideRuleConfig;
use evx_core::responses::ItemMap;

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideRule {
    /// Lower-cased trigger substrings.
    triggers: Vec<String>,
    /// Exact entity names.
    entities: Vec<String>,
    forced_score: f64,
}

impl OverrideRule {
    #[must_use]
    pub fn new(triggers: &[String], entities: &[String], forced_score: f64) -> Self {
        Self {
            triggers: triggers
                .iter()
                .map(|t| t.to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            entities: entities.to_vec(),
            forced_score,
        }
    }

    #[must_use]
    pub fn from_config(config: &OverrideRuleConfig) -> Self {
        Self::new(
            &config.trigger_substrings,
            &config.boosted_entities,
            config.forced_score,
        )
    }

    #[must_use]
    pub fn triggered_by(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.triggers.iter().any(|t| query.contains(t.as_str()))
    }

    /// Apply to `items` if `query` triggers the rule. Returns how many
    /// entities were overridden.
    pub fn apply(&self, query: &str, items: &mut ItemMap) -> usize {
        if !self.triggered_by(query) {
            return 0;
        }
        let mut applied = 0;
        for name in &self.entities {
            if let Some(item) = items.get_mut(name) {
                item.metrics.ranking_score = self.forced_score;
                applied += 1;
            }
        }
        applied
    }
}

/// Ordered rule list; later rules win when two touch the same entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    #[must_use]
    pub const fn new(rules: Vec<OverrideRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn from_config(rules: &[OverrideRuleConfig]) -> Self {
        Self::new(rules.iter().map(OverrideRule::from_config).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, query: &str, items: &mut ItemMap) -> usize {
        let applied: usize = self.rules.iter().map(|rule| rule.apply(query, items)).sum();
        if applied > 0 {
            tracing::debug!(applied, "ranking overrides applied");
        }
        applied
    }
}
