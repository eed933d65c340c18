//! Precision / recall / F-β scoring.
//!
//! For an entity with `TP` query articles, baseline counter `B` and `N`
//! candidate articles:
//!
//! ```text
//! precision     = TP / B
//! recall        = TP / N
//! f_beta        = (1 + β²)·P·R / (β²·P + R),  β = 0.5
//! ranking_score = (4·f_beta + sentiment) / 5
//! ```

use std::collections::HashMap;

use evx_core::CoreError;
use evx_core::responses::{ItemMap, Metrics, ScoredItem};

use crate::aggregate::AggregateMap;

/// Weight of recall relative to precision. Fixed; favors precision.
pub const BETA: f64 = 0.5;

/// F-β of a precision/recall pair. Zero when both are zero.
#[must_use]
pub fn f_beta(precision: f64, recall: f64) -> f64 {
    let beta2 = BETA * BETA;
    let denominator = beta2.mul_add(precision, recall);
    if denominator == 0.0 {
        return 0.0;
    }
    (1.0 + beta2) * precision * recall / denominator
}

#[must_use]
pub fn ranking_score(f_beta: f64, sentiment: f64) -> f64 {
    4.0f64.mul_add(f_beta, sentiment) / 5.0
}

/// Mean sentiment over the articles that have a score; 0.0 if none do.
#[must_use]
pub fn mean_sentiment(article_ids: &[String], sentiments: &HashMap<String, f64>) -> f64 {
    let scores: Vec<f64> = article_ids
        .iter()
        .filter_map(|id| sentiments.get(id).copied())
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = scores.len() as f64;
    scores.iter().sum::<f64>() / n
}

/// Metrics for one entity.
///
/// `baseline` is the entity's corpus-wide counter; `None` means the
/// snapshot has no counter for it.
///
/// # Errors
///
/// Returns [`CoreError::DivisionByZero`] when the baseline is missing or
/// zero (precision) or when `query_count` is zero (recall).
pub fn compute(
    entity: &str,
    tp: u64,
    baseline: Option<u64>,
    query_count: u64,
    sentiment: f64,
) -> Result<Metrics, CoreError> {
    let division_by_zero = |metric| CoreError::DivisionByZero {
        entity: entity.to_string(),
        metric,
    };
    let baseline = baseline.filter(|b| *b > 0).ok_or_else(|| division_by_zero("precision"))?;
    if query_count == 0 {
        return Err(division_by_zero("recall"));
    }

    if tp > baseline {
        // Ingestion committed after the baseline snapshot was taken.
        // Precision is reported above 1.0 as computed.
        tracing::debug!(entity, tp, baseline, "intersection exceeds stale baseline");
    }

    #[allow(clippy::cast_precision_loss)]
    let (precision, recall) = (
        tp as f64 / baseline as f64,
        tp as f64 / query_count as f64,
    );
    let f = f_beta(precision, recall);
    Ok(Metrics {
        query_publications: tp,
        total_publications: baseline,
        precision,
        recall,
        f_beta: f,
        sentiment,
        ranking_score: ranking_score(f, sentiment),
    })
}

/// Score every aggregate. Entities whose metrics cannot be computed are
/// logged and dropped; the rest of the batch is unaffected.
#[must_use]
pub fn score(
    query_count: u64,
    aggregates: AggregateMap,
    baseline: &HashMap<String, u64>,
    sentiments: &HashMap<String, f64>,
) -> ItemMap {
    let mut out = ItemMap::new();
    let mut skipped = 0usize;
    for (name, aggregate) in aggregates {
        let sentiment = mean_sentiment(&aggregate.article_ids, sentiments);
        match compute(
            &name,
            aggregate.counter,
            baseline.get(&name).copied(),
            query_count,
            sentiment,
        ) {
            Ok(metrics) => {
                out.insert(
                    name,
                    ScoredItem {
                        counter: aggregate.counter,
                        item_pmids: aggregate.details,
                        metrics,
                    },
                );
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(%e, "entity dropped from scoring");
            }
        }
    }
    tracing::debug!(scored = out.len(), skipped, "scoring complete");
    out
}
