//! Outlier removal, top-k selection and response size bounding.

use evx_config::SearchConfig;
use evx_core::responses::{ItemMap, ScoredItem};

use crate::error::SearchError;

const BYTES_PER_MB: f64 = 1_048_576.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    /// Entities must have precision strictly above this quantile.
    pub precision_quantile: f64,
    /// Maximum entities kept per type.
    pub limit: usize,
    /// Serialized size cap for one entity map.
    pub max_bytes: usize,
    /// Quarterings of the detail lists before they are cleared outright.
    pub max_shrink_iterations: u32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl FilterSettings {
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_bytes = (config.max_response_mb * BYTES_PER_MB) as usize;
        Self {
            precision_quantile: config.precision_quantile,
            limit: config.limit as usize,
            max_bytes,
            max_shrink_iterations: config.max_shrink_iterations,
        }
    }

    #[must_use]
    pub const fn with_limit(self, limit: usize) -> Self {
        Self { limit, ..self }
    }
}

/// Quantile `q` of `values` by linear interpolation between closest ranks.
/// `None` for an empty slice.
#[must_use]
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    #[allow(clippy::cast_precision_loss)]
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (lo, hi) = (pos.floor() as usize, pos.ceil() as usize);
    #[allow(clippy::cast_precision_loss)]
    let frac = pos - lo as f64;
    Some((sorted[hi] - sorted[lo]).mul_add(frac, sorted[lo]))
}

/// Filter one entity map.
///
/// Keeps entities whose precision is strictly above the configured
/// quantile, then the `limit` highest ranking scores (stable over name
/// order), then shrinks detail lists until the serialized map fits
/// `max_bytes`. An empty map is returned unchanged.
///
/// The cap bounds this one map. A response carrying both the drug and the
/// target map can reach twice `max_bytes`.
///
/// # Errors
///
/// Returns [`SearchError::ResponseTooLarge`] if the map exceeds the cap
/// even with every detail list empty.
pub fn filter(items: ItemMap, settings: &FilterSettings) -> Result<ItemMap, SearchError> {
    let precisions: Vec<f64> = items.values().map(|i| i.metrics.precision).collect();
    let Some(threshold) = percentile(&precisions, settings.precision_quantile) else {
        return Ok(items);
    };

    let before = items.len();
    let mut survivors: Vec<(String, ScoredItem)> = items
        .into_iter()
        .filter(|(_, item)| item.metrics.precision > threshold)
        .collect();
    survivors.sort_by(|a, b| b.1.metrics.ranking_score.total_cmp(&a.1.metrics.ranking_score));
    survivors.truncate(settings.limit);

    let mut kept: ItemMap = survivors.into_iter().collect();
    tracing::debug!(before, after = kept.len(), threshold, "precision filter applied");

    shrink_to_fit(&mut kept, settings)?;
    Ok(kept)
}

/// Quarter every detail list until `items` serializes within
/// `settings.max_bytes`, clearing the lists after
/// `max_shrink_iterations` rounds.
///
/// # Errors
///
/// Returns [`SearchError::ResponseTooLarge`] if the map is still too large
/// with no details left, or [`SearchError::Serialization`] if it cannot be
/// serialized.
pub fn shrink_to_fit(items: &mut ItemMap, settings: &FilterSettings) -> Result<(), SearchError> {
    let mut size = serialized_len(items)?;
    let mut iterations = 0;
    while size > settings.max_bytes
        && iterations < settings.max_shrink_iterations
        && items.values().any(|i| !i.item_pmids.is_empty())
    {
        for item in items.values_mut() {
            let keep = item.item_pmids.len() / 4;
            item.item_pmids.truncate(keep);
        }
        iterations += 1;
        size = serialized_len(items)?;
    }

    if size > settings.max_bytes {
        for item in items.values_mut() {
            item.item_pmids.clear();
        }
        size = serialized_len(items)?;
        if size > settings.max_bytes {
            return Err(SearchError::ResponseTooLarge {
                bytes: size,
                limit: settings.max_bytes,
            });
        }
    }

    if iterations > 0 {
        tracing::debug!(iterations, bytes = size, "detail lists shrunk");
    }
    Ok(())
}

fn serialized_len(items: &ItemMap) -> Result<usize, SearchError> {
    Ok(serde_json::to_vec(items)?.len())
}
