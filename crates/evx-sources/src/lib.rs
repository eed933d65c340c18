//! # evx-sources
//!
//! Literature providers for Evidex and the fan-out that queries them.
//!
//! Each provider maps a free-text query to article ids in its own
//! namespace (PMIDs, DOIs); the fan-out treats them as opaque strings:
//! - `PubMed` (NCBI E-utilities)
//! - Crossref (`/works`)
//! - bioRxiv / medRxiv local dumps

pub mod crossref;
pub mod pubmed;
pub mod xrxiv;

mod error;
mod http;

pub use crossref::CrossrefSource;
pub use error::SourceError;
pub use pubmed::PubMedSource;
pub use xrxiv::XrxivDumpSource;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use evx_config::{FanoutPolicy, SourcesConfig};
use serde::Serialize;

// ── Capability ─────────────────────────────────────────────────────

/// One external literature provider.
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    /// Stable provider name used in logs and statuses.
    fn name(&self) -> &str;

    /// Article ids matching `query`. May be empty.
    async fn resolve_ids(&self, query: &str) -> Result<Vec<String>, SourceError>;
}

// ── Outcome ────────────────────────────────────────────────────────

/// Per-provider result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    pub source: String,
    pub ok: bool,
    /// Ids returned before deduplication.
    pub ids: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Deduplicated union of ids plus the status of every provider, in
/// registration order.
#[derive(Debug, Default)]
pub struct Resolution {
    pub ids: HashSet<String>,
    pub statuses: Vec<SourceStatus>,
}

impl Resolution {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ── Fan-out ────────────────────────────────────────────────────────

/// Queries every registered provider concurrently and joins the results.
pub struct ResourceFanout {
    sources: Vec<Arc<dyn LiteratureSource>>,
    policy: FanoutPolicy,
    timeout: Option<Duration>,
}

impl ResourceFanout {
    #[must_use]
    pub fn new(
        sources: Vec<Arc<dyn LiteratureSource>>,
        policy: FanoutPolicy,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            sources,
            policy,
            timeout,
        }
    }

    /// Build the enabled providers from configuration.
    ///
    /// `timeout_secs == 0` disables the per-source timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the HTTP client cannot be built or an
    /// enabled dump directory cannot be loaded.
    pub fn from_config(config: &SourcesConfig) -> Result<Self, SourceError> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let client = http::build_client(None)?;

        let mut sources: Vec<Arc<dyn LiteratureSource>> = Vec::new();
        if config.pubmed.enabled {
            sources.push(Arc::new(PubMedSource::new(client.clone(), &config.pubmed)));
        }
        if config.crossref.enabled {
            sources.push(Arc::new(CrossrefSource::new(client, &config.crossref)));
        }
        if config.xrxiv.enabled {
            sources.push(Arc::new(XrxivDumpSource::load(&config.xrxiv.dump_dir)?));
        }

        let fanout = Self::new(sources, config.policy, timeout);
        tracing::info!(
            sources = ?fanout.source_names(),
            policy = ?config.policy,
            timeout_secs = config.timeout_secs,
            "literature sources configured"
        );
        Ok(fanout)
    }

    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub const fn policy(&self) -> FanoutPolicy {
        self.policy
    }

    /// Resolve `query` against every provider concurrently.
    ///
    /// Waits for all providers (join barrier) unless one fails under
    /// [`FanoutPolicy::FailFast`], in which case the remaining lookups are
    /// aborted. Under [`FanoutPolicy::Tolerant`] failed or timed-out
    /// providers contribute no ids and are reported in the statuses.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] for the first failing provider
    /// under the fail-fast policy.
    pub async fn resolve_ids(&self, query: &str) -> Result<Resolution, SourceError> {
        let mut set = tokio::task::JoinSet::new();
        for (idx, source) in self.sources.iter().enumerate() {
            let source = Arc::clone(source);
            let query = query.to_string();
            let timeout = self.timeout;
            set.spawn(async move {
                let result = match timeout {
                    Some(limit) => tokio::time::timeout(limit, source.resolve_ids(&query))
                        .await
                        .unwrap_or_else(|_| {
                            Err(SourceError::Timeout {
                                source_name: source.name().to_string(),
                                secs: limit.as_secs(),
                            })
                        }),
                    None => source.resolve_ids(&query).await,
                };
                (idx, result)
            });
        }

        let mut per_source: Vec<Option<Result<Vec<String>, SourceError>>> =
            (0..self.sources.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            let (idx, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    // A panicking provider has no index to report against.
                    tracing::warn!(%e, "source task failed");
                    if self.policy == FanoutPolicy::FailFast {
                        return Err(SourceError::Unavailable {
                            source_name: "unknown".to_string(),
                            reason: e.to_string(),
                        });
                    }
                    continue;
                }
            };
            if let Err(e) = &result {
                let source_name = self.sources[idx].name();
                tracing::warn!(source = source_name, %e, "source lookup failed");
                if self.policy == FanoutPolicy::FailFast {
                    return Err(SourceError::Unavailable {
                        source_name: source_name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
            per_source[idx] = Some(result);
        }

        let mut resolution = Resolution::default();
        for (source, result) in self.sources.iter().zip(per_source) {
            let status = match result {
                Some(Ok(ids)) => {
                    let status = SourceStatus {
                        source: source.name().to_string(),
                        ok: true,
                        ids: ids.len(),
                        error: None,
                    };
                    resolution.ids.extend(ids);
                    status
                }
                Some(Err(e)) => SourceStatus {
                    source: source.name().to_string(),
                    ok: false,
                    ids: 0,
                    error: Some(e.to_string()),
                },
                None => SourceStatus {
                    source: source.name().to_string(),
                    ok: false,
                    ids: 0,
                    error: Some("task aborted".to_string()),
                },
            };
            resolution.statuses.push(status);
        }

        tracing::debug!(
            sources = self.sources.len(),
            candidates = resolution.ids.len(),
            "fan-out complete"
        );
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str, Vec<&'static str>);

    #[async_trait]
    impl LiteratureSource for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        async fn resolve_ids(&self, _query: &str) -> Result<Vec<String>, SourceError> {
            Ok(self.1.iter().map(ToString::to_string).collect())
        }
    }

    #[test]
    fn from_config_respects_enabled_flags() {
        let mut config = SourcesConfig::default();
        config.xrxiv.enabled = false;
        let fanout = ResourceFanout::from_config(&config).unwrap();
        assert_eq!(fanout.source_names(), vec!["PubMed"]);

        config.pubmed.enabled = false;
        config.crossref.enabled = true;
        let fanout = ResourceFanout::from_config(&config).unwrap();
        assert_eq!(fanout.source_names(), vec!["Crossref"]);
    }

    #[test]
    fn from_config_fails_on_missing_dump_dir() {
        let mut config = SourcesConfig::default();
        config.xrxiv.dump_dir = "/nonexistent/evidex".into();
        assert!(matches!(
            ResourceFanout::from_config(&config),
            Err(SourceError::Io(_))
        ));
    }

    #[tokio::test]
    async fn no_sources_resolve_to_nothing() {
        let fanout = ResourceFanout::new(Vec::new(), FanoutPolicy::FailFast, None);
        let resolution = fanout.resolve_ids("anything").await.unwrap();
        assert!(resolution.is_empty());
        assert!(resolution.statuses.is_empty());
    }

    #[tokio::test]
    async fn statuses_follow_registration_order() {
        let fanout = ResourceFanout::new(
            vec![
                Arc::new(Fixed("b", vec!["1"])),
                Arc::new(Fixed("a", vec!["1", "2"])),
            ],
            FanoutPolicy::FailFast,
            None,
        );
        let resolution = fanout.resolve_ids("q").await.unwrap();
        let names: Vec<_> = resolution.statuses.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(resolution.ids.len(), 2);
    }
}
