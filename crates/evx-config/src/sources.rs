//! Literature provider configuration.

use serde::{Deserialize, Serialize};

/// What the fan-out does when one provider fails or times out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FanoutPolicy {
    /// Any provider failure aborts the whole resolution.
    #[default]
    FailFast,
    /// Failed providers are logged and contribute no ids.
    Tolerant,
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

const fn default_retmax() -> u32 {
    25_000
}

const fn default_rows() -> u32 {
    1_000
}

const fn default_crossref_limit() -> u32 {
    25_000
}

fn default_dump_dir() -> String {
    "data/xrxiv_dumps".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Per-provider timeout in seconds. `0` disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub policy: FanoutPolicy,

    #[serde(default)]
    pub pubmed: PubMedConfig,

    #[serde(default)]
    pub crossref: CrossrefConfig,

    #[serde(default)]
    pub xrxiv: XrxivConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            policy: FanoutPolicy::default(),
            pubmed: PubMedConfig::default(),
            crossref: CrossrefConfig::default(),
            xrxiv: XrxivConfig::default(),
        }
    }
}

/// NCBI E-utilities search.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PubMedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// NCBI API key; raises the rate limit when set.
    #[serde(default)]
    pub api_key: String,

    /// Maximum ids returned per query.
    #[serde(default = "default_retmax")]
    pub retmax: u32,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            retmax: default_retmax(),
        }
    }
}

/// Crossref works search. Off by default: paging to the limit is slow.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrossrefConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Contact address for Crossref's polite pool.
    #[serde(default)]
    pub mailto: String,

    /// Page size.
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Stop paging once this many results were requested.
    #[serde(default = "default_crossref_limit")]
    pub limit: u32,
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mailto: String::new(),
            rows: default_rows(),
            limit: default_crossref_limit(),
        }
    }
}

/// Local bioRxiv/medRxiv JSONL dumps.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct XrxivConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_dump_dir")]
    pub dump_dir: String,
}

impl Default for XrxivConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dump_dir: default_dump_dir(),
        }
    }
}
