//! Entity types and article sources.
//!
//! Both enums are stored as TEXT in the association index. `EntityType` uses
//! `snake_case` serialization; `ArticleSource` keeps the provider's display
//! name (`PubMed`, `Crossref`, `Xrxiv`) since that is what ingestion writes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Kind of rankable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Drug,
    Target,
}

impl EntityType {
    pub const ALL: [Self; 2] = [Self::Drug, Self::Target];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drug => "drug",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drug" => Ok(Self::Drug),
            "target" => Ok(Self::Target),
            other => Err(CoreError::Validation(format!("unknown entity type '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// ArticleSource
// ---------------------------------------------------------------------------

/// External literature database an article id was obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ArticleSource {
    PubMed,
    Crossref,
    Xrxiv,
}

impl ArticleSource {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PubMed => "PubMed",
            Self::Crossref => "Crossref",
            Self::Xrxiv => "Xrxiv",
        }
    }

    /// Canonical landing page for an article id in this source's namespace.
    ///
    /// PubMed ids resolve to the PubMed record page; Crossref and preprint
    /// ids are DOIs and resolve through the DOI resolver.
    #[must_use]
    pub fn id_to_url(self, article_id: &str) -> String {
        match self {
            Self::PubMed => format!("https://pubmed.ncbi.nlm.nih.gov/{article_id}/"),
            Self::Crossref | Self::Xrxiv => format!("https://www.doi.org/{article_id}"),
        }
    }
}

impl fmt::Display for ArticleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PubMed" => Ok(Self::PubMed),
            "Crossref" => Ok(Self::Crossref),
            "Xrxiv" => Ok(Self::Xrxiv),
            other => Err(CoreError::Validation(format!("unknown article source '{other}'"))),
        }
    }
}
