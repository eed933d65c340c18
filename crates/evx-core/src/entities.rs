//! Reference data and index records.
//!
//! `Entity` comes from the startup catalogs; `Association`, `ArticleMetadata`
//! and sentiment scores are written by ingestion collaborators and only read
//! by the search path.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ArticleSource, EntityType};

/// A drug or target eligible for ranking.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

/// One article ↔ entity edge from the association index.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct Association {
    pub article_id: String,
    pub entity_id: String,
    pub entity_type: EntityType,
    /// Storage name of the source the edge was ingested from.
    pub source: String,
}

/// Title/url/full-text metadata for one article.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub struct ArticleMetadata {
    pub id: String,
    /// Storage name of the source (`PubMed`, `Crossref`, `Xrxiv`).
    pub source: String,
    pub url: Option<String>,
    pub title: Option<String>,
    /// External full-text identifier (PMC id).
    pub full_text_id: Option<String>,
}

impl ArticleMetadata {
    /// Landing-page url: the stored url if present, otherwise derived from
    /// the source's url template. Unknown sources yield an empty string.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        self.source
            .parse::<ArticleSource>()
            .map(|source| source.id_to_url(&self.id))
            .unwrap_or_default()
    }

    /// Full-text PDF url, present only when a usable PMC id is stored.
    ///
    /// Ingestion historically wrote the literal string `NULL` for missing ids.
    #[must_use]
    pub fn pdf_url(&self) -> Option<String> {
        self.full_text_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "NULL")
            .map(|id| format!("https://www.ncbi.nlm.nih.gov/pmc/articles/{id}/pdf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(source: &str, url: Option<&str>, pmcid: Option<&str>) -> ArticleMetadata {
        ArticleMetadata {
            id: "36543210".into(),
            source: source.into(),
            url: url.map(str::to_string),
            title: Some("Favipiravir in COVID-19".into()),
            full_text_id: pmcid.map(str::to_string),
        }
    }

    #[test]
    fn stored_url_wins() {
        let a = article("PubMed", Some("https://example.org/a"), None);
        assert_eq!(a.canonical_url(), "https://example.org/a");
    }

    #[test]
    fn missing_url_uses_source_template() {
        let a = article("PubMed", None, None);
        assert_eq!(a.canonical_url(), "https://pubmed.ncbi.nlm.nih.gov/36543210/");
    }

    #[test]
    fn unknown_source_degrades_to_empty_url() {
        let a = article("Scopus", None, None);
        assert_eq!(a.canonical_url(), "");
    }

    #[test]
    fn pdf_url_requires_real_pmcid() {
        assert_eq!(article("PubMed", None, Some("NULL")).pdf_url(), None);
        assert_eq!(article("PubMed", None, Some("")).pdf_url(), None);
        assert_eq!(article("PubMed", None, None).pdf_url(), None);
        assert_eq!(
            article("PubMed", None, Some("PMC7654321")).pdf_url().as_deref(),
            Some("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7654321/pdf")
        );
    }
}
