//! `PubMed` client (NCBI E-utilities `esearch`).

use async_trait::async_trait;
use evx_config::PubMedConfig;

use crate::{LiteratureSource, error::SourceError, http::check_response};

const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

#[derive(serde::Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(serde::Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
    #[serde(rename = "ERROR")]
    error: Option<String>,
}

/// Resolves a free-text query to PMIDs.
pub struct PubMedSource {
    http: reqwest::Client,
    api_key: Option<String>,
    retmax: u32,
}

impl PubMedSource {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &PubMedConfig) -> Self {
        Self {
            http,
            api_key: Some(config.api_key.clone()).filter(|k| !k.is_empty()),
            retmax: config.retmax,
        }
    }

    fn search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{ESEARCH_URL}?db=pubmed&retmode=json&retmax={}&term={}",
            self.retmax,
            urlencoding::encode(query)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&api_key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }
}

fn parse_esearch(body: &str) -> Result<Vec<String>, SourceError> {
    let data: ESearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(format!("esearch: {e}")))?;
    if let Some(message) = data.esearchresult.error {
        return Err(SourceError::Api {
            status: 200,
            message,
        });
    }
    Ok(data.esearchresult.idlist)
}

#[async_trait]
impl LiteratureSource for PubMedSource {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn resolve_ids(&self, query: &str) -> Result<Vec<String>, SourceError> {
        let resp = check_response(self.http.get(self.search_url(query)).send().await?).await?;
        let ids = parse_esearch(&resp.text().await?)?;
        tracing::debug!(source = "PubMed", ids = ids.len(), "esearch complete");
        Ok(ids)
    }
}
