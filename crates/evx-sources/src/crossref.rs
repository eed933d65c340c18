//! Crossref client (`/works` search, offset-paged).

use async_trait::async_trait;
use evx_config::CrossrefConfig;

use crate::{LiteratureSource, error::SourceError, http::check_response};

const WORKS_URL: &str = "https://api.crossref.org/works";

#[derive(serde::Deserialize)]
struct WorksResponse {
    message: WorksMessage,
}

#[derive(serde::Deserialize)]
struct WorksMessage {
    #[serde(default)]
    items: Vec<WorkItem>,
}

#[derive(serde::Deserialize)]
struct WorkItem {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

/// Resolves a free-text query to DOIs.
pub struct CrossrefSource {
    http: reqwest::Client,
    mailto: Option<String>,
    rows: u32,
    limit: u32,
}

impl CrossrefSource {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &CrossrefConfig) -> Self {
        Self {
            http,
            mailto: Some(config.mailto.clone()).filter(|m| !m.is_empty()),
            rows: config.rows.max(1),
            limit: config.limit,
        }
    }

    fn page_url(&self, query: &str, offset: u32) -> String {
        let mut url = format!(
            "{WORKS_URL}?query={}&rows={}&offset={offset}",
            urlencoding::encode(query),
            self.rows
        );
        if let Some(mailto) = &self.mailto {
            url.push_str("&mailto=");
            url.push_str(&urlencoding::encode(mailto));
        }
        url
    }
}

/// DOIs on one page. `None` means the page was empty and paging stops.
fn parse_page(body: &str) -> Result<Option<Vec<String>>, SourceError> {
    let data: WorksResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(format!("works: {e}")))?;
    if data.message.items.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        data.message
            .items
            .into_iter()
            .filter_map(|item| item.doi)
            .collect(),
    ))
}

#[async_trait]
impl LiteratureSource for CrossrefSource {
    fn name(&self) -> &str {
        "Crossref"
    }

    async fn resolve_ids(&self, query: &str) -> Result<Vec<String>, SourceError> {
        let mut dois = Vec::new();
        let mut offset = 0;
        while offset < self.limit {
            let resp =
                check_response(self.http.get(self.page_url(query, offset)).send().await?).await?;
            let Some(page) = parse_page(&resp.text().await?)? else {
                break;
            };
            dois.extend(page);
            offset += self.rows;
        }
        tracing::debug!(source = "Crossref", ids = dois.len(), offset, "works paging complete");
        Ok(dois)
    }
}
