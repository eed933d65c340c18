//! Keyword search over local bioRxiv / medRxiv JSONL dumps.
//!
//! Every `*.jsonl` file in the dump directory is loaded once. Records are
//! deduplicated by DOI (first wins) and each searchable field is
//! pre-tokenized with the same normalization used for query text.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use evx_core::query::tokenize;

use crate::{LiteratureSource, error::SourceError};

#[derive(Debug, serde::Deserialize)]
struct DumpRecord {
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
}

struct IndexedPaper {
    doi: String,
    /// Token sets for title, doi and abstract.
    fields: [HashSet<String>; 3],
}

impl IndexedPaper {
    fn new(doi: String, title: Option<&str>, abstract_text: Option<&str>) -> Self {
        let tokens = |text: &str| tokenize(text).into_iter().collect::<HashSet<_>>();
        Self {
            fields: [
                tokens(title.unwrap_or_default()),
                tokens(&doi),
                tokens(abstract_text.unwrap_or_default()),
            ],
            doi,
        }
    }

    fn matches(&self, query_tokens: &[String]) -> bool {
        self.fields
            .iter()
            .any(|field| query_tokens.iter().all(|t| field.contains(t)))
    }
}

/// Preprint dump index.
pub struct XrxivDumpSource {
    papers: Vec<IndexedPaper>,
}

impl XrxivDumpSource {
    /// Load every `*.jsonl` dump under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the directory or a file cannot be read
    /// and [`SourceError::Parse`] if a line is not a JSON object.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SourceError> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
            .collect();
        files.sort();

        let mut seen = HashSet::new();
        let mut papers = Vec::new();
        for file in &files {
            for record in serde_jsonlines::json_lines::<DumpRecord, _>(file)? {
                let record = record.map_err(|e| {
                    SourceError::Parse(format!("{}: {e}", file.display()))
                })?;
                let Some(doi) = record.doi.filter(|d| !d.is_empty()) else {
                    continue;
                };
                if seen.insert(doi.clone()) {
                    papers.push(IndexedPaper::new(
                        doi,
                        record.title.as_deref(),
                        record.abstract_text.as_deref(),
                    ));
                }
            }
        }
        tracing::info!(
            dir = %dir.display(),
            files = files.len(),
            papers = papers.len(),
            "xrxiv dumps loaded"
        );
        Ok(Self { papers })
    }

    /// Number of distinct papers indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// DOIs of papers where some field contains every query token.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<String> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }
        self.papers
            .iter()
            .filter(|paper| paper.matches(&query_tokens))
            .map(|paper| paper.doi.clone())
            .collect()
    }
}

#[async_trait]
impl LiteratureSource for XrxivDumpSource {
    fn name(&self) -> &str {
        "Xrxiv"
    }

    async fn resolve_ids(&self, query: &str) -> Result<Vec<String>, SourceError> {
        Ok(self.search(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn write_dump(dir: &Path, name: &str, lines: &[&str]) {
        std::fs::write(dir.join(name), lines.join("\n")).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, XrxivDumpSource) {
        let dir = tempfile::tempdir().unwrap();
        write_dump(
            dir.path(),
            "biorxiv_2026-01-01.jsonl",
            &[
                r#"{"doi": "10.1101/001", "title": "Favipiravir against SARS-CoV-2", "abstract": "An antiviral trial."}"#,
                r#"{"doi": "10.1101/002", "title": "Kinase inhibitors", "abstract": "Omicron variant binding of imatinib."}"#,
            ],
        );
        write_dump(
            dir.path(),
            "medrxiv_2026-01-01.jsonl",
            &[
                r#"{"doi": "10.1101/001", "title": "Duplicate entry", "abstract": null}"#,
                r#"{"title": "Missing DOI"}"#,
            ],
        );
        write_dump(dir.path(), "notes.txt", &["not a dump"]);
        let source = XrxivDumpSource::load(dir.path()).unwrap();
        (dir, source)
    }

    #[test]
    fn dedups_by_doi_and_skips_records_without_one() {
        let (_dir, source) = fixture();
        assert_eq!(source.len(), 2);
    }

    #[rstest]
    #[case("favipiravir", vec!["10.1101/001"])]
    #[case("SARS-CoV-2, Favipiravir!", vec!["10.1101/001"])]
    #[case("omicron imatinib", vec!["10.1101/002"])]
    #[case("antiviral", vec!["10.1101/001"])]
    #[case("favipiravir imatinib", vec![])]
    #[case("   ", vec![])]
    fn all_tokens_must_hit_one_field(#[case] query: &str, #[case] expected: Vec<&str>) {
        let (_dir, source) = fixture();
        assert_eq!(source.search(query), expected);
    }

    #[test]
    fn tokens_spanning_fields_do_not_match() {
        // "kinase" is in the title, "binding" only in the abstract.
        let (_dir, source) = fixture();
        assert!(source.search("kinase binding").is_empty());
    }

    #[test]
    fn multi_line_abstract_is_tokenized_on_line_breaks() {
        let dir = tempfile::tempdir().unwrap();
        write_dump(
            dir.path(),
            "medrxiv_2026-02-01.jsonl",
            &[r#"{"doi": "10.1101/003", "title": "Trial", "abstract": "remdesivir\nefficacy in patients"}"#],
        );
        let source = XrxivDumpSource::load(dir.path()).unwrap();
        assert_eq!(source.search("remdesivir"), vec!["10.1101/003"]);
        assert_eq!(source.search("efficacy patients"), vec!["10.1101/003"]);
    }

    #[test]
    fn malformed_line_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_dump(dir.path(), "bad.jsonl", &["{not json"]);
        assert!(matches!(
            XrxivDumpSource::load(dir.path()),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        assert!(matches!(
            XrxivDumpSource::load("/nonexistent/evidex/dumps"),
            Err(SourceError::Io(_))
        ));
    }
}
