use evx_core::responses::{RpcResponse, RpcResult, ScoredItem, SearchResponse};
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

const RANKING_HEADERS: [&str; 9] = [
    "type",
    "name",
    "score",
    "precision",
    "recall",
    "f_beta",
    "sentiment",
    "query_pubs",
    "total_pubs",
];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_key_values(&serde_json::to_value(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Render a search envelope. Tables list drugs then targets, each in
/// ranked order.
pub fn render_envelope(envelope: &RpcResponse, format: OutputFormat) -> anyhow::Result<String> {
    match (format, &envelope.result) {
        (OutputFormat::Table, RpcResult::Ranking(response)) => Ok(ranking_table(response)),
        (OutputFormat::Table, RpcResult::Error(message)) => Ok(format!("error: {message}")),
        _ => render(envelope, format),
    }
}

fn ranking_table(response: &SearchResponse) -> String {
    if response.is_empty() {
        return String::from("(no rows)");
    }
    let rows = response
        .ranked_drugs()
        .into_iter()
        .map(|(name, item)| ranking_row("drug", name, item))
        .chain(
            response
                .ranked_targets()
                .into_iter()
                .map(|(name, item)| ranking_row("target", name, item)),
        )
        .collect::<Vec<_>>();
    table::render_table(&RANKING_HEADERS, &rows)
}

fn ranking_row(kind: &str, name: &str, item: &ScoredItem) -> Vec<String> {
    let m = &item.metrics;
    vec![
        kind.to_string(),
        name.to_string(),
        format!("{:.4}", m.ranking_score),
        format!("{:.4}", m.precision),
        format!("{:.4}", m.recall),
        format!("{:.4}", m.f_beta),
        format!("{:.3}", m.sentiment),
        m.query_publications.to_string(),
        m.total_publications.to_string(),
    ]
}

fn render_key_values(value: &Value) -> anyhow::Result<String> {
    let rows = match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
            .collect::<Vec<_>>(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, value)| vec![index.to_string(), value_to_cell(value)])
            .collect(),
        scalar => return Ok(value_to_cell(scalar)),
    };
    if rows.is_empty() {
        return Ok(String::from("(no rows)"));
    }
    Ok(table::render_table(&["key", "value"], &rows))
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use evx_core::responses::{Metrics, RpcResponse, ScoredItem, SearchResponse};
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::{render, render_envelope, table::render_table};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        value: u32,
    }

    fn item(score: f64) -> ScoredItem {
        ScoredItem {
            counter: 2,
            item_pmids: Vec::new(),
            metrics: Metrics {
                query_publications: 2,
                total_publications: 4,
                precision: 1.0,
                recall: 0.5,
                f_beta: 0.833_333,
                sentiment: 0.0,
                ranking_score: score,
            },
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "x");
        assert_eq!(parsed["value"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn envelope_json_keeps_code_and_result() {
        let envelope = RpcResponse::failure("source unavailable");
        let out = render_envelope(&envelope, OutputFormat::Raw).expect("render should work");
        assert_eq!(out, r#"{"code":0,"result":"source unavailable"}"#);
    }

    #[test]
    fn ranking_table_lists_drugs_by_descending_score() {
        let mut response = SearchResponse::empty();
        response.drugs.insert("Aspirin".into(), item(0.4));
        response.drugs.insert("Remdesivir".into(), item(0.9));
        response.targets.insert("ACE2".into(), item(0.7));

        let out = render_envelope(&RpcResponse::success(response), OutputFormat::Table)
            .expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("type"));
        assert!(lines[2].contains("Remdesivir"));
        assert!(lines[3].contains("Aspirin"));
        assert!(lines[4].starts_with("target"));
    }

    #[test]
    fn empty_ranking_renders_placeholder() {
        let out = render_envelope(
            &RpcResponse::success(SearchResponse::empty()),
            OutputFormat::Table,
        )
        .expect("table render should work");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn table_alignment_handles_mixed_widths() {
        let rows = vec![
            vec!["drug".to_string(), "X".to_string(), "1".to_string()],
            vec!["target".to_string(), "Longer".to_string(), "100".to_string()],
        ];
        let table = render_table(&["type", "name", "n"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].ends_with("  1"));
        assert!(lines[3].ends_with("100"));
    }
}
