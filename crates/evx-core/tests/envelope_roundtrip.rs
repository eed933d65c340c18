//! Serde roundtrip and JsonSchema validation tests for the RPC envelope.

use std::collections::BTreeMap;

use schemars::schema_for;
use evx_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn sample_response() -> SearchResponse {
    let mut drugs = BTreeMap::new();
    drugs.insert(
        "Favipiravir".to_string(),
        ScoredItem {
            counter: 12,
            item_pmids: vec![ArticleDetail {
                pmid: "33000001".into(),
                title: "Favipiravir for mild COVID-19".into(),
                db_name: "PubMed".into(),
                url: "https://pubmed.ncbi.nlm.nih.gov/33000001/".into(),
                has_pdf: true,
                pdf_url: "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC1/pdf".into(),
            }],
            metrics: Metrics {
                query_publications: 12,
                total_publications: 40,
                precision: 0.3,
                recall: 0.12,
                f_beta: 0.23,
                sentiment: 0.1,
                ranking_score: 1.0,
            },
        },
    );
    SearchResponse {
        drugs,
        targets: BTreeMap::new(),
    }
}

#[test]
fn success_envelope_roundtrips_and_validates() {
    let envelope = RpcResponse::success(sample_response());

    let json_str = serde_json::to_string_pretty(&envelope).unwrap();
    let recovered: RpcResponse = serde_json::from_str(&json_str).unwrap();
    assert_eq!(recovered, envelope);

    let schema = serde_json::to_value(schema_for!(RpcResponse)).unwrap();
    let instance = serde_json::to_value(&envelope).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");
}

#[test]
fn failure_envelope_roundtrips_and_validates() {
    let envelope = RpcResponse::failure("store unavailable");

    let json_str = serde_json::to_string(&envelope).unwrap();
    let recovered: RpcResponse = serde_json::from_str(&json_str).unwrap();
    assert_eq!(recovered.result, RpcResult::Error("store unavailable".into()));
    assert_eq!(recovered.code, CODE_FAILURE);

    let schema = serde_json::to_value(schema_for!(RpcResponse)).unwrap();
    let instance = serde_json::to_value(&envelope).unwrap();
    assert!(validate_against_schema(&schema, &instance).is_empty());
}

#[test]
fn search_request_validates_against_schema() {
    let request = SearchRequest {
        query: "delta variant covid".into(),
        apply_filter: true,
        include_pmids_per_item: false,
    };
    let schema = serde_json::to_value(schema_for!(SearchRequest)).unwrap();
    let instance = serde_json::to_value(&request).unwrap();
    assert!(validate_against_schema(&schema, &instance).is_empty());
}
