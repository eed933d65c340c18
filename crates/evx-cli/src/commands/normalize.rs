use evx_core::query::{normalize_query, tokenize};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::NormalizeArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct NormalizeResponse {
    query: String,
    normalized: String,
    tokens: Vec<String>,
}

/// Handle `evx normalize`.
pub fn handle(args: &NormalizeArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = NormalizeResponse {
        query: args.query.clone(),
        normalized: normalize_query(&args.query),
        tokens: tokenize(&args.query),
    };
    output(&response, flags.format)
}
