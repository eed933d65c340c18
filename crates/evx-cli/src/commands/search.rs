use anyhow::Context;
use evx_config::EvidexConfig;
use evx_core::responses::RpcResponse;
use evx_search::SearchEngine;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SearchArgs;
use crate::output::render_envelope;

/// Handle `evx search`.
///
/// Prints the `{code, result}` envelope. A failed search is still printed,
/// then reported as a command error.
pub async fn handle(args: &SearchArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = EvidexConfig::load_with_dotenv().context("failed to load evidex config")?;
    let engine = SearchEngine::from_config(&config)
        .await
        .context("failed to initialize search engine")?;

    let limit = flags
        .limit
        .map_or_else(|| engine.default_limit(), |limit| limit as usize);

    let envelope = match engine
        .search(&args.query, !args.no_filter, args.details, limit)
        .await
    {
        Ok(response) => RpcResponse::success(response),
        Err(error) => {
            tracing::warn!(query = %args.query, %error, "search failed");
            RpcResponse::failure(error.to_string())
        }
    };

    println!("{}", render_envelope(&envelope, flags.format)?);
    if !envelope.is_success() {
        anyhow::bail!("search for '{}' failed", args.query);
    }
    Ok(())
}
