use anyhow::Context;
use evx_config::EvidexConfig;
use evx_core::query::normalize_query;
use evx_db::AssociationStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CacheCommands;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CacheEntry {
    query: String,
    ids: Option<Vec<String>>,
}

/// Handle `evx cache`.
pub async fn handle(action: &CacheCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = EvidexConfig::load_with_dotenv().context("failed to load evidex config")?;
    let store = AssociationStore::open_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open store at {}", config.database.path))?;

    let entry = match action {
        CacheCommands::Put { query, ids } => {
            anyhow::ensure!(
                !normalize_query(query).is_empty(),
                "'{query}' has no searchable text"
            );
            store.put_popular_query(query, ids).await?;
            tracing::info!(query, ids = ids.len(), "popular query cached");
            CacheEntry {
                query: normalize_query(query),
                ids: Some(ids.clone()),
            }
        }
        CacheCommands::Get { query } => CacheEntry {
            query: normalize_query(query),
            ids: store.popular_query(query).await?,
        },
    };
    output(&entry, flags.format)
}
