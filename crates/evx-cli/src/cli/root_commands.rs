use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Rank drugs and targets for a free-text query.
    Search(SearchArgs),
    /// Print the normalized form of a query (the cache key).
    Normalize(NormalizeArgs),
    /// Dump the JSON schema of the search response envelope.
    Schema,
    /// Popular-query cache.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

/// Arguments for `evx search`.
#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Free-text query, e.g. "molnupiravir omicron".
    pub query: String,

    /// Return every scored entity (no percentile cut, limit or size cap).
    #[arg(long)]
    pub no_filter: bool,

    /// Include per-article detail lists for each entity.
    #[arg(long)]
    pub details: bool,
}

/// Arguments for `evx normalize`.
#[derive(Clone, Debug, Args)]
pub struct NormalizeArgs {
    pub query: String,
}

/// Popular-query cache management.
#[derive(Clone, Debug, Subcommand)]
pub enum CacheCommands {
    /// Store candidate article ids for a query.
    Put {
        /// Query text; stored under its normalized form.
        query: String,
        /// Article ids the query resolves to.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show the cached article ids for a query.
    Get {
        query: String,
    },
}
