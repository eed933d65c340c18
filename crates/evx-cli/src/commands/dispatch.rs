use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Search(args) => commands::search::handle(&args, flags).await,
        Commands::Normalize(args) => commands::normalize::handle(&args, flags),
        Commands::Schema => commands::schema::handle(flags),
        Commands::Cache { action } => commands::cache::handle(&action, flags).await,
    }
}
