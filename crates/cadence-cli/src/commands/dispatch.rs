use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Tasks(args) => commands::tasks::handle(&args, ctx, flags).await,
        Commands::Today(args) => commands::today::handle(&args, ctx, flags).await,
        Commands::Submit(args) => commands::submit::handle(&args, ctx, flags).await,
        Commands::Admin { action } => commands::admin::handle(&action, ctx, flags).await,
        Commands::Catalog { action } => commands::catalog::handle(&action, ctx, flags).await,
        Commands::Application { action } => commands::application::handle(&action, ctx, flags).await,
        Commands::Serve(args) => commands::serve::handle(&args, ctx, flags).await,
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
