use clap::Subcommand;

/// Application fact commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ApplicationCommands {
    /// Record an approved application.
    Approve {
        user_id: String,
        #[arg(long)]
        course: String,
        /// RFC 3339 approval instant (defaults to now).
        #[arg(long)]
        approved_at: Option<String>,
    },
}
