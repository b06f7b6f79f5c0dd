use clap::{ArgGroup, Subcommand};

/// Administrative commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AdminCommands {
    /// Unlock a day now, bypassing the cooldown.
    Unlock {
        user_id: String,
        #[arg(long)]
        course: String,
        #[arg(long)]
        day: u32,
    },
    /// Run one reconciliation pass now.
    Reconcile,
    /// Scheduler state and the last pass.
    Status,
    /// Reconciliation pass history, newest first (`--limit` caps it).
    Runs,
    /// Change an enrollment's status or timezone.
    #[command(group(ArgGroup::new("change").required(true).multiple(true).args(["status", "timezone"])))]
    Enrollment {
        user_id: String,
        #[arg(long)]
        course: String,
        /// New status: active, paused, completed, dropped.
        #[arg(long)]
        status: Option<String>,
        /// New IANA timezone.
        #[arg(long)]
        timezone: Option<String>,
    },
}
