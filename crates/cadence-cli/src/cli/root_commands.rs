use clap::{Args, Subcommand};

use crate::cli::subcommands::{AdminCommands, ApplicationCommands, CatalogCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Show every day of a user's course with its status.
    Tasks(TasksArgs),
    /// Show the user's current day.
    Today(TodayArgs),
    /// Submit a day's task.
    Submit(SubmitArgs),
    /// Administrative overrides and scheduler control.
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
    /// Seed the course catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
    /// Record application facts from the application service.
    Application {
        #[command(subcommand)]
        action: ApplicationCommands,
    },
    /// Run the daily reconciliation trigger until interrupted.
    Serve(ServeArgs),
    /// Dump JSON schema for a response type.
    Schema(SchemaArgs),
}

/// Arguments for `cadence tasks`.
#[derive(Clone, Debug, Args)]
pub struct TasksArgs {
    pub user_id: String,
}

/// Arguments for `cadence today`.
#[derive(Clone, Debug, Args)]
pub struct TodayArgs {
    pub user_id: String,
}

/// Arguments for `cadence submit`.
#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    pub user_id: String,
    #[arg(long)]
    pub course: String,
    #[arg(long)]
    pub day: u32,
    /// What was done.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Opaque reference to the uploaded file.
    #[arg(long)]
    pub file_ref: Option<String>,
}

/// Arguments for `cadence serve`.
#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Run one pass immediately before waiting for the first trigger.
    #[arg(long)]
    pub run_now: bool,
}

/// Arguments for `cadence schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Registered type name (e.g. `task_view_response`). Omit to list names.
    pub type_name: Option<String>,
}
