use cadence_core::enums::ApplicationStatus;
use chrono::Utc;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ApplicationCommands;
use crate::commands::shared::parse::parse_instant;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cadence application`.
pub async fn handle(
    action: &ApplicationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ApplicationCommands::Approve {
            user_id,
            course,
            approved_at,
        } => {
            let approved_at = match approved_at {
                Some(raw) => parse_instant(raw, "approved_at")?,
                None => Utc::now(),
            };
            let application = ctx
                .service
                .record_application(user_id, course, ApplicationStatus::Approved, Some(approved_at))
                .await?;
            output(&application, flags.format)
        }
    }
}
