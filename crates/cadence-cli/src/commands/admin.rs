use cadence_core::enums::{EnrollmentStatus, RunTrigger};
use cadence_core::responses::ManualUnlockResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AdminCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cadence admin`.
pub async fn handle(action: &AdminCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AdminCommands::Unlock { user_id, course, day } => {
            let outcome = ctx.service.manual_unlock(user_id, course, *day).await?;
            let response = ManualUnlockResponse {
                newly_recorded: outcome.is_new(),
                record: outcome.into_record(),
            };
            output(&response, flags.format)
        }
        AdminCommands::Reconcile => {
            let run = ctx.scheduler.run_once(RunTrigger::Manual).await?;
            output(&run, flags.format)
        }
        AdminCommands::Status => output(&ctx.scheduler.status().await?, flags.format),
        AdminCommands::Runs => {
            let runs = ctx.service.list_runs(ctx.limit(flags.limit)).await?;
            output(&runs, flags.format)
        }
        AdminCommands::Enrollment {
            user_id,
            course,
            status,
            timezone,
        } => {
            let mut enrollment = None;
            if let Some(raw) = timezone {
                enrollment = Some(ctx.service.set_enrollment_timezone(user_id, course, raw).await?);
            }
            if let Some(raw) = status {
                let next: EnrollmentStatus = parse_enum(raw, "status")?;
                enrollment = Some(ctx.service.transition_enrollment(user_id, course, next).await?);
            }
            let enrollment = enrollment
                .ok_or_else(|| anyhow::anyhow!("admin enrollment needs --status or --timezone"))?;
            output(&enrollment, flags.format)
        }
    }
}
