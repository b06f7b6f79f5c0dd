use crate::cli::GlobalFlags;
use crate::cli::root_commands::TodayArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cadence today`.
pub async fn handle(args: &TodayArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx.service.today_task(&args.user_id).await?;
    output(&response, flags.format)
}
