use crate::cli::GlobalFlags;
use crate::cli::root_commands::SubmitArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cadence submit`.
pub async fn handle(args: &SubmitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx
        .service
        .submit_task(
            &args.user_id,
            &args.course,
            args.day,
            &args.description,
            args.file_ref.as_deref(),
        )
        .await?;
    output(&response, flags.format)
}
