use std::sync::Arc;

use cadence_core::enums::RunTrigger;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cadence serve`: keep the daily trigger armed until Ctrl-C.
pub async fn handle(args: &ServeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !ctx.config.scheduler.enabled {
        anyhow::bail!("scheduler is disabled; set scheduler.enabled = true to serve");
    }

    let scheduler = Arc::clone(&ctx.scheduler);
    if args.run_now {
        let run = scheduler.run_once(RunTrigger::Manual).await?;
        if !flags.quiet {
            output(&run, flags.format)?;
        }
    }

    scheduler.start()?;
    tracing::info!(
        timezone = %ctx.config.scheduler.timezone,
        run_at = %ctx.config.scheduler.run_at,
        "cadence scheduler serving"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    scheduler.stop().await?;

    if !flags.quiet {
        output(&scheduler.status().await?, flags.format)?;
    }
    Ok(())
}
