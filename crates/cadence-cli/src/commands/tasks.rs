use cadence_core::responses::TaskViewResponse;
use serde::Serialize;

use crate::cli::root_commands::TasksArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// One line of the `cadence tasks` table.
#[derive(Debug, Serialize)]
struct TaskRow<'a> {
    day: u32,
    title: &'a str,
    status: &'static str,
    can_access: bool,
    unlock_date: Option<&'a str>,
}

/// Handle `cadence tasks`.
pub async fn handle(args: &TasksArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx.service.tasks_for_user(&args.user_id).await?;

    if flags.format == OutputFormat::Table {
        if !flags.quiet {
            println!("{}", headline(&response));
        }
        return output(&rows(&response), flags.format);
    }
    output(&response, flags.format)
}

fn headline(response: &TaskViewResponse) -> String {
    format!(
        "{} ({}) day {} - {}/{} done ({}%)",
        response.course.title,
        response.enrollment_status,
        response.journey_day,
        response.counts.completed,
        response.counts.total,
        response.progress_percent,
    )
}

fn rows(response: &TaskViewResponse) -> Vec<TaskRow<'_>> {
    response
        .tasks
        .iter()
        .map(|task| TaskRow {
            day: task.day,
            title: &task.title,
            status: task.status.as_str(),
            can_access: task.can_access,
            unlock_date: task.unlock_date.as_deref(),
        })
        .collect()
}
