use cadence_core::ids::PREFIX_COURSE;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CatalogCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cadence catalog`.
pub async fn handle(action: &CatalogCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CatalogCommands::Course {
            id,
            title,
            description,
        } => {
            let id = match id {
                Some(id) => id.clone(),
                None => ctx.service.db().generate_id(PREFIX_COURSE).await?,
            };
            let course = ctx
                .service
                .upsert_course(&id, title, description.as_deref())
                .await?;
            output(&course, flags.format)
        }
        CatalogCommands::Task {
            course_id,
            day,
            title,
            description,
            exercise,
            test,
        } => {
            if ctx.service.get_course(course_id).await?.is_none() {
                anyhow::bail!("course '{course_id}' does not exist; create it with `cadence catalog course`");
            }
            let template = ctx
                .service
                .upsert_task_template(
                    course_id,
                    *day,
                    title,
                    description,
                    exercise.as_deref(),
                    test.as_deref(),
                )
                .await?;
            output(&template, flags.format)
        }
        CatalogCommands::Show { course_id: Some(id) } => {
            output(&ctx.service.get_course_tasks(id).await?, flags.format)
        }
        CatalogCommands::Show { course_id: None } => {
            output(&ctx.service.list_courses().await?, flags.format)
        }
    }
}
