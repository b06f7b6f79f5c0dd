use cadence_core::entities::{
    Application, Course, Enrollment, ReconciliationRun, Submission, TaskTemplate, UnlockRecord,
};
use cadence_core::responses::{
    ManualUnlockResponse, SchedulerStatusResponse, SubmitTaskResponse, TaskViewResponse,
    TodayTaskResponse,
};
use cadence_core::rules::UnlockDecision;
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `cadence schema`.
pub const SCHEMA_NAMES: &[&str] = &[
    "task_view_response",
    "today_task_response",
    "submit_task_response",
    "manual_unlock_response",
    "scheduler_status_response",
    "reconciliation_run",
    "enrollment",
    "submission",
    "unlock_record",
    "course",
    "task_template",
    "application",
    "unlock_decision",
];

fn lookup(name: &str) -> Option<Schema> {
    let schema = match name {
        "task_view_response" => schema_for!(TaskViewResponse),
        "today_task_response" => schema_for!(TodayTaskResponse),
        "submit_task_response" => schema_for!(SubmitTaskResponse),
        "manual_unlock_response" => schema_for!(ManualUnlockResponse),
        "scheduler_status_response" => schema_for!(SchedulerStatusResponse),
        "reconciliation_run" => schema_for!(ReconciliationRun),
        "enrollment" => schema_for!(Enrollment),
        "submission" => schema_for!(Submission),
        "unlock_record" => schema_for!(UnlockRecord),
        "course" => schema_for!(Course),
        "task_template" => schema_for!(TaskTemplate),
        "application" => schema_for!(Application),
        "unlock_decision" => schema_for!(UnlockDecision),
        _ => return None,
    };
    Some(schema)
}

/// Handle `cadence schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(name) = args.type_name.as_deref() else {
        return output(&SCHEMA_NAMES, flags.format);
    };
    let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
    let Some(schema) = lookup(&normalized) else {
        anyhow::bail!(
            "unknown schema '{name}'; available: {}",
            SCHEMA_NAMES.join(", ")
        );
    };
    output(&schema, flags.format)
}

#[cfg(test)]
mod tests {
    use super::{SCHEMA_NAMES, lookup};

    #[test]
    fn every_listed_name_resolves() {
        for name in SCHEMA_NAMES {
            assert!(lookup(name).is_some(), "schema '{name}' is listed but not registered");
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(lookup("finding").is_none());
    }

    #[test]
    fn task_view_schema_names_tasks_property() {
        let schema = lookup("task_view_response").expect("registered");
        let json = serde_json::to_value(&schema).expect("schema serializes");
        assert!(json["properties"]["tasks"].is_object());
    }
}
