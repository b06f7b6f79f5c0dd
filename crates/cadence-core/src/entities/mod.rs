//! Entity structs for all Cadence records.
//!
//! Each entity maps to a table in the libSQL database.
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod application;
mod course;
mod enrollment;
mod run;
mod submission;
mod unlock;

pub use application::Application;
pub use course::{Course, TaskTemplate};
pub use enrollment::Enrollment;
pub use run::{ReconcileFailure, ReconciliationRun};
pub use submission::Submission;
pub use unlock::UnlockRecord;
