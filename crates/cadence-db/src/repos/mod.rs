//! Repository modules for every persisted record kind.
//!
//! Each module adds methods to `CadenceService` via `impl CadenceService` blocks.

pub mod application;
pub mod catalog;
pub mod enrollment;
pub mod run;
pub mod submission;
pub mod unlock;
