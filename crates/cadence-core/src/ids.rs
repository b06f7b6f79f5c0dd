//! ID prefixes for every persisted record kind.
//!
//! IDs are `{prefix}-{16 hex chars}`, generated by `CadenceDb::generate_id`.

pub const PREFIX_APPLICATION: &str = "app";
pub const PREFIX_COURSE: &str = "crs";
pub const PREFIX_ENROLLMENT: &str = "enr";
pub const PREFIX_SUBMISSION: &str = "sub";
pub const PREFIX_TEMPLATE: &str = "tpl";
pub const PREFIX_UNLOCK: &str = "unl";
pub const PREFIX_RUN: &str = "run";

/// All prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_APPLICATION,
    PREFIX_COURSE,
    PREFIX_ENROLLMENT,
    PREFIX_SUBMISSION,
    PREFIX_TEMPLATE,
    PREFIX_UNLOCK,
    PREFIX_RUN,
];
