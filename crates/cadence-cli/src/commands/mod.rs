pub mod admin;
pub mod application;
pub mod catalog;
pub mod dispatch;
pub mod schema;
pub mod serve;
pub mod shared;
pub mod submit;
pub mod tasks;
pub mod today;
