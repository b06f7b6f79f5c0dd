mod admin;
mod application;
mod catalog;

pub use admin::AdminCommands;
pub use application::ApplicationCommands;
pub use catalog::CatalogCommands;
