//! # cadence-config
//!
//! Layered configuration loading for Cadence using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CADENCE_*` prefix, `__` as separator)
//! 2. Project-level `.cadence/config.toml`
//! 3. User-level `~/.config/cadence/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CADENCE_SCHEDULER__RUN_AT` -> `scheduler.run_at`,
//! `CADENCE_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cadence_config::CadenceConfig;
//!
//! let config = CadenceConfig::load_with_dotenv().expect("config");
//! println!("daily pass at {} {}", config.scheduler.run_at, config.scheduler.timezone);
//! ```

mod database;
mod enrollment;
mod error;
mod general;
mod scheduler;

pub use database::DatabaseConfig;
pub use enrollment::EnrollmentConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use scheduler::SchedulerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub enrollment: EnrollmentConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CadenceConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// rooted at the current directory, then validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration with the project-local file looked up under `project_root`.
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(".cadence").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("CADENCE_").split("__"))
    }

    /// Check every value that needs parsing before use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.enrollment.timezone()?;
        self.scheduler.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cadence").join("config.toml"))
    }
}
