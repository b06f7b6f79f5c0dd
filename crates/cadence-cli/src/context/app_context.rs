use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cadence_config::CadenceConfig;
use cadence_db::service::CadenceService;
use cadence_scheduler::Scheduler;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<CadenceService>,
    pub scheduler: Arc<Scheduler>,
    pub config: CadenceConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the database and build the scheduler handle.
    pub async fn init(project_root: PathBuf, config: CadenceConfig) -> anyhow::Result<Self> {
        let db_path = config.database.resolved_path(&project_root);
        let default_timezone = config
            .enrollment
            .timezone()
            .context("invalid enrollment.default_timezone")?;

        let service = CadenceService::new_local(&db_path, default_timezone)
            .await
            .with_context(|| format!("failed to open cadence database at {db_path}"))?;
        let service = Arc::new(service);
        tracing::debug!(db_path = %db_path, root = %project_root.display(), "cadence database opened");

        let scheduler = Scheduler::new(Arc::clone(&service), config.scheduler.clone())
            .context("invalid scheduler configuration")?;

        Ok(Self {
            service,
            scheduler: Arc::new(scheduler),
            config,
            project_root,
        })
    }

    /// Effective list limit: `--limit`, else `general.default_limit`.
    #[must_use]
    pub fn limit(&self, flag: Option<u32>) -> u32 {
        flag.unwrap_or(self.config.general.default_limit)
    }
}
