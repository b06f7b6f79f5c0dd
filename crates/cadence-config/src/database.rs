//! libSQL database location.

use std::path::Path;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".cadence/cadence.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// The database path with a relative path anchored at `project_root`.
    #[must_use]
    pub fn resolved_path(&self, project_root: &Path) -> String {
        if self.is_in_memory() || Path::new(&self.path).is_absolute() {
            return self.path.clone();
        }
        project_root.join(&self.path).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_is_anchored() {
        let config = DatabaseConfig::default();
        let resolved = config.resolved_path(Path::new("/srv/portal"));
        assert_eq!(resolved, "/srv/portal/.cadence/cadence.db");
    }

    #[test]
    fn memory_and_absolute_paths_pass_through() {
        let memory = DatabaseConfig {
            path: ":memory:".into(),
        };
        assert_eq!(memory.resolved_path(Path::new("/srv")), ":memory:");

        let absolute = DatabaseConfig {
            path: "/var/lib/cadence.db".into(),
        };
        assert_eq!(absolute.resolved_path(Path::new("/srv")), "/var/lib/cadence.db");
    }
}
