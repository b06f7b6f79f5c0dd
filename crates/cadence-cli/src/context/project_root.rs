use std::path::{Path, PathBuf};

/// Walk upwards from `start` until a `.cadence` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(".cadence").is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::find_project_root;

    #[test]
    fn finds_project_root_in_parent_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".cadence")).expect(".cadence should create");
        std::fs::create_dir_all(temp.path().join("a/b")).expect("nested dirs should create");

        let found = find_project_root(&temp.path().join("a/b"));
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn returns_none_without_marker() {
        let temp = TempDir::new().expect("tempdir should create");
        assert!(find_project_root(temp.path()).is_none());
    }
}
