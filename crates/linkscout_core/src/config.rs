use anyhow::{Context, Result};
use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

/// Makes `path` absolute against the working directory and removes `.`/`..`
/// lexically (symlinks are not followed).
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(path)
        .with_context(|| format!("Failed to make {} absolute", path.display()))?;
    Ok(clean(abs))
}

/// Walks up from the entry file's directory to the nearest ancestor holding `marker`.
///
/// The filesystem root itself is not checked. Falls back to the entry file's
/// directory when no ancestor has the marker.
pub fn find_project_root(entry: &Path, marker: &str) -> PathBuf {
    debug!("Searching for project root containing {}", marker);
    let start = entry.parent().map(Path::to_path_buf).unwrap_or_default();

    for dir in start.ancestors().filter(|d| d.parent().is_some()) {
        let candidate = dir.join(marker);
        trace!("Checking for {} at: {:?}", marker, candidate);
        if candidate.exists() {
            debug!("Found project root at: {:?}", dir);
            return dir.to_path_buf();
        }
    }

    debug!("No {} in any parent folder, using {:?}", marker, start);
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PROJECT_MARKER;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_find_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("my-app");
        create_test_file(&root, PROJECT_MARKER, "{}");
        let entry = create_test_file(&root, "app/components/Editor.js", "// editor");

        assert_eq!(find_project_root(&entry, PROJECT_MARKER), root);
    }

    #[test]
    fn test_nearest_marker_wins() {
        let temp_dir = TempDir::new().unwrap();
        let outer = temp_dir.path();
        create_test_file(outer, PROJECT_MARKER, "{}");
        let inner = outer.join("packages/web");
        create_test_file(&inner, PROJECT_MARKER, "{}");
        let entry = create_test_file(&inner, "src/index.js", "// index");

        assert_eq!(find_project_root(&entry, PROJECT_MARKER), inner);
    }

    #[test]
    fn test_find_project_root_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let entry =
            create_test_file(temp_dir.path(), "nested/deep/page.js", "// no manifest anywhere");

        let marker = "linkscout-test-marker-that-does-not-exist.json";
        assert_eq!(find_project_root(&entry, marker), temp_dir.path().join("nested/deep"));
    }

    #[test]
    fn test_absolutize_cleans_dots() {
        let temp_dir = TempDir::new().unwrap();
        let messy = temp_dir.path().join("a/../b/./c.js");
        assert_eq!(absolutize(&messy).unwrap(), temp_dir.path().join("b/c.js"));

        let relative = absolutize(Path::new("some/file.js")).unwrap();
        assert!(relative.is_absolute());
        assert!(relative.ends_with("some/file.js"));
    }
}
