use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::constants::{INDEX_FILES, RESOLVE_EXTENSIONS};

/// Local specifiers start with `.` or `/`; everything else is an external package.
pub fn is_local_request(request: &str) -> bool {
    request.starts_with('.') || request.starts_with('/')
}

/// Resolves specifiers and remembers the answer per `(source dir, specifier)`.
#[derive(Debug, Default)]
pub struct Resolver {
    cache: DashMap<(PathBuf, String), Option<PathBuf>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, request: &str, source_dir: &Path) -> Option<PathBuf> {
        if !is_local_request(request) {
            trace!("Skipping external package '{}'", request);
            return None;
        }

        let key = (source_dir.to_path_buf(), request.to_string());
        if let Some(v) = self.cache.get(&key) {
            trace!("Cache hit for resolve: '{}' from {}", request, source_dir.display());
            return v.clone();
        }

        let resolved = resolve(request, source_dir);
        self.cache.insert(key, resolved.clone());
        resolved
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

/// Resolves a local specifier against the directory of the importing file.
///
/// A leading `/` is taken relative to `source_dir`, not to a project root.
/// Returns `None` for external packages and for specifiers with no file on disk.
pub fn resolve(request: &str, source_dir: &Path) -> Option<PathBuf> {
    if !is_local_request(request) {
        return None;
    }
    trace!("Resolving: '{}' from {}", request, source_dir.display());

    let relative = match request.strip_prefix('/') {
        Some(rooted) => format!("./{}", rooted),
        None => request.to_string(),
    };
    let candidate = clean(source_dir.join(relative));

    let result = resolve_candidate(&candidate);
    match &result {
        Some(p) => debug!("Resolved '{}' to {}", request, p.display()),
        None => debug!("Failed to resolve '{}' from {}", request, source_dir.display()),
    }
    result
}

fn resolve_candidate(p: &Path) -> Option<PathBuf> {
    // A directory only ever resolves to one of its index files
    if p.is_dir() {
        trace!("Probing index files in {}", p.display());
        return INDEX_FILES.iter().map(|index| p.join(index)).find(|c| c.exists());
    }

    if p.exists() {
        return Some(p.to_path_buf());
    }

    RESOLVE_EXTENSIONS.iter().map(|ext| with_appended_extension(p, ext)).find(|c| c.exists())
}

fn with_appended_extension(p: &Path, ext: &str) -> PathBuf {
    let mut raw = p.as_os_str().to_owned();
    raw.push(".");
    raw.push(ext);
    PathBuf::from(raw)
}
