//! Constants for file extensions, route layouts and resolution strategies.
//!
//! Resolution follows the conventions of bundler-less front-end trees:
//! a specifier naming a directory resolves to its index file, otherwise the
//! path is tried verbatim and then with each extension in [`RESOLVE_EXTENSIONS`].

/// Extensions to try when resolving module specifiers (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Index file names to try when a specifier names a directory (in priority order)
pub const INDEX_FILES: &[&str] = &["index.js", "index.jsx", "index.ts", "index.tsx"];

/// Extensions of server route files considered by the implementation matcher
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Only calls whose path starts with this prefix count as API endpoints
pub const API_PREFIX: &str = "/api/";

/// Manifest file marking a project root
pub const PROJECT_MARKER: &str = "package.json";

/// Conventional API route directories relative to the project root, scanned in order.
pub const API_ROUTE_DIRS: &[&str] = &[
    "pages/api",     // Next.js pages router
    "app/api",       // Next.js app router
    "api",           // Express
    "routes/api",    // Express alternative
    "src/api",       // src/ layout
    "src/pages/api", // pages router under src/
    "src/app/api",   // app router under src/
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_files_follow_extension_order() {
        assert_eq!(INDEX_FILES.len(), RESOLVE_EXTENSIONS.len());
        for (index, ext) in INDEX_FILES.iter().zip(RESOLVE_EXTENSIONS) {
            assert_eq!(*index, format!("index.{}", ext));
        }
    }

    #[test]
    fn test_js_probed_before_jsx() {
        let js = RESOLVE_EXTENSIONS.iter().position(|e| *e == "js").unwrap();
        let jsx = RESOLVE_EXTENSIONS.iter().position(|e| *e == "jsx").unwrap();
        assert!(js < jsx);
    }

    #[test]
    fn test_route_dirs_cover_src_layouts() {
        for dir in ["pages/api", "app/api"] {
            assert!(API_ROUTE_DIRS.contains(&dir));
            let under_src = format!("src/{}", dir);
            assert!(API_ROUTE_DIRS.contains(&under_src.as_str()));
        }
    }

    #[test]
    fn test_api_prefix_is_rooted() {
        assert!(API_PREFIX.starts_with('/'));
        assert!(API_PREFIX.ends_with('/'));
    }
}
