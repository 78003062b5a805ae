use ignore::WalkBuilder;
use linkscout_core::{API_ROUTE_DIRS, HttpMethod, SOURCE_EXTENSIONS};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use regex::Regex;
use std::{
    fs,
    path::{Component, Path, PathBuf},
    sync::LazyLock,
};

use crate::types::{ImplementationCandidate, RouteMatches, RouteQuery};

/// `app.get(` / `router.post(` in any case, or an exported upper-case handler
/// such as `export async function GET`.
static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:\b(?:app|router)\s*\.\s*(?P<call>get|post|put|delete|patch)\s*\()|\bexport\s+(?:async\s+)?function\s+(?P<handler>GET|POST|PUT|DELETE|PATCH)\b",
    )
    .expect("method pattern must compile")
});

#[derive(Debug)]
struct RouteFile {
    path: PathBuf,
    implied: String,
}

/// Searches the conventional API directories under `project_root` for files
/// implementing the queried routes.
///
/// A file is associated with a route when its implied route path and the
/// route's tail below `/api` contain one another, and it declares the queried
/// method. The association is a likely match, not a guarantee.
pub fn find_implementations(project_root: &Path, queries: &[RouteQuery]) -> RouteMatches {
    info!("Searching for API implementations in {}", project_root.display());
    let mut matches = RouteMatches::default();

    let targets: Vec<(&RouteQuery, String)> =
        queries.iter().filter_map(|q| q.route.api_tail().map(|tail| (q, tail))).collect();
    if targets.is_empty() {
        debug!("No API routes to search for");
        return matches;
    }

    let files = collect_route_files(project_root);
    let relevant: Vec<&RouteFile> = files
        .iter()
        .filter(|f| targets.iter().any(|(_, tail)| path_matches(&f.implied, tail)))
        .collect();
    debug!("{} of {} route files pass the path heuristic", relevant.len(), files.len());

    // Read and scan in parallel; collect keeps walk order
    let scanned: Vec<(&RouteFile, String, Vec<HttpMethod>)> = relevant
        .par_iter()
        .filter_map(|file| match fs::read_to_string(&file.path) {
            Ok(content) => {
                let methods = declared_methods(&content);
                Some((*file, content, methods))
            }
            Err(e) => {
                warn!("Error reading {}: {}", file.path.display(), e);
                None
            }
        })
        .collect();

    for (file, content, methods) in &scanned {
        for (query, tail) in &targets {
            if !path_matches(&file.implied, tail) || !methods.contains(&query.method) {
                continue;
            }
            trace!("{} implements {} {}", file.path.display(), query.method, query.route);
            matches.push(
                &query.route,
                ImplementationCandidate {
                    path: file.path.clone(),
                    content: content.clone(),
                    method: query.method,
                    implied_route: file.implied.clone(),
                },
            );
        }
    }

    info!("Matched implementations for {} routes", matches.len());
    matches
}

fn path_matches(implied: &str, tail: &str) -> bool {
    implied.contains(tail) || tail.contains(implied)
}

fn collect_route_files(project_root: &Path) -> Vec<RouteFile> {
    let mut files = Vec::new();

    for dir in API_ROUTE_DIRS {
        let base = project_root.join(dir);
        if !base.is_dir() {
            trace!("Route directory does not exist: {}", base.display());
            continue;
        }
        debug!("Walking route directory: {}", base.display());

        let walker = WalkBuilder::new(&base)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for res in walker {
            let dent = match res {
                Ok(dent) => dent,
                Err(e) => {
                    warn!("Error walking {}: {}", base.display(), e);
                    continue;
                }
            };
            let p = dent.path();
            if !dent.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let is_source = p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
            if !is_source {
                continue;
            }
            if let Ok(rel) = p.strip_prefix(&base) {
                let implied = implied_route_path(rel);
                trace!("Route file {} implies '{}'", p.display(), implied);
                files.push(RouteFile { path: p.to_path_buf(), implied });
            }
        }
    }

    debug!("Collected {} route files", files.len());
    files
}

/// `users/[id]/index.ts` → `users/[id]`, `files/route.js` → `files/route`.
pub fn implied_route_path(rel: &Path) -> String {
    let stem = rel.with_extension("");
    let implied = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    match implied.strip_suffix("/index") {
        Some(parent) => parent.to_string(),
        None => implied,
    }
}

/// HTTP methods a route file declares, in order of appearance.
pub fn declared_methods(content: &str) -> Vec<HttpMethod> {
    METHOD_RE
        .captures_iter(content)
        .filter_map(|caps| caps.name("call").or_else(|| caps.name("handler")))
        .filter_map(|m| HttpMethod::parse(m.as_str()))
        .collect()
}
