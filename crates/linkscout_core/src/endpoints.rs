use log::{debug, trace};
use regex::{Captures, Regex};
use std::{path::Path, sync::LazyLock};

use crate::{
    constants::API_PREFIX,
    types::{EndpointCall, HttpMethod, NormalizedRoute},
};

/// `<client>.<method>(<literal>` where the literal is the whole first argument.
/// A path built by concatenation (`'/api/x/' + id`) is not followed by `,` or `)`
/// and therefore never matches.
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<client>[A-Za-z_$][\w$]*)\s*\.\s*(?P<method>get|post|put|delete|patch)\s*\(\s*(?:'(?P<single>[^'\n]*)'|"(?P<double>[^"\n]*)"|`(?P<template>[^`]*)`)\s*[,)]"#,
    )
    .expect("call pattern must compile")
});

static INTERPOLATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("interpolation pattern must compile"));

/// Finds HTTP client calls whose path starts with [`API_PREFIX`].
#[derive(Debug, Default, Clone)]
pub struct EndpointExtractor {
    /// Accepted client identifiers; empty accepts any identifier.
    clients: Vec<String>,
}

impl EndpointExtractor {
    pub fn new(clients: Vec<String>) -> Self {
        Self { clients }
    }

    fn accepts_client(&self, client: &str) -> bool {
        self.clients.is_empty() || self.clients.iter().any(|c| c == client)
    }

    pub fn extract(&self, source: &str, file: &Path) -> Vec<EndpointCall> {
        let mut calls = Vec::new();

        for caps in CALL_RE.captures_iter(source) {
            let client = &caps["client"];
            if !self.accepts_client(client) {
                trace!("Skipping call on unrecognized client '{}'", client);
                continue;
            }
            let Some(method) = HttpMethod::parse(&caps["method"]) else {
                continue;
            };

            let (path, is_template) = match (caps.name("single"), caps.name("double")) {
                (Some(m), _) | (None, Some(m)) => (m.as_str(), false),
                (None, None) => match caps.name("template") {
                    Some(m) => (m.as_str(), true),
                    None => continue,
                },
            };

            if !path.starts_with(API_PREFIX) {
                trace!("Ignoring non-API call {}.{}('{}')", client, method.as_str(), path);
                continue;
            }

            let variables: Vec<String> = if is_template {
                INTERPOLATION_RE.captures_iter(path).map(|c| c[1].to_string()).collect()
            } else {
                Vec::new()
            };

            trace!("Found endpoint {} {} in {}", method, path, file.display());
            calls.push(EndpointCall {
                method,
                raw_path: path.to_string(),
                dynamic: !variables.is_empty(),
                variables,
                file: file.to_path_buf(),
            });
        }

        debug!("Found {} API calls in {}", calls.len(), file.display());
        calls
    }
}

/// Extracts API calls made through any client identifier.
pub fn extract_endpoints(source: &str, file: &Path) -> Vec<EndpointCall> {
    EndpointExtractor::default().extract(source, file)
}

pub fn normalize(call: &EndpointCall) -> NormalizedRoute {
    normalize_path(&call.raw_path)
}

/// Replaces each `${expr}` with `:name` (the part of `expr` before the first `.`)
/// and rebuilds the path with a single leading slash and no empty segments.
pub fn normalize_path(raw: &str) -> NormalizedRoute {
    let substituted = INTERPOLATION_RE.replace_all(raw, |caps: &Captures| {
        let expr = &caps[1];
        let name = expr.split('.').next().unwrap_or(expr);
        format!(":{}", name)
    });

    let segments: Vec<&str> = substituted.split('/').filter(|s| !s.is_empty()).collect();
    NormalizedRoute(format!("/{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calls(src: &str) -> Vec<EndpointCall> {
        extract_endpoints(src, Path::new("page.js"))
    }

    #[test]
    fn test_static_call() {
        let found = calls("const res = await axios.get('/api/files');");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].method, HttpMethod::Get);
        assert_eq!(found[0].raw_path, "/api/files");
        assert!(!found[0].dynamic);
        assert!(found[0].variables.is_empty());
        assert_eq!(found[0].file, Path::new("page.js"));
    }

    #[test]
    fn test_quote_styles_and_arguments() {
        let src = r#"
            axios.post("/api/savePatch", { patch });
            axios.put(`/api/restoreVersion`, body);
        "#;
        let found = calls(src);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].method, HttpMethod::Post);
        assert_eq!(found[0].raw_path, "/api/savePatch");
        assert_eq!(found[1].method, HttpMethod::Put);
        assert!(!found[1].dynamic, "template without interpolation is static");
    }

    #[test]
    fn test_template_with_interpolations() {
        let found = calls("api.delete(`/api/user/${user.id}/posts/${postId}`)");
        assert_eq!(found.len(), 1);
        assert!(found[0].dynamic);
        assert_eq!(found[0].variables, vec!["user.id", "postId"]);
    }

    #[test]
    fn test_non_api_paths_ignored() {
        let src = "axios.get('/health'); axios.get('https://example.com/api/x'); axios.get('/api/ok');";
        let found = calls(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_path, "/api/ok");
    }

    #[test]
    fn test_concatenated_path_not_recognized() {
        assert!(calls("axios.get('/api/user/' + id);").is_empty());
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let src = "axios.get('/api/a'); axios.post('/api/b'); axios.get('/api/a');";
        let paths: Vec<_> = calls(src).into_iter().map(|c| c.raw_path).collect();
        assert_eq!(paths, vec!["/api/a", "/api/b", "/api/a"]);
    }

    #[test]
    fn test_client_filter() {
        let src = "axios.get('/api/a'); http.get('/api/b');";
        let only_axios = EndpointExtractor::new(vec!["axios".to_string()]);
        let found = only_axios.extract(src, Path::new("page.js"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_path, "/api/a");
    }

    #[test]
    fn test_unknown_verbs_ignored() {
        assert!(calls("axios.head('/api/a'); axios.options('/api/b');").is_empty());
    }

    #[test]
    fn test_normalize_static_path_unchanged() {
        let route = normalize_path("/api/users/42");
        assert_eq!(route.as_str(), "/api/users/42");
        assert_eq!(normalize_path(route.as_str()), route);
    }

    #[test]
    fn test_normalize_dynamic_path() {
        let route = normalize_path("/api/user/${user.id}/posts");
        assert_eq!(route.as_str(), "/api/user/:user/posts");
        assert_eq!(normalize_path(route.as_str()), route);
    }

    #[test]
    fn test_normalize_collapses_slashes() {
        assert_eq!(normalize_path("/api//files/").as_str(), "/api/files");
        assert_eq!(normalize_path("api/files").as_str(), "/api/files");
    }

    #[test]
    fn test_placeholder_collision_is_kept() {
        // Different expressions may share a placeholder; both keep their own name here
        assert_eq!(normalize_path("/api/user/${id}").as_str(), "/api/user/:id");
        assert_eq!(normalize_path("/api/user/${userId}").as_str(), "/api/user/:userId");
        assert_eq!(
            normalize_path("/api/user/${user.id}"),
            normalize_path("/api/user/${user.name}")
        );
    }

    #[test]
    fn test_normalize_call() {
        let found = calls("axios.patch(`/api/diff-save/${file.name}`, data)");
        assert_eq!(normalize(&found[0]).as_str(), "/api/diff-save/:file");
    }
}
