use linkscout_core::{LinkGraph, normalize};
use log::{debug, trace};
use std::collections::HashMap;

use crate::types::{EndpointEntry, RouteQuery};

/// Endpoints sharing a `/<first>/<second>` base path, e.g. `/api/files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiGroup {
    pub base_path: String,
    pub entries: Vec<EndpointEntry>,
}

/// API calls of a link graph grouped by base path, groups in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiStructure {
    groups: Vec<ApiGroup>,
}

impl ApiStructure {
    /// Flattens every record's calls (entry first) and groups them in one pass.
    pub fn from_graph(graph: &LinkGraph) -> Self {
        let entries = graph.endpoints().map(|call| EndpointEntry {
            method: call.method,
            endpoint: call.raw_path.clone(),
            normalized: normalize(call),
            file: call.file.clone(),
            dynamic: call.dynamic,
            variables: call.variables.clone(),
        });
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = EndpointEntry>) -> Self {
        let mut groups: Vec<ApiGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            let Some(base_path) = base_path(&entry.endpoint) else {
                trace!("No base path for '{}', skipping", entry.endpoint);
                continue;
            };
            let idx = *index.entry(base_path.clone()).or_insert_with(|| {
                groups.push(ApiGroup { base_path, entries: Vec::new() });
                groups.len() - 1
            });
            groups[idx].entries.push(entry);
        }

        debug!("Grouped endpoints into {} API groups", groups.len());
        Self { groups }
    }

    pub fn groups(&self) -> &[ApiGroup] {
        &self.groups
    }

    pub fn entries(&self) -> impl Iterator<Item = &EndpointEntry> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    /// Distinct (route, method) pairs in first-appearance order.
    pub fn route_queries(&self) -> Vec<RouteQuery> {
        let mut queries: Vec<RouteQuery> = Vec::new();
        for entry in self.entries() {
            let query = RouteQuery { route: entry.normalized.clone(), method: entry.method };
            if !queries.contains(&query) {
                queries.push(query);
            }
        }
        queries
    }
}

fn base_path(endpoint: &str) -> Option<String> {
    let parts: Vec<&str> = endpoint.trim_matches('/').split('/').collect();
    if parts.len() > 1 { Some(format!("/{}/{}", parts[0], parts[1])) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkscout_core::{HttpMethod, normalize_path};
    use std::path::PathBuf;

    fn entry(method: HttpMethod, endpoint: &str, file: &str) -> EndpointEntry {
        EndpointEntry {
            method,
            endpoint: endpoint.to_string(),
            normalized: normalize_path(endpoint),
            file: PathBuf::from(file),
            dynamic: endpoint.contains("${"),
            variables: Vec::new(),
        }
    }

    #[test]
    fn test_base_path() {
        assert_eq!(base_path("/api/files").as_deref(), Some("/api/files"));
        assert_eq!(base_path("/api/user/${id}/posts").as_deref(), Some("/api/user"));
        assert_eq!(base_path("/api/"), None);
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let structure = ApiStructure::from_entries(vec![
            entry(HttpMethod::Get, "/api/files", "page.js"),
            entry(HttpMethod::Post, "/api/savePatch", "Editor.js"),
            entry(HttpMethod::Get, "/api/files/${name}", "Sidebar.js"),
            entry(HttpMethod::Get, "/api/", "page.js"),
        ]);

        let bases: Vec<_> = structure.groups().iter().map(|g| g.base_path.as_str()).collect();
        assert_eq!(bases, vec!["/api/files", "/api/savePatch"]);
        assert_eq!(structure.groups()[0].entries.len(), 2);
        assert_eq!(structure.entries().count(), 3);
    }

    #[test]
    fn test_route_queries_are_distinct() {
        let structure = ApiStructure::from_entries(vec![
            entry(HttpMethod::Get, "/api/files", "page.js"),
            entry(HttpMethod::Get, "/api/files/", "Sidebar.js"),
            entry(HttpMethod::Post, "/api/files", "Editor.js"),
        ]);

        let queries = structure.route_queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].method, HttpMethod::Get);
        assert_eq!(queries[1].method, HttpMethod::Post);
        assert_eq!(queries[0].route.as_str(), "/api/files");
    }
}
