use linkscout_core::{HttpMethod, NormalizedRoute};
use std::path::PathBuf;

/// A server-side file believed to implement a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationCandidate {
    pub path: PathBuf,
    pub content: String,
    pub method: HttpMethod,
    /// Route implied by the file's location under its route directory
    pub implied_route: String,
}

/// A normalized route and the method it is called with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteQuery {
    pub route: NormalizedRoute,
    pub method: HttpMethod,
}

/// Route → candidates, in first-match order. Lookups for routes that never
/// matched return an empty slice.
#[derive(Debug, Clone, Default)]
pub struct RouteMatches {
    entries: Vec<(NormalizedRoute, Vec<ImplementationCandidate>)>,
}

impl RouteMatches {
    pub(crate) fn push(&mut self, route: &NormalizedRoute, candidate: ImplementationCandidate) {
        let idx = match self.entries.iter().position(|(r, _)| r == route) {
            Some(idx) => idx,
            None => {
                self.entries.push((route.clone(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let candidates = &mut self.entries[idx].1;
        let duplicate =
            candidates.iter().any(|c| c.path == candidate.path && c.method == candidate.method);
        if !duplicate {
            candidates.push(candidate);
        }
    }

    pub fn get(&self, route: &NormalizedRoute) -> &[ImplementationCandidate] {
        self.entries
            .iter()
            .find(|(r, _)| r == route)
            .map(|(_, c)| c.as_slice())
            .unwrap_or(&[])
    }

    /// Candidates for `route` declaring `method`.
    pub fn for_endpoint(
        &self,
        route: &NormalizedRoute,
        method: HttpMethod,
    ) -> impl Iterator<Item = &ImplementationCandidate> {
        self.get(route).iter().filter(move |c| c.method == method)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedRoute, &[ImplementationCandidate])> {
        self.entries.iter().map(|(r, c)| (r, c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One API call flattened out of the link graph for grouping and reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointEntry {
    pub method: HttpMethod,
    pub endpoint: String,
    pub normalized: NormalizedRoute,
    pub file: PathBuf,
    pub dynamic: bool,
    pub variables: Vec<String>,
}
