use anyhow::Result;
use linkscout_core::{EndpointExtractor, LinkGraph, LinkGraphBuilder, Resolver};
use log::{debug, info};
use std::path::PathBuf;

use crate::{
    config::Config, matcher::find_implementations, structure::ApiStructure, types::RouteMatches,
};

/// Everything one analysis run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub entry: PathBuf,
    pub project_root: PathBuf,
    pub graph: LinkGraph,
    pub structure: ApiStructure,
    pub matches: RouteMatches,
}

pub fn run_api_analysis(mut cfg: Config) -> Result<AnalysisOutcome> {
    info!("Starting API analysis");

    // Fails early when the entry file is missing
    cfg.initialize()?;
    let project_root = cfg.root()?.clone();

    let resolver = Resolver::new();
    let imports = cfg.import_scanner.extractor();
    let endpoints = EndpointExtractor::new(cfg.clients.clone());
    debug!("Import scanner: {:?}, clients: {:?}", cfg.import_scanner, cfg.clients);

    let graph = LinkGraphBuilder::new(imports.as_ref(), &endpoints, &resolver).build(&cfg.entry)?;

    let structure = ApiStructure::from_graph(&graph);
    let queries = structure.route_queries();
    debug!("Searching implementations for {} route queries", queries.len());

    let matches = find_implementations(&project_root, &queries);

    info!(
        "API analysis complete: {} files, {} endpoints, {} matched routes",
        graph.records().count(),
        structure.entries().count(),
        matches.len()
    );
    debug!("Resolver cache entries: {}", resolver.cached_entries());

    Ok(AnalysisOutcome { entry: cfg.entry, project_root, graph, structure, matches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkscout_core::{HttpMethod, PROJECT_MARKER, normalize_path};
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn config_for(entry: &Path) -> Config {
        let mut cfg = <Config as clap::Parser>::try_parse_from(["analyze"]).unwrap();
        cfg.entry = entry.to_path_buf();
        cfg
    }

    #[test]
    fn test_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("my-app");
        create_test_file(&root, PROJECT_MARKER, "{}");
        let entry = create_test_file(
            &root,
            "app/page.js",
            r#"import axios from 'axios';
import Sidebar from './components/Sidebar';
import { missing } from './components/Missing';

export default function Page() {
  useEffect(() => { axios.get('/api/files'); }, []);
}
"#,
        );
        create_test_file(
            &root,
            "app/components/Sidebar.js",
            "export default function Sidebar() { axios.post('/api/diff-save', body); }",
        );
        let files_route = create_test_file(
            &root,
            "app/api/files/route.js",
            "export async function GET(request) {}\nexport async function POST(request) {}",
        );
        let diff_route = create_test_file(
            &root,
            "app/api/diff-save/route.js",
            "export async function POST(req) {}",
        );

        let outcome = run_api_analysis(config_for(&entry)).unwrap();
        assert_eq!(outcome.entry, entry);
        assert_eq!(outcome.project_root, root);
        assert_eq!(outcome.graph.linked().len(), 1);
        assert_eq!(outcome.graph.unresolved(), ["./components/Missing".to_string()]);

        let bases: Vec<_> =
            outcome.structure.groups().iter().map(|g| g.base_path.as_str()).collect();
        assert_eq!(bases, vec!["/api/files", "/api/diff-save"]);

        let files: Vec<_> = outcome
            .matches
            .for_endpoint(&normalize_path("/api/files"), HttpMethod::Get)
            .map(|c| c.path.clone())
            .collect();
        assert_eq!(files, vec![files_route.clone()]);
        // Only the queried GET is recorded for /api/files, not the POST
        assert_eq!(outcome.matches.get(&normalize_path("/api/files")).len(), 1);

        let diff = outcome.matches.get(&normalize_path("/api/diff-save"));
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].path, diff_route);
    }

    #[test]
    fn test_missing_entry_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let result = run_api_analysis(config_for(&temp_dir.path().join("page.js")));
        assert!(result.is_err());
    }

    #[test]
    fn test_client_filter_applies() {
        let temp_dir = TempDir::new().unwrap();
        let entry = create_test_file(
            temp_dir.path(),
            "page.js",
            "axios.get('/api/a'); fetcher.get('/api/b');",
        );

        let mut cfg = config_for(&entry);
        cfg.clients = vec!["fetcher".to_string()];
        let outcome = run_api_analysis(cfg).unwrap();

        let endpoints: Vec<_> =
            outcome.structure.entries().map(|e| e.endpoint.as_str()).collect();
        assert_eq!(endpoints, vec!["/api/b"]);
    }
}
