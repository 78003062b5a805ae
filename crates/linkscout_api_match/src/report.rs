use anyhow::{Context, Result};
use linkscout_core::{HttpMethod, NormalizedRoute};
use log::debug;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::checker::AnalysisOutcome;

const LINKED_PREVIEW_CHARS: usize = 100;
const IMPLEMENTATION_PREVIEW_CHARS: usize = 200;
const HANDLER_PREVIEW_LINES: usize = 5;

/// The persisted result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub main_file: PathBuf,
    pub project_root: PathBuf,
    /// Local import specifiers of the entry file, as written
    pub imports: Vec<String>,
    pub linked_files: Vec<LinkedFileReport>,
    pub unresolved: Vec<String>,
    pub api_endpoints: Vec<EndpointReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkedFileReport {
    pub import_path: String,
    pub abs_path: PathBuf,
    pub preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub method: HttpMethod,
    pub endpoint: String,
    pub normalized: NormalizedRoute,
    pub file: PathBuf,
    pub dynamic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
    pub implementations: Vec<ImplementationReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImplementationReport {
    pub file: PathBuf,
    pub method: HttpMethod,
    pub preview: String,
    pub handler_preview: Vec<String>,
}

impl AnalysisReport {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let graph = &outcome.graph;

        let linked_files = graph
            .linked()
            .iter()
            .map(|record| LinkedFileReport {
                import_path: record.via.clone().unwrap_or_default(),
                abs_path: record.path.clone(),
                preview: record.preview(LINKED_PREVIEW_CHARS),
            })
            .collect();

        let api_endpoints = outcome
            .structure
            .entries()
            .map(|entry| EndpointReport {
                method: entry.method,
                endpoint: entry.endpoint.clone(),
                normalized: entry.normalized.clone(),
                file: entry.file.clone(),
                dynamic: entry.dynamic,
                variables: entry.dynamic.then(|| entry.variables.clone()),
                implementations: outcome
                    .matches
                    .for_endpoint(&entry.normalized, entry.method)
                    .map(|c| ImplementationReport {
                        file: c.path.clone(),
                        method: c.method,
                        preview: c.content.chars().take(IMPLEMENTATION_PREVIEW_CHARS).collect(),
                        handler_preview: handler_preview(&c.content, c.method),
                    })
                    .collect(),
            })
            .collect();

        Self {
            main_file: outcome.entry.clone(),
            project_root: outcome.project_root.clone(),
            imports: graph.local_specifiers().map(str::to_string).collect(),
            linked_files,
            unresolved: graph.unresolved().to_vec(),
            api_endpoints,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize analysis report")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        debug!("Writing analysis report to {}", path.display());
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Up to five lines starting at the first line mentioning `method` (any case).
/// The last line of the file never starts a preview.
pub(crate) fn handler_preview(content: &str, method: HttpMethod) -> Vec<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let needle = method.as_str();

    lines
        .iter()
        .enumerate()
        .take(lines.len().saturating_sub(1))
        .find(|(_, line)| line.to_ascii_lowercase().contains(needle))
        .map(|(start, _)| {
            lines[start..]
                .iter()
                .take(HANDLER_PREVIEW_LINES)
                .map(|line| line.trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}
