use anyhow::{Context, Result, bail};
use log::{debug, info, trace, warn};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::absolutize,
    endpoints::EndpointExtractor,
    parser::ImportExtractor,
    resolver::{Resolver, is_local_request},
    types::{EndpointCall, ModuleSpecifier, ResolvedLink},
};

/// One analyzed source file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub content: String,
    /// Outgoing specifiers; only populated for the entry file
    pub specifiers: Vec<ModuleSpecifier>,
    pub endpoints: Vec<EndpointCall>,
    /// The specifier that led to this file; `None` for the entry file
    pub via: Option<String>,
}

impl FileRecord {
    pub fn is_entry(&self) -> bool {
        self.via.is_none()
    }

    /// The first `max_chars` characters of the content.
    pub fn preview(&self, max_chars: usize) -> String {
        self.content.chars().take(max_chars).collect()
    }
}

/// The entry file plus the files its local specifiers resolve to (one level deep).
#[derive(Debug, Clone)]
pub struct LinkGraph {
    entry: FileRecord,
    linked: Vec<FileRecord>,
    links: Vec<ResolvedLink>,
    unresolved: Vec<String>,
}

impl LinkGraph {
    pub fn entry(&self) -> &FileRecord {
        &self.entry
    }

    pub fn linked(&self) -> &[FileRecord] {
        &self.linked
    }

    /// Entry first, then linked files in specifier order.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        std::iter::once(&self.entry).chain(self.linked.iter())
    }

    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.records().find(|r| r.path == path)
    }

    /// Every successful resolution, including ones pointing at an already recorded file.
    pub fn links(&self) -> &[ResolvedLink] {
        &self.links
    }

    /// Local specifiers of the entry file with no loaded record, duplicates kept.
    ///
    /// Covers specifiers that did not resolve and ones whose target could not be read.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub fn local_specifiers(&self) -> impl Iterator<Item = &str> {
        self.entry.specifiers.iter().map(|s| s.request.as_str()).filter(|r| is_local_request(r))
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointCall> {
        self.records().flat_map(|r| r.endpoints.iter())
    }
}

pub struct LinkGraphBuilder<'a> {
    imports: &'a dyn ImportExtractor,
    endpoints: &'a EndpointExtractor,
    resolver: &'a Resolver,
}

impl<'a> LinkGraphBuilder<'a> {
    pub fn new(
        imports: &'a dyn ImportExtractor,
        endpoints: &'a EndpointExtractor,
        resolver: &'a Resolver,
    ) -> Self {
        Self { imports, endpoints, resolver }
    }

    /// Loads `entry`, resolves its local specifiers and loads each resolved file.
    ///
    /// Fails only when the entry file is missing or unreadable. Linked files'
    /// own imports are not followed.
    pub fn build(&self, entry: &Path) -> Result<LinkGraph> {
        if !entry.exists() {
            bail!("File {} not found", entry.display());
        }
        let entry = absolutize(entry)?;
        info!("Building link graph for {}", entry.display());

        let content = fs::read_to_string(&entry)
            .with_context(|| format!("Failed to read {}", entry.display()))?;
        let source_dir = entry.parent().map(Path::to_path_buf).unwrap_or_default();

        let specifiers: Vec<ModuleSpecifier> = self
            .imports
            .extract(&content, &entry)
            .into_iter()
            .map(|request| ModuleSpecifier { request, from_file: entry.clone() })
            .collect();
        debug!("Entry has {} specifiers", specifiers.len());

        let mut links = Vec::new();
        let mut unresolved = Vec::new();
        let mut linked = Vec::new();
        let mut recorded: HashSet<PathBuf> = HashSet::from([entry.clone()]);

        for spec in specifiers.iter().filter(|s| is_local_request(&s.request)) {
            let Some(path) = self.resolver.resolve(&spec.request, &source_dir) else {
                trace!("Could not resolve import: '{}'", spec.request);
                unresolved.push(spec.request.clone());
                continue;
            };
            links.push(ResolvedLink { specifier: spec.request.clone(), path: path.clone() });

            if !recorded.insert(path.clone()) {
                trace!("{} already recorded, skipping '{}'", path.display(), spec.request);
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(text) => {
                    let endpoints = self.endpoints.extract(&text, &path);
                    linked.push(FileRecord {
                        path,
                        content: text,
                        specifiers: Vec::new(),
                        endpoints,
                        via: Some(spec.request.clone()),
                    });
                }
                Err(e) => {
                    warn!("Error reading {}: {}", path.display(), e);
                    unresolved.push(spec.request.clone());
                }
            }
        }

        let endpoints = self.endpoints.extract(&content, &entry);
        let entry_record =
            FileRecord { path: entry, content, specifiers, endpoints, via: None };

        info!(
            "Link graph complete: {} linked files, {} unresolved imports",
            linked.len(),
            unresolved.len()
        );
        Ok(LinkGraph { entry: entry_record, linked, links, unresolved })
    }
}
