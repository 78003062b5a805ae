//! Core utilities for linkscout.
//!
//! This crate provides the text-level analysis shared by the linkscout tools:
//! - Extracting import/export specifiers from JS/TS source text
//! - Resolving local specifiers to files on disk (extension and index probing)
//! - Extracting HTTP client calls and normalizing their paths into routes
//! - Building the one-level link graph of an entry file
//! - Locating the project root from an entry file

mod collector;
mod config;
mod constants;
mod endpoints;
mod parser;
mod resolver;
mod types;

// Re-export public API
pub use collector::{FileRecord, LinkGraph, LinkGraphBuilder};
pub use config::{absolutize, find_project_root};
pub use constants::{
    API_PREFIX, API_ROUTE_DIRS, INDEX_FILES, PROJECT_MARKER, RESOLVE_EXTENSIONS, SOURCE_EXTENSIONS,
};
pub use endpoints::{EndpointExtractor, extract_endpoints, normalize, normalize_path};
pub use parser::{
    AstImportExtractor, ImportExtractor, ImportScannerKind, RegexImportExtractor,
    extract_specifiers,
};
pub use resolver::{Resolver, is_local_request, resolve};
pub use types::{EndpointCall, HttpMethod, ModuleSpecifier, NormalizedRoute, ResolvedLink};
