use anyhow::{Result, anyhow, bail};
use clap::Parser;
use linkscout_core::{ImportScannerKind, PROJECT_MARKER, absolutize, find_project_root};
use log::{debug, info};
use std::path::PathBuf;

pub const DEFAULT_ENTRY: &str = "../my-app/app/page.js";
pub const DEFAULT_REPORT_PATH: &str = "api_analysis.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "analyze")]
#[command(about = "Trace an entry file's local imports and API calls to their route handlers")]
pub struct Config {
    /// Entry source file to analyze
    #[arg(default_value = DEFAULT_ENTRY)]
    pub entry: PathBuf,

    /// Project root to search for route handlers (defaults to the nearest
    /// ancestor of the entry file containing the marker file)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Manifest file that marks the project root
    #[arg(long, default_value = PROJECT_MARKER)]
    pub marker: String,

    /// Where to write the JSON report
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// Only treat calls on these identifiers as HTTP clients (repeatable; default: any)
    #[arg(long = "client")]
    pub clients: Vec<String>,

    /// Import extraction strategy: `regex` or `ast`
    #[arg(long, default_value = "regex")]
    pub import_scanner: ImportScannerKind,
}

impl Config {
    /// Check the entry file exists, make it absolute and settle the project root.
    pub fn initialize(&mut self) -> Result<()> {
        if !self.entry.exists() {
            bail!("File {} not found", self.entry.display());
        }
        self.entry = absolutize(&self.entry)?;
        debug!("Using entry file: {}", self.entry.display());

        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            absolutize(&r)?
        } else {
            debug!("No root provided, searching for {}", self.marker);
            find_project_root(&self.entry, &self.marker)
        };
        info!("Using project root: {}", root.display());

        self.root = Some(root);
        Ok(())
    }

    /// Get the project root, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
