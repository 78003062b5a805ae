//! Endpoint-to-implementation matching for front-end source trees.
//!
//! Starting from one entry file, this crate collects the API calls made by the
//! entry and the files it imports, normalizes them into routes, and searches
//! the conventional API route directories of the project for handler files
//! declaring the same HTTP method.
//!
//! # Examples
//!
//! ```no_run
//! use linkscout_api_match::{AnalysisReport, Config, run_api_analysis};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     entry: std::path::PathBuf::from("my-app/app/page.js"),
//!     root: None,
//!     marker: "package.json".to_string(),
//!     output: std::path::PathBuf::from("api_analysis.json"),
//!     clients: vec!["axios".to_string()],
//!     import_scanner: Default::default(),
//! };
//!
//! let outcome = run_api_analysis(cfg.clone())?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! linkscout_api_match::print_analysis(&mut stdout, &outcome)?;
//! stdout.flush()?;
//!
//! AnalysisReport::from_outcome(&outcome).write_to(&cfg.output)?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod matcher;
mod report;
mod reporter;
mod structure;
mod types;

// Re-export public API
pub use checker::{AnalysisOutcome, run_api_analysis};
pub use config::{Config, DEFAULT_ENTRY, DEFAULT_REPORT_PATH};
pub use matcher::{declared_methods, find_implementations, implied_route_path};
pub use report::{AnalysisReport, EndpointReport, ImplementationReport, LinkedFileReport};
pub use reporter::print_analysis;
pub use structure::{ApiGroup, ApiStructure};
pub use types::{EndpointEntry, ImplementationCandidate, RouteMatches, RouteQuery};
