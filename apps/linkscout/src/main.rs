use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use linkscout_api_match::{AnalysisReport, Config};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "linkscout")]
#[command(about = "Static link and API endpoint analysis for front-end source trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve an entry file's local imports and match its API calls to route handlers
    Analyze(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Analyze(cfg) => {
            info!("Analyzing {}", cfg.entry.display());
            let output = cfg.output.clone();

            let outcome = linkscout_api_match::run_api_analysis(cfg)?;
            linkscout_api_match::print_analysis(&mut stdout, &outcome)?;

            AnalysisReport::from_outcome(&outcome).write_to(&output)?;

            writeln!(
                stdout,
                "\n{} Full analysis saved to {} in {}ms ({} files).",
                "●".bright_blue(),
                output.display().to_string().cyan(),
                start.elapsed().as_millis().to_string().cyan(),
                outcome.graph.records().count().to_string().cyan()
            )?;
            stdout.flush()?;

            Ok(())
        }
    }
}
