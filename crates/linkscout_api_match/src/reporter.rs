use std::{
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use log::debug;

use crate::{checker::AnalysisOutcome, report::handler_preview};

const LINKED_PREVIEW_CHARS: usize = 100;

/// Relative path from `base` to `target`, going up with `..` where needed.
/// `None` when the two share no root.
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    if target_parts.first() != base_parts.first() {
        return None;
    }
    let common = target_parts.iter().zip(&base_parts).take_while(|(t, b)| t == b).count();

    let mut result = PathBuf::new();
    for _ in common..base_parts.len() {
        result.push("..");
    }
    for component in &target_parts[common..] {
        result.push(component.as_os_str());
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

fn display_relative(target: &Path, base: &Path) -> String {
    make_relative(target, base).unwrap_or_else(|| target.to_path_buf()).display().to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

fn one_line_preview(content: &str) -> String {
    let mut preview: String =
        content.chars().take(LINKED_PREVIEW_CHARS).collect::<String>().replace('\n', " ");
    preview = preview.trim().to_string();
    if content.chars().count() > LINKED_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

pub fn print_analysis<W: Write>(writer: &mut W, outcome: &AnalysisOutcome) -> io::Result<()> {
    let graph = &outcome.graph;
    let root = &outcome.project_root;
    debug!("Printing analysis of {}", outcome.entry.display());

    writeln!(writer, "\n{} Analysis of {}:\n", "●".bright_blue(), outcome.entry.display())?;

    let imports: Vec<&str> = graph.local_specifiers().collect();
    writeln!(writer, "{} local imports:", imports.len().to_string().cyan())?;
    for spec in &imports {
        writeln!(writer, "  {} {}", "↪".dimmed(), spec)?;
    }

    writeln!(writer, "\nResolved {} linked files:", graph.linked().len().to_string().cyan())?;
    for record in graph.linked() {
        writeln!(
            writer,
            "\n{} {} → {}",
            "✓".green().bold(),
            record.via.as_deref().unwrap_or_default(),
            record.path.display().to_string().blue()
        )?;
        writeln!(writer, "   File size: {} characters", record.content.chars().count())?;
        writeln!(writer, "   Preview: {}", one_line_preview(&record.content).dimmed())?;
    }

    let endpoint_count = graph.endpoints().count();
    writeln!(
        writer,
        "\nFound {} API endpoints across all files:",
        endpoint_count.to_string().cyan()
    )?;

    for group in outcome.structure.groups() {
        writeln!(writer, "\n  API Group: {}", group.base_path.bold())?;
        for entry in &group.entries {
            let method = entry.method.to_string();
            if entry.dynamic {
                writeln!(
                    writer,
                    "    {} {} (dynamic, vars: {}) - in {}",
                    method.yellow(),
                    entry.endpoint,
                    entry.variables.join(", "),
                    file_name(&entry.file)
                )?;
            } else {
                writeln!(
                    writer,
                    "    {} {} - in {}",
                    method.yellow(),
                    entry.endpoint,
                    file_name(&entry.file)
                )?;
            }

            for candidate in outcome.matches.for_endpoint(&entry.normalized, entry.method) {
                writeln!(
                    writer,
                    "      {} Implementation: {}",
                    "⮕".green(),
                    display_relative(&candidate.path, root).blue()
                )?;

                let handler = handler_preview(&candidate.content, candidate.method);
                if handler.is_empty() {
                    writeln!(writer, "      {} Handler not found in file", "⮕".dimmed())?;
                } else {
                    writeln!(writer, "      {} Handler preview:", "⮕".green())?;
                    for line in handler {
                        writeln!(writer, "        {}", line.dimmed())?;
                    }
                }
            }
        }
    }

    let unresolved = graph.unresolved();
    if !unresolved.is_empty() {
        writeln!(
            writer,
            "\n{} Could not resolve {} files:",
            "⚠".yellow().bold(),
            unresolved.len().to_string().yellow()
        )?;
        for spec in unresolved {
            writeln!(writer, "  {} {}", "✗".red(), spec)?;
        }
    }

    writer.flush()?;
    Ok(())
}
