use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use regex::Regex;
use std::{path::Path, str::FromStr, sync::LazyLock};

/// `import`/`export`, an optional binding clause ending in `from`, then a quoted specifier.
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:import|export)\s+(?:[\w$*\s{},]*\s+from\s+)?['"]([^'"]+)['"]"#)
        .expect("import pattern must compile")
});

/// Yields the module specifiers referenced by a source file, in order of appearance.
///
/// Specifiers are returned exactly as written; duplicates are kept and no
/// local/external filtering happens here.
pub trait ImportExtractor: Send + Sync {
    fn extract(&self, source: &str, file: &Path) -> Vec<String>;
}

/// Tolerant pattern matching over raw text. May pick up import-like text
/// inside comments or strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexImportExtractor;

impl ImportExtractor for RegexImportExtractor {
    fn extract(&self, source: &str, file: &Path) -> Vec<String> {
        let specs = extract_specifiers(source);
        debug!("Found {} import specifiers in {}", specs.len(), file.display());
        specs
    }
}

pub fn extract_specifiers(source: &str) -> Vec<String> {
    IMPORT_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            trace!("Found specifier: '{}'", m.as_str());
            m.as_str().trim().to_string()
        })
        .collect()
}

/// Parses the file with oxc and reads the source literal of every top-level
/// import and re-export declaration.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstImportExtractor;

impl ImportExtractor for AstImportExtractor {
    fn extract(&self, source: &str, file: &Path) -> Vec<String> {
        let allocator = Allocator::default();
        let ParserReturn { program, errors, panicked, .. } =
            OxcParser::new(&allocator, source, source_type_for(file)).parse();

        if panicked {
            debug!("Parser gave up on {}, no specifiers extracted", file.display());
            return Vec::new();
        }
        if !errors.is_empty() {
            debug!("{} recoverable parse errors in {}", errors.len(), file.display());
        }

        let mut specs = Vec::new();
        for stmt in &program.body {
            let declared = match stmt {
                Statement::ImportDeclaration(decl) => Some(&decl.source),
                Statement::ExportNamedDeclaration(decl) => decl.source.as_ref(),
                Statement::ExportAllDeclaration(decl) => Some(&decl.source),
                _ => None,
            };
            if let Some(lit) = declared {
                trace!("Found declaration source: '{}' in {}", lit.value, file.display());
                specs.push(lit.value.to_string());
            }
        }

        debug!("Found {} import specifiers in {}", specs.len(), file.display());
        specs
    }
}

fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    SourceType::default()
        .with_module(true)
        .with_jsx(matches!(ext, Some("js") | Some("jsx") | Some("tsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx")))
}

/// Which [`ImportExtractor`] to run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ImportScannerKind {
    #[default]
    Regex,
    Ast,
}

impl ImportScannerKind {
    pub fn extractor(&self) -> Box<dyn ImportExtractor> {
        match self {
            ImportScannerKind::Regex => Box::new(RegexImportExtractor),
            ImportScannerKind::Ast => Box::new(AstImportExtractor),
        }
    }
}

impl FromStr for ImportScannerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regex" => Ok(ImportScannerKind::Regex),
            "ast" => Ok(ImportScannerKind::Ast),
            other => Err(format!("unknown import scanner '{}' (expected 'regex' or 'ast')", other)),
        }
    }
}
