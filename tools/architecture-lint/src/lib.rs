//! Repo-local architectural lint for the customer backend's layering.
//!
//! The backend is split into four module trees. The lint parses every source
//! file under them and rejects imports that cross a boundary:
//!
//! - `domain` depends on none of `application`, `inbound` or `outbound`, and
//!   on no runtime wiring crates
//! - `application` orchestrates the domain and knows no adapters
//! - `inbound` adapters drive the application but never reach into
//!   `outbound`
//! - `outbound` adapters implement domain ports without seeing callers
//!
//! Unit test modules (`tests.rs`) are exempt because they wire real adapters
//! together. The lint runs via `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::Token;
use thiserror::Error;

const LAYER_DIRS: [&str; 4] = ["domain", "application", "inbound", "outbound"];
const TEST_MODULE_FILE: &str = "tests.rs";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// Rust source parsing failed.
    #[error("failed to parse {} while linting architecture: {message}", file.display())]
    Parse {
        /// Offending file relative to `backend/src`.
        file: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

impl ArchitectureLintError {
    /// Violations carried by this error, if any.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Violations(violations) => violations,
            Self::Io(_) | Self::Parse { .. } => &[],
        }
    }
}

fn render_violations(violations: &[Violation]) -> String {
    let mut rendered = String::from("Architecture boundary violations:");
    for violation in violations {
        rendered.push_str("\n- ");
        rendered.push_str(&violation.to_string());
    }
    rendered
}

/// Lint the backend crate sources on disk.
///
/// `backend_dir` must be the `backend/` directory at the repository root.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] when an import crosses a
/// layer boundary, or an I/O or parse error when a source cannot be read.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = backend_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources.
///
/// # Errors
///
/// Fails like [`lint_backend_sources`], and with a parse error for files
/// outside the four layer directories.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources.iter().filter(|source| !source.is_test_module()) {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer module layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

impl LintSource {
    fn is_test_module(&self) -> bool {
        self.file
            .file_name()
            .is_some_and(|name| name == TEST_MODULE_FILE)
    }
}

/// The architectural layer inferred from a file path under `backend/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Application,
    Inbound,
    Outbound,
}

impl ModuleLayer {
    fn infer_from_path(relative_path: &Path) -> Option<Self> {
        let first = relative_path
            .components()
            .next()?
            .as_os_str()
            .to_string_lossy();
        match first.as_ref() {
            "domain" => Some(Self::Domain),
            "application" => Some(Self::Application),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Application => "application",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_module_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from(["application", "inbound", "outbound"]),
            Self::Application => BTreeSet::from(["inbound", "outbound"]),
            Self::Inbound => BTreeSet::from(["outbound"]),
            Self::Outbound => BTreeSet::from(["application", "inbound"]),
        }
    }

    fn forbidden_crate_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain | Self::Application => BTreeSet::from([
                "clap",
                "color_eyre",
                "ortho_config",
                "tracing_subscriber",
            ]),
            Self::Inbound => BTreeSet::from(["color_eyre", "tracing_subscriber"]),
            Self::Outbound => BTreeSet::from(["clap", "color_eyre", "ortho_config"]),
        }
    }
}

fn lint_parsed_source(file: &Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_modules = layer.forbidden_module_roots();
    let forbidden_crates = layer.forbidden_crate_roots();

    let mut collector = RootCollector::default();
    collector.visit_file(parsed);

    collector
        .roots
        .iter()
        .filter_map(|root| match root {
            Dependency::Module(name) if forbidden_modules.contains(name.as_str()) => {
                Some(format!("{} module must not depend on crate::{name}", layer.name()))
            }
            Dependency::Crate(name) if forbidden_crates.contains(name.as_str()) => Some(format!(
                "{} module must not depend on external crate `{name}`",
                layer.name()
            )),
            Dependency::Module(_) | Dependency::Crate(_) => None,
        })
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

/// What a path's leading segments point at.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Dependency {
    /// A top-level module of the backend crate.
    Module(String),
    /// Another crate.
    Crate(String),
}

impl Dependency {
    fn resolve(segments: &[String]) -> Option<Self> {
        let (first, rest) = segments.split_first()?;
        if LAYER_DIRS.contains(&first.as_str()) {
            return Some(Self::Module(first.clone()));
        }
        match first.as_str() {
            "crate" | "self" | "super" => rest
                .iter()
                .find(|segment| !matches!(segment.as_str(), "self" | "super"))
                .map(|module| Self::Module(module.clone())),
            "backend" => rest.first().map(|module| Self::Module(module.clone())),
            _ => Some(Self::Crate(first.clone())),
        }
    }
}

/// Gathers the dependency roots of every path and `use` tree in a file.
#[derive(Default)]
struct RootCollector {
    roots: BTreeSet<Dependency>,
}

impl RootCollector {
    fn record(&mut self, segments: &[String]) {
        self.roots.extend(Dependency::resolve(segments));
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                prefix.push(ident.to_string());
                self.record(prefix);
                prefix.pop();
            }
            syn::UseTree::Glob(_) => self.record(prefix),
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix);
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for RootCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        self.record(&segments);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, &mut Vec::new());
    }

    // Derive lists are opaque tokens to the visitor; parse them as paths.
    fn visit_attribute(&mut self, node: &'ast syn::Attribute) {
        if node.path().is_ident("derive")
            && let Ok(derived) =
                node.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        {
            for path in &derived {
                self.visit_path(path);
            }
        }
        syn::visit::visit_attribute(self, node);
    }
}

fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut pending: Vec<PathBuf> = LAYER_DIRS
        .iter()
        .map(|layer| src_dir.join(layer))
        .filter(|dir| dir.is_dir())
        .collect();
    let mut sources = Vec::new();

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                sources.push(read_source(src_dir, &path)?);
            }
        }
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}

fn read_source(src_dir: &Path, path: &Path) -> Result<LintSource, ArchitectureLintError> {
    let file = path
        .strip_prefix(src_dir)
        .map_err(|err| ArchitectureLintError::Parse {
            file: path.to_path_buf(),
            message: err.to_string(),
        })?
        .to_path_buf();
    let contents = fs::read_to_string(path)?;
    Ok(LintSource { file, contents })
}

#[cfg(test)]
mod tests;
