//! CLI entry point for the backend layering lint.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use thiserror::Error;

fn main() -> ExitCode {
    let outcome = repo_root()
        .map_err(|err| err.to_string())
        .and_then(|root| {
            architecture_lint::lint_backend_sources(&root.join("backend"))
                .map_err(|err| err.to_string())
        });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            drop(writeln!(io::stderr().lock(), "{message}"));
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy, Error)]
#[error("unable to locate workspace root (directory containing a workspace Cargo.toml)")]
struct RepoRootError;

fn repo_root() -> Result<PathBuf, RepoRootError> {
    let from_env = std::env::var("CARGO_WORKSPACE_DIR").ok().map(PathBuf::from);
    let from_cwd = std::env::current_dir().ok();
    let from_manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    [from_env, from_cwd, Some(from_manifest)]
        .iter()
        .flatten()
        .find_map(|start| find_workspace_root(start))
        .ok_or(RepoRootError)
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn declares_workspace(manifest: &Path) -> bool {
    fs::read_to_string(manifest)
        .ok()
        .is_some_and(|contents| contents.contains("[workspace]"))
}
