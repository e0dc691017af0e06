//! CLI entry point for the layer lint.
//!
//! Usage: `architecture-lint [CRATE_DIR]`. Without an argument the `backend`
//! crate of the enclosing workspace is checked.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const BACKEND_CRATE_DIR: &str = "backend";

fn main() -> ExitCode {
    let outcome = crate_dir()
        .map_err(|err| err.to_string())
        .and_then(|dir| {
            architecture_lint::lint_backend_sources(&dir).map_err(|err| err.to_string())
        });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(io::stderr().lock(), "{message}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MissingCrateDir;

impl fmt::Display for MissingCrateDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no `{BACKEND_CRATE_DIR}/src` found above the current directory; pass the crate directory explicitly"
        )
    }
}

impl std::error::Error for MissingCrateDir {}

fn crate_dir() -> Result<PathBuf, MissingCrateDir> {
    if let Some(explicit) = std::env::args_os().nth(1) {
        return Ok(PathBuf::from(explicit));
    }
    let starts = [
        std::env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    starts
        .iter()
        .flatten()
        .find_map(|start| backend_above(start))
        .ok_or(MissingCrateDir)
}

fn backend_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(BACKEND_CRATE_DIR))
        .find(|candidate| candidate.join("src").is_dir())
}
