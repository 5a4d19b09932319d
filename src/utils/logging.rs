//! Diagnostic logging.
//!
//! The TUI owns the terminal, so tracing output only ever goes to a file.
//! Filtering follows the `ANALISTA_LOG` environment variable with the usual
//! `EnvFilter` directive syntax.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "ANALISTA_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Filter from `ANALISTA_LOG`, or `info` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install a global subscriber appending to `path`.
///
/// Without a path nothing is installed and the tracing macros stay no-ops.
pub fn init_file_logging(path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_installs_nothing() {
        assert!(init_file_logging(None).is_ok());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let missing_parent = dir.path().join("missing").join("analista.log");
        assert!(init_file_logging(Some(&missing_parent)).is_err());
    }
}
