//! Tracing subscriber setup.
//!
//! One-shot commands log to stderr. The interactive timer owns the terminal,
//! so it logs to a file under the data directory instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::HookError;

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Filter used when `RUST_LOG` is not set.
#[must_use]
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,hook_timer=debug"
    } else {
        "warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. A second call is a no-op.
///
/// # Errors
///
/// Returns `HookError::Io` if the log file cannot be opened.
pub fn init(target: LogTarget<'_>, verbose: bool) -> Result<(), HookError> {
    let result = match target {
        LogTarget::Stderr => fmt()
            .with_env_filter(filter(verbose))
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt()
                .with_env_filter(filter(verbose))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("subscriber already installed");
    }
    Ok(())
}
