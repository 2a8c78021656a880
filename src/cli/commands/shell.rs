//! Shell integration commands.
//!
//! Handles shell completions and prompt segments.

use clap_complete::Shell;
use tracing::debug;

use crate::cli::args::PromptArgs;
use crate::error::HookError;
use crate::features::shell::{completion_install_instructions, generate_completions, prompt_segment};

use super::Context;

/// Print a completion script, or instructions for installing one.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn completions(shell: Shell, install: bool) -> Result<String, HookError> {
    if install {
        Ok(completion_install_instructions(shell))
    } else {
        generate_completions(shell)
    }
}

/// Render the active timer for a shell prompt.
///
/// Request failures render as an empty segment.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn prompt(ctx: &Context, args: &PromptArgs) -> Result<String, HookError> {
    match ctx.block_on(ctx.client.timer_status()) {
        Ok(status) => prompt_segment(&status, args.format),
        Err(e) => {
            debug!(error = %e, "prompt status unavailable");
            Ok(String::new())
        }
    }
}
