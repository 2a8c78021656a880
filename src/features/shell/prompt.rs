//! Shell prompt integration.
//!
//! Renders the active timer as a short segment for shell prompts.

use serde::Serialize;

use crate::api::TimerStatus;
use crate::error::HookError;

use crate::features::focus::format_duration_mmss;

/// Format for prompt segment output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PromptFormat {
    /// Remaining time and task (e.g., "12:34 Write report")
    #[default]
    Plain,
    /// With a state icon (e.g., "⏱ 12:34 Write report")
    Emoji,
    /// JSON output
    Json,
}

#[derive(Debug, Serialize)]
struct PromptJson<'a> {
    active: bool,
    remaining: u32,
    paused: bool,
    task_name: &'a str,
    timer_type: &'a str,
}

/// Render `status` for a shell prompt.
///
/// An inactive timer renders as an empty string (or `{"active":false}` JSON).
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn prompt_segment(status: &TimerStatus, format: PromptFormat) -> Result<String, HookError> {
    let task = status.task_name.as_deref().unwrap_or("");

    if format == PromptFormat::Json {
        let json = PromptJson {
            active: status.active,
            remaining: status.remaining_seconds(),
            paused: status.active && status.is_paused,
            task_name: task,
            timer_type: status.kind().as_str(),
        };
        return Ok(serde_json::to_string(&json)?);
    }

    if !status.active {
        return Ok(String::new());
    }

    let clock = format_duration_mmss(chrono::Duration::seconds(i64::from(status.remaining_seconds())));
    let mut segment = match format {
        PromptFormat::Emoji => {
            let icon = if status.is_paused { "⏸" } else { "⏱" };
            format!("{icon} {clock}")
        }
        _ => clock,
    };
    if !task.is_empty() {
        segment.push(' ');
        segment.push_str(task);
    }
    Ok(segment)
}
