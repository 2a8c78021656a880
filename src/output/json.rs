//! JSON output formatting for hook.

use serde::Serialize;
use serde_json::json;

use crate::api::{Book, CompleteResponse, TimerStatus};
use crate::error::HookError;

/// Format the timer status as JSON, with remaining time in whole seconds.
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_status_json(status: &TimerStatus) -> Result<String, HookError> {
    let output = json!({
        "active": status.active,
        "task_name": status.task_name,
        "timer_type": status.kind(),
        "remaining": status.remaining_seconds(),
        "is_paused": status.is_paused,
        "category": status.category,
        "priority": status.priority,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a completion together with where it redirects.
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_completed_json(resp: &CompleteResponse, redirect_url: &str) -> Result<String, HookError> {
    let output = json!({
        "message": resp.message,
        "points": resp.points,
        "reading_bonus": resp.reading_bonus,
        "pages_read": resp.pages_read,
        "linked_module": resp.linked_module,
        "redirect": redirect_url,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format books as JSON
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_books_json(books: &[Book]) -> Result<String, HookError> {
    let output = json!({
        "count": books.len(),
        "books": books
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the distraction list as JSON
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_domains_json(domains: &[String]) -> Result<String, HookError> {
    let output = json!({
        "count": domains.len(),
        "domains": domains
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Serialize any value to pretty JSON
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, HookError> {
    Ok(serde_json::to_string_pretty(value)?)
}
