//! Output formatting for hook.
//!
//! This module provides formatters for displaying server results in various formats.

mod json;
mod pretty;

use crate::api::{Ack, Book, CompleteResponse, ReadingSessionResponse, StartTimerResponse, TimerStatus};
use crate::cli::args::OutputFormat;
use crate::error::HookError;
use crate::features::focus::SessionSetup;

pub use json::*;
pub use pretty::*;

/// Format the active timer based on output format
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_status(status: &TimerStatus, format: OutputFormat) -> Result<String, HookError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(status)),
        OutputFormat::Json => format_status_json(status),
    }
}

/// Format a started session based on output format
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_started(
    setup: &SessionSetup,
    resp: &StartTimerResponse,
    format: OutputFormat,
) -> Result<String, HookError> {
    match format {
        OutputFormat::Pretty => Ok(format_started_pretty(setup, resp)),
        OutputFormat::Json => to_json(resp),
    }
}

/// Format a started reading session based on output format
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_reading_started(
    resp: &ReadingSessionResponse,
    minutes: u32,
    format: OutputFormat,
) -> Result<String, HookError> {
    match format {
        OutputFormat::Pretty => Ok(format_reading_started_pretty(resp, minutes)),
        OutputFormat::Json => to_json(resp),
    }
}

/// Format a plain acknowledgement based on output format
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_ack(ack: &Ack, fallback: &str, format: OutputFormat) -> Result<String, HookError> {
    match format {
        OutputFormat::Pretty => Ok(format_ack_pretty(ack, fallback)),
        OutputFormat::Json => to_json(ack),
    }
}

/// Format a completed session based on output format
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_completed(
    resp: &CompleteResponse,
    redirect_url: &str,
    format: OutputFormat,
) -> Result<String, HookError> {
    match format {
        OutputFormat::Pretty => Ok(format_completed_pretty(resp, redirect_url)),
        OutputFormat::Json => format_completed_json(resp, redirect_url),
    }
}

/// Format books based on output format
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_books(books: &[Book], format: OutputFormat) -> Result<String, HookError> {
    match format {
        OutputFormat::Pretty => Ok(format_books_pretty(books)),
        OutputFormat::Json => format_books_json(books),
    }
}

/// Format the distraction list based on output format
///
/// # Errors
///
/// Returns `HookError::Parse` if JSON serialization fails.
pub fn format_domains(
    domains: &[String],
    message: Option<&str>,
    format: OutputFormat,
) -> Result<String, HookError> {
    match format {
        OutputFormat::Pretty => Ok(format_domains_pretty(domains, message)),
        OutputFormat::Json => format_domains_json(domains),
    }
}
