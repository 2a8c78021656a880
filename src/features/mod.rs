//! Feature implementations for hook.
//!
//! - Focus sessions: countdown, focus lock, reading link
//! - Shell integration: completions and prompt segment

pub mod focus;
pub mod shell;
