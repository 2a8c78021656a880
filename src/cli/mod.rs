//! Command-line surface: argument definitions and one-shot command handlers.

pub mod args;
pub mod commands;
