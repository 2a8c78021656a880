//! Shell integration.
//!
//! This module provides:
//! - Shell completions generation
//! - Prompt segment for the active timer

pub mod completions;
pub mod prompt;

pub use completions::{completion_install_instructions, generate_completions};
pub use prompt::{prompt_segment, PromptFormat};
