//! Configuration management for hook.
//!
//! This module handles loading and saving configuration from `~/.hook/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{CompletionConfig, Config, FocusLockConfig, Preset, ServerConfig, TimerConfig};
