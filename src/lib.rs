//! hook - Focus timer client for the Hook session tracker
//!
//! This crate provides a command-line and terminal interface for running
//! focus sessions that stay in sync with a Hook server, with a focus lock
//! reminder and reading sessions linked to Nook books.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod tui;

pub use api::HookClient;
pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::HookError;
