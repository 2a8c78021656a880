//! Command implementations for hook.
//!
//! Each one-shot command performs a single round trip to the server on a
//! private tokio runtime and returns the formatted output.

mod focus;
mod shell;

pub use focus::{cancel, complete, pause, read, start, status};
pub use shell::{completions, prompt};

use std::future::Future;

use tokio::runtime::Runtime;

use crate::api::HookClient;
use crate::cli::args::{DistractionArgs, OutputFormat};
use crate::config::Config;
use crate::error::HookError;
use crate::features::focus::parse_domain_list;
use crate::output::{format_books, format_domains};

/// Everything a command needs: settings, a client and a runtime to drive it.
pub struct Context {
    pub config: Config,
    pub client: HookClient,
    pub format: OutputFormat,
    runtime: Runtime,
}

impl Context {
    /// Build the HTTP client and a multi-thread runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be configured or the runtime fails to start.
    pub fn new(config: Config, format: OutputFormat) -> Result<Self, HookError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let client = HookClient::new(&config.server)?;
        Ok(Self {
            config,
            client,
            format,
            runtime,
        })
    }

    /// Drive a future to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Handle for spawning background requests.
    #[must_use]
    pub fn handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }
}

/// List books available for reading sessions.
///
/// # Errors
///
/// Returns an error if the request fails or output formatting fails.
pub fn books(ctx: &Context) -> Result<String, HookError> {
    let list = ctx.block_on(ctx.client.user_books())?;
    format_books(&list.books, ctx.format)
}

/// Show or replace the distraction list.
///
/// # Errors
///
/// Returns an error if the request fails or output formatting fails.
pub fn distractions(ctx: &Context, args: &DistractionArgs) -> Result<String, HookError> {
    let list = match &args.set {
        Some(text) => ctx.block_on(ctx.client.update_distraction_list(parse_domain_list(text)))?,
        None => ctx.block_on(ctx.client.distraction_list())?,
    };
    let message = args.set.as_ref().and(list.message.as_deref());
    format_domains(&list.domains, message, ctx.format)
}
