//! Terminal User Interface (TUI) for hook.
//!
//! The interactive countdown with the setup form, focus lock banner and
//! feedback screen. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{Action, App, Command, Mode};

use std::io;
use std::time::Instant;

use chrono::Utc;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::prelude::*;
use tracing::{debug, info};

use crate::cli::commands::Context;
use crate::error::HookError;
use crate::features::focus::Dispatcher;

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(ctx: &Context) -> Result<(), HookError> {
    // Setup terminal
    enable_raw_mode().map_err(|e| HookError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| HookError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| HookError::Terminal(format!("Failed to create terminal: {e}")))?;

    // Create app state and run main loop
    let now = Instant::now();
    let mut app = App::new(&ctx.config, ctx.client.base_url(), now);
    let mut dispatcher = Dispatcher::new(ctx.client.clone(), ctx.handle());
    app.start_up(now);
    info!("timer started");

    let result = run_app(&mut terminal, &mut app, &mut dispatcher);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle("")).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend + io::Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
) -> Result<(), HookError> {
    let mut title = String::new();

    loop {
        flush(app, dispatcher);

        // Draw UI
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| HookError::Terminal(format!("Failed to draw: {e}")))?;

        // Handle events
        if let Some(action) = event::next_action(app.mode(), app.form.field)? {
            app.handle(action, Instant::now(), Utc::now());
        }

        for delivery in dispatcher.drain() {
            app.deliver(delivery, Instant::now(), Utc::now());
        }
        app.on_frame(Instant::now(), Utc::now());

        let next = app.timer.title();
        if next != title {
            execute!(terminal.backend_mut(), SetTitle(&next)).ok();
            title = next;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Hand queued commands to the dispatcher.
fn flush(app: &mut App, dispatcher: &mut Dispatcher) {
    for command in app.take_commands() {
        match command {
            Command::Send { epoch, request } => {
                debug!(epoch, ?request, "sending");
                dispatcher.send(epoch, request);
            }
            Command::AbortBefore(epoch) => dispatcher.abort_before(epoch),
        }
    }
}
