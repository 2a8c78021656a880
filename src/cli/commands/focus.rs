//! Session commands.
//!
//! Starts go through [`SessionTimer`] so the CLI validates and builds forms
//! exactly like the interactive timer does.

use tracing::{info, warn};

use crate::api::{CompleteForm, ReadingSessionForm};
use crate::cli::args::{CompleteArgs, ReadArgs, StartArgs};
use crate::error::HookError;
use crate::features::focus::reading::find_book;
use crate::features::focus::{Destination, Effect, Request, SessionKind, SessionSetup, SessionTimer};
use crate::output::{format_ack, format_completed, format_reading_started, format_started, format_status};

use super::Context;

/// Pull the request out of a transition, or the warning that blocked it.
fn into_request(effects: Vec<Effect>) -> Result<Request, HookError> {
    let mut warning = None;
    for effect in effects {
        match effect {
            Effect::Send(request) => return Ok(request),
            Effect::Toast(toast) if warning.is_none() => warning = Some(toast.message),
            _ => {}
        }
    }
    Err(HookError::Validation(
        warning.unwrap_or_else(|| "Nothing to send".to_string()),
    ))
}

/// Start a focus session.
///
/// # Errors
///
/// Returns an error if the task is blank, the book is unknown, or the server rejects the start.
pub fn start(ctx: &Context, args: StartArgs) -> Result<String, HookError> {
    let minutes = args.duration.unwrap_or(ctx.config.timer.default_minutes);
    let mut setup = SessionSetup::new(args.task.clone(), minutes);
    setup.kind = SessionKind::parse(&args.kind);
    setup.category.clone_from(&ctx.config.timer.default_category);

    if let Some(book_id) = &args.book {
        let list = ctx.block_on(ctx.client.user_books())?;
        let book = find_book(&list.books, book_id)
            .ok_or_else(|| HookError::NotFound(format!("Book '{book_id}' not found")))?;
        setup.set_reading(true);
        setup.select_book(Some(book));
        setup.task_name = args.task;
    }
    if let Some(category) = args.category {
        setup.category = category;
    }

    let mut timer = SessionTimer::from_config(&ctx.config);
    let Request::Start(form) = into_request(timer.start(&setup))? else {
        return Err(HookError::Validation("Unexpected request".to_string()));
    };

    let resp = ctx.block_on(ctx.client.start_timer(&form))?;
    format_started(&setup, &resp, ctx.format)
}

/// Start a reading session for a book.
///
/// # Errors
///
/// Returns an error if there are no books, the book is unknown, or the server rejects the start.
pub fn read(ctx: &Context, args: ReadArgs) -> Result<String, HookError> {
    let list = ctx.block_on(ctx.client.user_books())?;
    if list.books.is_empty() {
        return Err(HookError::Validation(
            "No books found. Add some books in Nook first!".to_string(),
        ));
    }
    if find_book(&list.books, &args.book_id).is_none() {
        return Err(HookError::NotFound(format!("Book '{}' not found", args.book_id)));
    }

    let minutes = args.duration.unwrap_or(ctx.config.timer.default_minutes);
    let form = ReadingSessionForm { book_id: args.book_id, duration: minutes };
    let resp = ctx.block_on(ctx.client.start_reading_session(&form))?;
    format_reading_started(&resp, minutes, ctx.format)
}

/// Toggle pause on the active session.
///
/// # Errors
///
/// Returns an error if the request fails.
pub fn pause(ctx: &Context) -> Result<String, HookError> {
    let ack = ctx.block_on(ctx.client.pause_timer())?;
    format_ack(&ack, "Timer paused", ctx.format)
}

/// Cancel the active session.
///
/// # Errors
///
/// Returns an error if the request fails.
pub fn cancel(ctx: &Context) -> Result<String, HookError> {
    let ack = ctx.block_on(ctx.client.cancel_timer())?;
    format_ack(&ack, "Timer cancelled", ctx.format)
}

/// Show the active session.
///
/// # Errors
///
/// Returns an error if the request fails.
pub fn status(ctx: &Context) -> Result<String, HookError> {
    let status = ctx.block_on(ctx.client.timer_status())?;
    format_status(&status, ctx.format)
}

/// Finish the active session with feedback.
///
/// # Errors
///
/// Returns an error if the request fails.
pub fn complete(ctx: &Context, args: CompleteArgs) -> Result<String, HookError> {
    let form = CompleteForm {
        mood: args.mood,
        productivity_rating: args.rating,
        pages_read: args.pages_read,
        current_page: args.current_page,
    };
    let resp = ctx.block_on(ctx.client.complete_timer(&form))?;

    let destination = Destination::from_linked_module(resp.linked_module.as_deref());
    let url = ctx.client.url(destination.path());
    let output = format_completed(&resp, &url, ctx.format)?;

    if ctx.config.completion.open_browser {
        std::thread::sleep(ctx.config.completion.redirect_delay());
        info!(%url, "opening dashboard");
        if let Err(e) = webbrowser::open(&url) {
            warn!(error = %e, "could not open browser");
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::focus::Toast;

    #[test]
    fn test_into_request_prefers_send() {
        let effects = vec![Effect::Toast(Toast::info("x")), Effect::Send(Request::Pause)];
        assert_eq!(into_request(effects).unwrap(), Request::Pause);
    }

    #[test]
    fn test_into_request_surfaces_warning() {
        let effects = vec![
            Effect::Toast(Toast::warning("Please enter a task name")),
            Effect::FocusTaskInput,
        ];
        match into_request(effects) {
            Err(HookError::Validation(msg)) => assert_eq!(msg, "Please enter a task name"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
