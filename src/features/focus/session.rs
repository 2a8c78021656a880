//! Focus session management.
//!
//! [`SessionTimer`] owns the whole client-side session: the countdown, the
//! captured task metadata, the focus lock and the reading link. Every user
//! action and every server response is a method that mutates state and
//! returns the [`Effect`]s the front end has to carry out.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::api::{
    Ack, Book, BookList, CompleteForm, CompleteResponse, DistractionList, ReadingSessionForm,
    ReadingSessionResponse, StartTimerForm, StartTimerResponse, TimerStatus,
};
use crate::config::{Config, Preset};
use crate::error::HookError;

use super::dispatch::{Delivery, Outcome};
use super::effect::{Destination, Effect, Request, Toast};
use super::lock::{parse_domain_list, FocusLock, FocusLockSettings};
use super::reading::{find_book, BookLink, ReadingProgress};
use super::timer::{format_duration_mmss, Countdown, TimerState};

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "general";

/// Category of reading sessions.
pub const READING_CATEGORY: &str = "reading";

/// Type of focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Focused work
    #[default]
    Work,
    /// Break between work sessions
    Break,
}

impl SessionKind {
    /// Parse session kind from string. Anything unrecognized is work.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "break" | "b" | "short" | "long" | "rest" => Self::Break,
            _ => Self::Work,
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }

    /// Header label, e.g. "Work Session".
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} Session", self.display_name())
    }

    /// The other kind.
    #[must_use]
    pub const fn toggled(&self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Values entered on the setup form before a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    pub task_name: String,
    pub duration_minutes: u32,
    pub kind: SessionKind,
    pub category: String,
    pub reading: bool,
    pub book: Option<BookLink>,
}

impl SessionSetup {
    #[must_use]
    pub fn new(task_name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            task_name: task_name.into(),
            duration_minutes,
            kind: SessionKind::Work,
            category: DEFAULT_CATEGORY.to_string(),
            reading: false,
            book: None,
        }
    }

    /// Turn reading mode on or off.
    ///
    /// Turning it on switches the category to reading; turning it off drops the book.
    pub fn set_reading(&mut self, on: bool) {
        self.reading = on;
        if on {
            self.category = READING_CATEGORY.to_string();
        } else {
            self.book = None;
        }
    }

    /// Link a book (or clear the link) and fill in the task name.
    pub fn select_book(&mut self, book: Option<&Book>) {
        self.book = book.map(BookLink::from);
        if let Some(link) = &self.book {
            self.task_name = link.task_name();
        }
    }

    /// Copy a preset's duration and kind into the form.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.duration_minutes = preset.minutes;
        self.kind = preset.kind;
    }
}

/// Client-side state of the current focus session.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    countdown: Countdown,
    task_name: String,
    kind: SessionKind,
    category: String,
    reading: bool,
    linked_book: Option<BookLink>,
    progress: Option<ReadingProgress>,
    lock: FocusLock,
    books: Vec<Book>,
    /// Book and minutes of a reading start awaiting the server.
    pending_reading: Option<(BookLink, u32)>,
    epoch: u64,
}

impl SessionTimer {
    /// Create an idle session with the given default duration.
    #[must_use]
    pub fn new(default_minutes: u32, lock: FocusLock) -> Self {
        Self {
            countdown: Countdown::from_minutes(default_minutes),
            task_name: String::new(),
            kind: SessionKind::Work,
            category: DEFAULT_CATEGORY.to_string(),
            reading: false,
            linked_book: None,
            progress: None,
            lock,
            books: Vec::new(),
            pending_reading: None,
            epoch: 0,
        }
    }

    /// Create an idle session from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut timer = Self::new(
            config.timer.default_minutes,
            FocusLock::new(FocusLockSettings::from(&config.focus_lock)),
        );
        timer.category.clone_from(&config.timer.default_category);
        timer
    }

    /// Requests to issue once at startup.
    #[must_use]
    pub fn on_load(&self) -> Vec<Effect> {
        vec![
            Effect::Send(Request::LoadDistractions),
            Effect::Send(Request::LoadBooks),
            Effect::Send(Request::Status),
        ]
    }

    /// Start a session from the setup form.
    pub fn start(&mut self, setup: &SessionSetup) -> Vec<Effect> {
        let task = setup.task_name.trim();
        if task.is_empty() {
            return vec![
                Effect::Toast(Toast::warning("Please enter a task name")),
                Effect::FocusTaskInput,
            ];
        }

        let book = if setup.reading { setup.book.clone() } else { None };
        let form = self.launch(task, setup.kind, &setup.category, setup.reading, book, setup.duration_minutes);
        form.map_or_else(Vec::new, |form| vec![Effect::Send(Request::Start(form))])
    }

    /// Ask the server for a session linked to one of the cached books.
    ///
    /// The countdown starts only once the server confirms.
    pub fn start_reading(&mut self, book_id: &str, duration_minutes: u32) -> Vec<Effect> {
        if self.countdown.is_running() || self.pending_reading.is_some() {
            debug!("reading start ignored: session running or pending");
            return Vec::new();
        }
        if self.books.is_empty() {
            return vec![Effect::Toast(Toast::warning(
                "No books found. Add some books in Nook first!",
            ))];
        }
        let Some(book) = find_book(&self.books, book_id).map(BookLink::from) else {
            return vec![Effect::Toast(Toast::warning("Please select a book"))];
        };

        let form = ReadingSessionForm { book_id: book.id.clone(), duration: duration_minutes };
        self.pending_reading = Some((book, duration_minutes));
        vec![Effect::Send(Request::StartReading(form))]
    }

    /// Whether a reading start is waiting for the server.
    #[must_use]
    pub const fn is_reading_pending(&self) -> bool {
        self.pending_reading.is_some()
    }

    /// Shared start path; returns the start form, or `None` when already running.
    fn launch(
        &mut self,
        task: &str,
        kind: SessionKind,
        category: &str,
        reading: bool,
        book: Option<BookLink>,
        duration_minutes: u32,
    ) -> Option<StartTimerForm> {
        if self.countdown.is_running() {
            debug!("start ignored: session already running");
            return None;
        }

        self.task_name = task.to_string();
        self.kind = kind;
        self.category = if category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category.trim().to_string()
        };
        self.reading = reading;
        self.linked_book = book;
        self.progress = None;

        self.countdown.start(duration_minutes.saturating_mul(60));

        debug!(task = %self.task_name, seconds = self.countdown.remaining_seconds(), "session started");
        Some(self.start_form())
    }

    /// Form describing the captured session.
    #[must_use]
    pub fn start_form(&self) -> StartTimerForm {
        StartTimerForm {
            task_name: self.task_name.clone(),
            duration: self.countdown.duration_seconds() / 60,
            timer_type: self.kind,
            category: self.category.clone(),
            is_reading_session: self.reading.to_string(),
            linked_book_id: self.linked_book.as_ref().map(|b| b.id.clone()),
        }
    }

    /// Toggle pause.
    pub fn pause(&mut self) -> Vec<Effect> {
        match self.countdown.toggle_pause() {
            Some(paused) => {
                debug!(paused, "pause toggled");
                vec![Effect::Send(Request::Pause)]
            }
            None => Vec::new(),
        }
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Vec<Effect> {
        if self.countdown.tick() {
            self.complete()
        } else {
            Vec::new()
        }
    }

    /// End the run early and ask for feedback.
    pub fn stop(&mut self) -> Vec<Effect> {
        if !self.countdown.stop() {
            return Vec::new();
        }
        self.wind_down();
        vec![Effect::PromptFeedback]
    }

    /// Abandon the session and return to setup.
    pub fn reset(&mut self) -> Vec<Effect> {
        let mut effects = self.return_to_setup();
        effects.push(Effect::Send(Request::Cancel));
        effects
    }

    fn complete(&mut self) -> Vec<Effect> {
        self.wind_down();
        info!(task = %self.task_name, "countdown complete");

        let task = if self.task_name.is_empty() { "Timer" } else { &self.task_name };
        vec![
            Effect::Toast(Toast::info(format!(
                "Timer Complete! Your {} session for \"{task}\" is complete.",
                self.kind.as_str()
            ))),
            Effect::PromptFeedback,
        ]
    }

    /// Shared by every path that ends a run.
    fn wind_down(&mut self) {
        self.lock.hide();
        self.lock.clear_dismissal();
        if self.reading && self.progress.is_none() {
            self.progress = self.linked_book.clone().map(ReadingProgress::new);
        }
    }

    fn return_to_setup(&mut self) -> Vec<Effect> {
        self.countdown.reset();
        self.lock.hide();
        self.lock.clear_dismissal();
        self.progress = None;
        self.pending_reading = None;
        self.epoch += 1;
        vec![Effect::AbortStale]
    }

    /// Send session feedback. Only valid once the run has finished.
    pub fn submit_feedback(&mut self, mood: &str, productivity_rating: u8) -> Vec<Effect> {
        if self.countdown.state() != TimerState::Finished {
            return Vec::new();
        }

        let progress = self.progress.as_ref().filter(|_| self.reading);
        let form = CompleteForm {
            mood: mood.to_string(),
            productivity_rating: productivity_rating.clamp(1, 5),
            pages_read: progress.map(ReadingProgress::pages_read),
            current_page: progress.map(ReadingProgress::current_page),
        };
        vec![Effect::Send(Request::Complete(form))]
    }

    /// Record pages read on the progress panel.
    pub fn set_pages_read(&mut self, pages: u32) {
        if let Some(progress) = &mut self.progress {
            progress.set_pages_read(pages);
        }
    }

    /// Set the current page on the progress panel.
    pub fn set_current_page(&mut self, page: u32) {
        if let Some(progress) = &mut self.progress {
            progress.set_current_page(page);
        }
    }

    /// Change the duration while idle. Ignored while running.
    pub fn set_duration(&mut self, minutes: u32) -> bool {
        self.countdown.set_duration(minutes.saturating_mul(60))
    }

    /// Apply a duration/kind preset while idle. Ignored while running.
    pub fn set_preset(&mut self, preset: Preset) -> bool {
        if self.countdown.is_running() {
            return false;
        }
        self.kind = preset.kind;
        self.set_duration(preset.minutes)
    }

    /// Hide the focus lock for the dismissal window.
    pub fn dismiss_focus_lock(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if !self.lock.is_visible() {
            return Vec::new();
        }
        self.lock.dismiss(now);
        let minutes = self.lock.settings().dismiss_for.num_minutes();
        vec![Effect::Toast(Toast::info(format!(
            "Focus Lock dismissed for {minutes} minutes"
        )))]
    }

    /// Advance the focus lock's timers. Returns true when it changed.
    pub fn poll_focus_lock(&mut self, now: DateTime<Utc>) -> bool {
        self.lock.poll(now, self.countdown.is_running())
    }

    /// Fetch the saved distraction list again.
    #[must_use]
    pub fn reload_distractions(&self) -> Vec<Effect> {
        vec![Effect::Send(Request::LoadDistractions)]
    }

    /// Save a comma-separated distraction list.
    pub fn save_distractions(&self, text: &str) -> Vec<Effect> {
        vec![Effect::Send(Request::SaveDistractions { domains: parse_domain_list(text) })]
    }

    /// Apply a server response.
    pub fn apply(&mut self, delivery: Delivery, now: DateTime<Utc>) -> Vec<Effect> {
        if delivery.scoped && delivery.epoch != self.epoch {
            debug!(epoch = delivery.epoch, current = self.epoch, "dropping stale response");
            return Vec::new();
        }

        match delivery.outcome {
            Outcome::Started(Ok(resp)) => self.on_started(resp, now),
            Outcome::Started(Err(e)) => failure("Error starting timer", &e),
            Outcome::ReadingStarted(Ok(resp)) => self.on_reading_started(resp, now),
            Outcome::ReadingStarted(Err(e)) => self.on_reading_failed(&e),
            Outcome::Paused(result) => acknowledged(result, "Error pausing timer"),
            Outcome::Cancelled(result) => acknowledged(result, "Error cancelling timer"),
            Outcome::Completed(Ok(resp)) => self.on_completed(&resp),
            Outcome::Completed(Err(e)) => failure("Error completing session", &e),
            Outcome::Status(Ok(status)) => self.resume_from_status(&status, now),
            Outcome::Status(Err(e)) => {
                error!(error = %e, "Error checking timer status");
                Vec::new()
            }
            Outcome::Distractions(Ok(list)) => {
                self.lock.set_domains(list.domains);
                self.show_lock_if_working(now);
                Vec::new()
            }
            Outcome::Distractions(Err(e)) => {
                error!(error = %e, "Error loading distraction list");
                Vec::new()
            }
            Outcome::DistractionsSaved(Ok(list)) => self.on_distractions_saved(list),
            Outcome::DistractionsSaved(Err(e)) => failure("Error saving distraction list", &e),
            Outcome::Books(Ok(BookList { books, .. })) => {
                debug!(count = books.len(), "books loaded");
                self.books = books;
                Vec::new()
            }
            Outcome::Books(Err(e)) => {
                error!(error = %e, "Error loading user books");
                Vec::new()
            }
        }
    }

    fn on_started(&mut self, resp: StartTimerResponse, now: DateTime<Utc>) -> Vec<Effect> {
        if let Some(domains) = resp.distraction_domains {
            self.lock.set_domains(domains);
        }
        if let Some(info) = &resp.linked_book {
            match &mut self.linked_book {
                Some(book) => book.merge(info),
                None => self.linked_book = BookLink::from_info(info),
            }
        }
        self.show_lock_if_working(now);

        vec![Effect::Toast(Toast::success(
            resp.message.unwrap_or_else(|| "Timer started!".to_string()),
        ))]
    }

    fn on_reading_started(&mut self, resp: ReadingSessionResponse, now: DateTime<Utc>) -> Vec<Effect> {
        let Some((pending, minutes)) = self.pending_reading.take() else {
            debug!("reading confirmation without a pending start");
            return Vec::new();
        };
        let book = resp.book.map_or(pending, BookLink::from);
        let task = book.task_name();
        if self
            .launch(&task, SessionKind::Work, READING_CATEGORY, true, Some(book), minutes)
            .is_none()
        {
            return Vec::new();
        }

        if let Some(domains) = resp.distraction_domains {
            self.lock.set_domains(domains);
        }
        self.show_lock_if_working(now);

        vec![Effect::Toast(Toast::success(
            resp.message.unwrap_or_else(|| "Reading session started!".to_string()),
        ))]
    }

    /// The server never started the session, so neither do we.
    fn on_reading_failed(&mut self, err: &HookError) -> Vec<Effect> {
        self.pending_reading = None;
        failure("Failed to start reading session", err)
    }

    /// Show the focus lock for a work session in progress.
    fn show_lock_if_working(&mut self, now: DateTime<Utc>) {
        if self.kind == SessionKind::Work && self.countdown.is_running() && !self.lock.is_visible() {
            self.lock.show(now);
        }
    }

    fn on_completed(&mut self, resp: &CompleteResponse) -> Vec<Effect> {
        let mut message = format!(
            "{} (+{} points!)",
            resp.message.as_deref().unwrap_or("Session completed!"),
            resp.points
        );
        if resp.reading_bonus > 0 {
            let _ = write!(
                message,
                " Including {} bonus points for focused reading!",
                resp.reading_bonus
            );
        }

        let mut effects = vec![Effect::Toast(Toast::success(message))];
        effects.extend(self.return_to_setup());
        effects.push(Effect::Redirect(Destination::from_linked_module(
            resp.linked_module.as_deref(),
        )));
        effects
    }

    fn on_distractions_saved(&mut self, list: DistractionList) -> Vec<Effect> {
        let message = list
            .message
            .clone()
            .unwrap_or_else(|| format!("Updated {} distraction domains", list.domains.len()));
        self.lock.set_domains(list.domains);
        vec![Effect::Toast(Toast::success(message))]
    }

    /// Adopt a timer the server reports as active.
    ///
    /// Only applies while idle, so a late answer cannot clobber a session the
    /// user already started.
    pub fn resume_from_status(&mut self, status: &TimerStatus, now: DateTime<Utc>) -> Vec<Effect> {
        if !status.active {
            return Vec::new();
        }
        if self.countdown.state() != TimerState::Idle {
            debug!("ignoring server status: local session in progress");
            return Vec::new();
        }

        self.task_name = status.task_name.clone().unwrap_or_default();
        self.kind = status.kind();
        if let Some(category) = &status.category {
            self.category.clone_from(category);
        }
        self.countdown.resume_from(status.remaining_seconds(), status.is_paused);
        self.show_lock_if_working(now);

        info!(task = %self.task_name, paused = status.is_paused, "resumed active timer");
        Vec::new()
    }

    #[must_use]
    pub const fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.countdown.state()
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.countdown.is_ticking()
    }

    #[must_use]
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        self.kind
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn is_reading(&self) -> bool {
        self.reading
    }

    #[must_use]
    pub const fn linked_book(&self) -> Option<&BookLink> {
        self.linked_book.as_ref()
    }

    #[must_use]
    pub const fn reading_progress(&self) -> Option<&ReadingProgress> {
        self.progress.as_ref()
    }

    #[must_use]
    pub const fn focus_lock(&self) -> &FocusLock {
        &self.lock
    }

    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Generation counter; bumped whenever the session is discarded.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Task line shown in the header.
    #[must_use]
    pub fn display_task(&self) -> &str {
        if self.task_name.is_empty() {
            "Ready to Focus"
        } else {
            &self.task_name
        }
    }

    /// Window title, e.g. `24:59 - Write report`.
    #[must_use]
    pub fn title(&self) -> String {
        let task = if self.task_name.is_empty() { "Timer" } else { &self.task_name };
        format!("{} - {task}", format_duration_mmss(self.countdown.remaining()))
    }
}

fn failure(context: &str, err: &HookError) -> Vec<Effect> {
    error!(error = %err, "{context}");
    let message = match err {
        HookError::Server(message) => message.clone(),
        _ => context.to_string(),
    };
    vec![Effect::Toast(Toast::error(message))]
}

fn acknowledged(result: Result<Ack, HookError>, context: &str) -> Vec<Effect> {
    match result {
        Ok(ack) => ack
            .message
            .map(|m| vec![Effect::Toast(Toast::info(m))])
            .unwrap_or_default(),
        Err(e) => failure(context, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LinkedBookInfo, ReadingBook};
    use crate::features::focus::effect::ToastKind;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn timer() -> SessionTimer {
        SessionTimer::new(25, FocusLock::with_seed(FocusLockSettings::default(), 3))
    }

    fn deliver(timer: &SessionTimer, outcome: Outcome) -> Delivery {
        Delivery { epoch: timer.epoch(), scoped: true, outcome }
    }

    fn started(domains: &[&str]) -> Outcome {
        Outcome::Started(Ok(StartTimerResponse {
            status: "success".to_string(),
            message: Some("Timer started!".to_string()),
            distraction_domains: Some(domains.iter().map(ToString::to_string).collect()),
            linked_book: None,
        }))
    }

    fn dune() -> Book {
        Book {
            id: "b1".to_string(),
            title: "Dune".to_string(),
            authors: Vec::new(),
            current_page: 100,
            page_count: 400,
            cover_image: String::new(),
            status: "reading".to_string(),
            progress_percentage: 25.0,
        }
    }

    fn with_books(timer: &mut SessionTimer) {
        let books = Outcome::Books(Ok(BookList {
            status: "success".to_string(),
            message: None,
            books: vec![dune()],
        }));
        let delivery = Delivery { epoch: timer.epoch(), scoped: false, outcome: books };
        timer.apply(delivery, t0());
    }

    fn toasts(effects: &[Effect]) -> Vec<&Toast> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Toast(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_session_kind_parse() {
        assert_eq!(SessionKind::parse("work"), SessionKind::Work);
        assert_eq!(SessionKind::parse("Break"), SessionKind::Break);
        assert_eq!(SessionKind::parse("unknown"), SessionKind::Work);
        assert_eq!(SessionKind::Break.label(), "Break Session");
        assert_eq!(SessionKind::Work.toggled(), SessionKind::Break);
    }

    #[test]
    fn test_start_sends_form_and_completes_after_sixty_ticks() {
        let mut timer = timer();
        let effects = timer.start(&SessionSetup::new("Write draft", 1));

        assert_eq!(
            effects,
            vec![Effect::Send(Request::Start(StartTimerForm {
                task_name: "Write draft".to_string(),
                duration: 1,
                timer_type: SessionKind::Work,
                category: "general".to_string(),
                is_reading_session: "false".to_string(),
                linked_book_id: None,
            }))]
        );
        assert!(timer.is_ticking());

        let mut completions = 0;
        for _ in 0..60 {
            if timer.tick().contains(&Effect::PromptFeedback) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(timer.countdown().remaining_seconds(), 0);
        assert_eq!(timer.state(), TimerState::Finished);
        assert!(timer.tick().is_empty());
    }

    #[test]
    fn test_start_rejects_blank_task() {
        let mut timer = timer();
        let effects = timer.start(&SessionSetup::new("   ", 25));

        assert_eq!(
            effects,
            vec![
                Effect::Toast(Toast::warning("Please enter a task name")),
                Effect::FocusTaskInput,
            ]
        );
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("First", 25));
        let effects = timer.start(&SessionSetup::new("Second", 5));

        assert!(effects.is_empty());
        assert_eq!(timer.task_name(), "First");
        assert_eq!(timer.countdown().duration_seconds(), 1500);
    }

    #[test]
    fn test_pause_holds_and_resumes_from_exact_value() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 1));
        for _ in 0..15 {
            timer.tick();
        }

        assert_eq!(timer.pause(), vec![Effect::Send(Request::Pause)]);
        for _ in 0..30 {
            timer.tick();
        }
        assert_eq!(timer.countdown().remaining_seconds(), 45);

        timer.pause();
        timer.tick();
        assert_eq!(timer.countdown().remaining_seconds(), 44);
    }

    #[test]
    fn test_pause_when_idle_sends_nothing() {
        let mut timer = timer();
        assert!(timer.pause().is_empty());
    }

    #[test]
    fn test_reset_restores_duration_from_any_state() {
        for ticks in [0, 10, 60] {
            let mut timer = timer();
            timer.start(&SessionSetup::new("Focus", 1));
            for _ in 0..ticks {
                timer.tick();
            }
            if ticks == 10 {
                timer.pause();
            }

            let effects = timer.reset();
            assert_eq!(effects, vec![Effect::AbortStale, Effect::Send(Request::Cancel)]);
            assert_eq!(timer.state(), TimerState::Idle);
            assert_eq!(timer.countdown().remaining_seconds(), 60);
        }
    }

    #[test]
    fn test_reset_bumps_epoch_and_drops_stale_responses() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 25));
        let stale = deliver(&timer, started(&["a.com"]));

        timer.reset();
        assert_eq!(timer.epoch(), 1);

        assert!(timer.apply(stale, t0()).is_empty());
        assert!(timer.focus_lock().domains().is_empty());
    }

    #[test]
    fn test_start_response_shows_focus_lock_for_work() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 25));
        let effects = timer.apply(deliver(&timer, started(&["a.com", "b.com"])), t0());

        assert_eq!(effects, vec![Effect::Toast(Toast::success("Timer started!"))]);
        assert!(timer.focus_lock().is_visible());
        assert_eq!(timer.focus_lock().domains().len(), 2);
    }

    #[test]
    fn test_start_response_keeps_lock_hidden_for_break() {
        let mut timer = timer();
        let mut setup = SessionSetup::new("Stretch", 5);
        setup.kind = SessionKind::Break;
        timer.start(&setup);
        timer.apply(deliver(&timer, started(&["a.com"])), t0());

        assert!(!timer.focus_lock().is_visible());
    }

    #[test]
    fn test_dismiss_and_reappear_only_while_running() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 25));
        timer.apply(deliver(&timer, started(&["a.com"])), t0());

        let effects = timer.dismiss_focus_lock(t0());
        assert_eq!(toasts(&effects)[0].message, "Focus Lock dismissed for 5 minutes");
        assert!(!timer.focus_lock().is_visible());

        timer.poll_focus_lock(t0() + Duration::seconds(299));
        assert!(!timer.focus_lock().is_visible());

        timer.poll_focus_lock(t0() + Duration::minutes(5));
        assert!(timer.focus_lock().is_visible());
    }

    #[test]
    fn test_stop_clears_pending_dismissal() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 25));
        timer.apply(deliver(&timer, started(&["a.com"])), t0());
        timer.dismiss_focus_lock(t0());

        assert_eq!(timer.stop(), vec![Effect::PromptFeedback]);
        assert!(!timer.focus_lock().is_dismissed());

        timer.poll_focus_lock(t0() + Duration::minutes(5));
        assert!(!timer.focus_lock().is_visible());
    }

    #[test]
    fn test_status_paused_scenario() {
        let mut timer = timer();
        let status = TimerStatus {
            active: true,
            task_name: Some("X".to_string()),
            timer_type: Some("work".to_string()),
            remaining: 120.0,
            is_paused: true,
            category: None,
            priority: None,
        };
        let effects = timer.apply(deliver(&timer, Outcome::Status(Ok(status))), t0());

        assert!(effects.is_empty());
        assert_eq!(timer.countdown().remaining_seconds(), 120);
        assert_eq!(timer.countdown().duration_seconds(), 120);
        assert_eq!(timer.state(), TimerState::Paused);
        assert!(!timer.is_ticking());
        assert_eq!(timer.task_name(), "X");

        timer.tick();
        assert_eq!(timer.countdown().remaining_seconds(), 120);
    }

    #[test]
    fn test_status_running_resumes_ticking() {
        let mut timer = timer();
        let status = TimerStatus {
            active: true,
            task_name: Some("Y".to_string()),
            timer_type: Some("break".to_string()),
            remaining: 90.6,
            ..TimerStatus::default()
        };
        timer.resume_from_status(&status, t0());

        assert!(timer.is_ticking());
        assert_eq!(timer.kind(), SessionKind::Break);
        assert_eq!(timer.countdown().remaining_seconds(), 90);
    }

    fn running_work_status() -> TimerStatus {
        TimerStatus {
            active: true,
            task_name: Some("Deep work".to_string()),
            timer_type: Some("work".to_string()),
            remaining: 600.0,
            ..TimerStatus::default()
        }
    }

    fn distractions(domains: &[&str]) -> Outcome {
        Outcome::Distractions(Ok(DistractionList {
            status: "success".to_string(),
            message: None,
            domains: domains.iter().map(ToString::to_string).collect(),
        }))
    }

    #[test]
    fn test_resumed_work_session_shows_lock_after_domains() {
        let mut timer = timer();
        timer.apply(deliver(&timer, distractions(&["a.com"])), t0());
        assert!(!timer.focus_lock().is_visible());

        timer.apply(deliver(&timer, Outcome::Status(Ok(running_work_status()))), t0());
        assert!(timer.is_ticking());
        assert!(timer.focus_lock().is_visible());
    }

    #[test]
    fn test_domains_after_resume_show_lock() {
        let mut timer = timer();
        timer.apply(deliver(&timer, Outcome::Status(Ok(running_work_status()))), t0());
        assert!(!timer.focus_lock().is_visible());

        timer.apply(deliver(&timer, distractions(&["a.com", "b.com"])), t0());
        assert!(timer.focus_lock().is_visible());
    }

    #[test]
    fn test_domains_keep_lock_hidden_when_idle_or_on_break() {
        let mut timer = timer();
        timer.apply(deliver(&timer, distractions(&["a.com"])), t0());
        assert!(!timer.focus_lock().is_visible());

        let status = TimerStatus {
            timer_type: Some("break".to_string()),
            ..running_work_status()
        };
        timer.apply(deliver(&timer, Outcome::Status(Ok(status))), t0());
        timer.apply(deliver(&timer, distractions(&["a.com"])), t0());
        assert!(!timer.focus_lock().is_visible());
    }

    #[test]
    fn test_domain_reload_respects_dismissal() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 25));
        timer.apply(deliver(&timer, started(&["a.com"])), t0());
        timer.dismiss_focus_lock(t0());

        timer.apply(deliver(&timer, distractions(&["a.com", "b.com"])), t0());
        assert!(!timer.focus_lock().is_visible());
    }

    #[test]
    fn test_reload_distractions_sends_load() {
        let timer = timer();
        assert_eq!(timer.reload_distractions(), vec![Effect::Send(Request::LoadDistractions)]);
    }

    #[test]
    fn test_status_ignored_once_session_started() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Local", 25));
        let status = TimerStatus { active: true, remaining: 5.0, ..TimerStatus::default() };
        timer.resume_from_status(&status, t0());

        assert_eq!(timer.task_name(), "Local");
        assert_eq!(timer.countdown().remaining_seconds(), 1500);
    }

    #[test]
    fn test_completion_message_and_redirect() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 1));
        timer.stop();

        let outcome = Outcome::Completed(Ok(CompleteResponse {
            status: "success".to_string(),
            message: Some("Session completed!".to_string()),
            points: 30,
            reading_bonus: 5,
            pages_read: 12,
            linked_module: Some("nook".to_string()),
        }));
        let effects = timer.apply(deliver(&timer, outcome), t0());

        assert_eq!(
            toasts(&effects)[0].message,
            "Session completed! (+30 points!) Including 5 bonus points for focused reading!"
        );
        assert!(effects.contains(&Effect::Redirect(Destination::Nook)));
        assert!(!effects.contains(&Effect::Send(Request::Cancel)));
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_feedback_only_after_finish() {
        let mut timer = timer();
        assert!(timer.submit_feedback("😊", 4).is_empty());

        timer.start(&SessionSetup::new("Focus", 1));
        assert!(timer.submit_feedback("😊", 4).is_empty());

        timer.stop();
        assert_eq!(
            timer.submit_feedback("😊", 9),
            vec![Effect::Send(Request::Complete(CompleteForm {
                mood: "😊".to_string(),
                productivity_rating: 5,
                pages_read: None,
                current_page: None,
            }))]
        );
    }

    #[test]
    fn test_reading_setup_and_completion_progress() {
        let mut timer = timer();
        with_books(&mut timer);

        let mut setup = SessionSetup::new("", 1);
        setup.set_reading(true);
        setup.select_book(timer.books().first());
        assert_eq!(setup.task_name, "Reading: Dune");
        assert_eq!(setup.category, "reading");

        let effects = timer.start(&setup);
        match &effects[0] {
            Effect::Send(Request::Start(form)) => {
                assert_eq!(form.is_reading_session, "true");
                assert_eq!(form.linked_book_id.as_deref(), Some("b1"));
                assert_eq!(form.category, "reading");
            }
            other => panic!("unexpected effect {other:?}"),
        }

        for _ in 0..60 {
            timer.tick();
        }
        assert_eq!(timer.reading_progress().map(ReadingProgress::current_page), Some(100));

        timer.set_pages_read(25);
        let progress = timer.reading_progress().unwrap();
        assert_eq!(progress.current_page(), 125);
        assert_eq!(progress.percent(), 31);

        match &timer.submit_feedback("😊", 3)[0] {
            Effect::Send(Request::Complete(form)) => {
                assert_eq!(form.pages_read, Some(25));
                assert_eq!(form.current_page, Some(125));
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_disabling_reading_drops_book() {
        let mut setup = SessionSetup::new("", 25);
        setup.set_reading(true);
        setup.select_book(Some(&dune()));
        setup.set_reading(false);

        assert!(setup.book.is_none());
        assert!(!setup.reading);
    }

    #[test]
    fn test_start_reading_requires_books() {
        let mut timer = timer();
        let effects = timer.start_reading("b1", 25);

        assert_eq!(toasts(&effects)[0].kind, ToastKind::Warning);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_start_reading_unknown_book() {
        let mut timer = timer();
        with_books(&mut timer);

        let effects = timer.start_reading("nope", 25);
        assert_eq!(toasts(&effects)[0].message, "Please select a book");
    }

    #[test]
    fn test_start_reading_success() {
        let mut timer = timer();
        with_books(&mut timer);

        let effects = timer.start_reading("b1", 30);
        assert_eq!(
            effects,
            vec![Effect::Send(Request::StartReading(ReadingSessionForm {
                book_id: "b1".to_string(),
                duration: 30,
            }))]
        );
        assert!(timer.is_reading_pending());
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.start_reading("b1", 30).is_empty());

        let outcome = Outcome::ReadingStarted(Ok(ReadingSessionResponse {
            status: "success".to_string(),
            message: Some("Started reading session for \"Dune\"".to_string()),
            book: Some(ReadingBook {
                id: "b1".to_string(),
                title: "Dune".to_string(),
                current_page: 110,
                page_count: 400,
            }),
            distraction_domains: Some(vec!["news.site".to_string()]),
        }));
        timer.apply(deliver(&timer, outcome), t0());

        assert!(timer.is_ticking());
        assert!(!timer.is_reading_pending());
        assert_eq!(timer.task_name(), "Reading: Dune");
        assert_eq!(timer.category(), "reading");
        assert_eq!(timer.countdown().remaining_seconds(), 1800);
        assert_eq!(timer.linked_book().map(|b| b.current_page), Some(110));
        assert!(timer.focus_lock().is_visible());
    }

    #[test]
    fn test_start_reading_failure_returns_to_setup() {
        let mut timer = timer();
        with_books(&mut timer);
        timer.start_reading("b1", 25);

        let outcome = Outcome::ReadingStarted(Err(HookError::Server("Book not found".to_string())));
        let effects = timer.apply(deliver(&timer, outcome), t0());

        assert_eq!(toasts(&effects)[0].message, "Book not found");
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(!timer.is_reading_pending());
        assert_eq!(timer.start_reading("b1", 25).len(), 1);
    }

    #[test]
    fn test_pause_and_stop_wait_for_reading_confirmation() {
        let mut timer = timer();
        with_books(&mut timer);
        timer.start_reading("b1", 25);

        assert!(timer.pause().is_empty());
        assert!(timer.stop().is_empty());
        for _ in 0..5 {
            assert!(timer.tick().is_empty());
        }

        let outcome = Outcome::ReadingStarted(Err(HookError::Server("Book not found".to_string())));
        timer.apply(deliver(&timer, outcome), t0());

        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.submit_feedback("😊", 3).is_empty());
        assert_eq!(timer.countdown().remaining_seconds(), 1500);
    }

    #[test]
    fn test_start_response_merges_linked_book() {
        let mut timer = timer();
        with_books(&mut timer);
        let mut setup = SessionSetup::new("", 25);
        setup.set_reading(true);
        setup.select_book(Some(&dune()));
        timer.start(&setup);

        let outcome = Outcome::Started(Ok(StartTimerResponse {
            status: "success".to_string(),
            message: None,
            distraction_domains: None,
            linked_book: Some(LinkedBookInfo {
                id: Some("b1".to_string()),
                title: Some("Dune".to_string()),
                current_page: 105,
                page_count: None,
            }),
        }));
        timer.apply(deliver(&timer, outcome), t0());

        let book = timer.linked_book().unwrap();
        assert_eq!(book.current_page, 105);
        assert_eq!(book.page_count, 400);
    }

    #[test]
    fn test_transport_failure_uses_generic_toast() {
        let mut timer = timer();
        timer.start(&SessionSetup::new("Focus", 25));
        let err = HookError::Validation("connection refused".to_string());
        let effects = timer.apply(deliver(&timer, Outcome::Paused(Err(err))), t0());

        assert_eq!(effects, vec![Effect::Toast(Toast::error("Error pausing timer"))]);
        // Local state is not rolled back
        assert!(timer.is_ticking());
    }

    #[test]
    fn test_save_distractions_sends_trimmed_list() {
        let timer = timer();
        assert_eq!(
            timer.save_distractions("a.com, b.com, b.com"),
            vec![Effect::Send(Request::SaveDistractions {
                domains: vec!["a.com".to_string(), "b.com".to_string(), "b.com".to_string()],
            })]
        );
    }

    #[test]
    fn test_saved_distractions_overwrite_local_list() {
        let mut timer = timer();
        let outcome = Outcome::DistractionsSaved(Ok(DistractionList {
            status: "success".to_string(),
            message: Some("Updated 2 distraction domains".to_string()),
            domains: vec!["a.com".to_string(), "b.com".to_string()],
        }));
        let delivery = Delivery { epoch: 0, scoped: false, outcome };
        let effects = timer.apply(delivery, t0());

        assert_eq!(toasts(&effects)[0].message, "Updated 2 distraction domains");
        assert_eq!(timer.focus_lock().domains().len(), 2);
    }

    #[test]
    fn test_preset_ignored_while_running() {
        let mut timer = timer();
        assert!(timer.set_preset(Preset { minutes: 5, kind: SessionKind::Break }));
        assert_eq!(timer.countdown().remaining_seconds(), 300);
        assert_eq!(timer.kind(), SessionKind::Break);

        timer.start(&SessionSetup::new("Focus", 5));
        assert!(!timer.set_preset(Preset { minutes: 50, kind: SessionKind::Work }));
        assert_eq!(timer.countdown().duration_seconds(), 300);
    }

    #[test]
    fn test_title_and_display_task() {
        let mut timer = timer();
        assert_eq!(timer.title(), "25:00 - Timer");
        assert_eq!(timer.display_task(), "Ready to Focus");

        timer.start(&SessionSetup::new("Write report", 25));
        timer.tick();
        assert_eq!(timer.title(), "24:59 - Write report");
    }
}
