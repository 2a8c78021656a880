//! Application state for the TUI.
//!
//! [`App`] wraps a [`SessionTimer`] with the form state the screens need.
//! It never talks to the network itself: requests pile up as [`Command`]s
//! that the run loop hands to the dispatcher, which keeps every transition
//! testable with a fake clock.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::Book;
use crate::config::{CompletionConfig, Config, Preset};
use crate::features::focus::{
    parse_minutes, Delivery, Destination, Effect, Request, SessionSetup, SessionTimer,
    TimerState, Toast,
};

/// Countdown tick interval.
pub const TICK: Duration = Duration::from_secs(1);

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

const MAX_TOASTS: usize = 3;

/// Which screen has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Setup form; the countdown is idle.
    Setup,
    /// Countdown running or paused.
    Running,
    /// Run ended; collecting feedback.
    Feedback,
    /// Distraction list editor.
    Editing,
}

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    Left,
    Right,
    Toggle,
    Submit,
    StartReading,
    Preset(usize),
    Pause,
    Stop,
    Reset,
    Dismiss,
    EditDomains,
    ReloadDomains,
    Close,
}

/// Work for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send { epoch: u64, request: Request },
    AbortBefore(u64),
}

/// Setup form fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Task,
    Duration,
    Category,
    Kind,
    Reading,
    Book,
}

impl SetupField {
    const ORDER: [Self; 6] = [
        Self::Task,
        Self::Duration,
        Self::Category,
        Self::Kind,
        Self::Reading,
        Self::Book,
    ];

    /// Whether the field takes typed text.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Task | Self::Duration | Self::Category)
    }

    fn step(self, forward: bool, reading: bool) -> Self {
        // The book picker only exists in reading mode
        let fields: Vec<Self> = Self::ORDER
            .into_iter()
            .filter(|f| reading || *f != Self::Book)
            .collect();
        let pos = fields.iter().position(|f| *f == self).unwrap_or(0);
        let len = fields.len();
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        fields[next]
    }
}

/// State of the setup screen.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub setup: SessionSetup,
    pub duration_input: String,
    pub field: SetupField,
}

impl SetupForm {
    #[must_use]
    pub fn new(minutes: u32, category: &str) -> Self {
        let mut setup = SessionSetup::new("", minutes);
        setup.category = category.to_string();
        Self {
            setup,
            duration_input: minutes.to_string(),
            field: SetupField::Task,
        }
    }

    /// Parsed duration, if the input is valid.
    #[must_use]
    pub fn minutes(&self) -> Option<u32> {
        parse_minutes(&self.duration_input)
    }

    fn input(&mut self, c: char) {
        match self.field {
            SetupField::Task => self.setup.task_name.push(c),
            SetupField::Duration if c.is_ascii_alphanumeric() => self.duration_input.push(c),
            SetupField::Category => self.setup.category.push(c),
            _ => {}
        }
    }

    fn backspace(&mut self) {
        match self.field {
            SetupField::Task => {
                self.setup.task_name.pop();
            }
            SetupField::Duration => {
                self.duration_input.pop();
            }
            SetupField::Category => {
                self.setup.category.pop();
            }
            _ => {}
        }
    }

    fn cycle_book(&mut self, books: &[Book], forward: bool) {
        if books.is_empty() {
            return;
        }
        let current = self
            .setup
            .book
            .as_ref()
            .and_then(|b| books.iter().position(|x| x.id == b.id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % books.len(),
            (Some(i), false) => (i + books.len() - 1) % books.len(),
        };
        self.setup.select_book(books.get(next));
    }

    fn apply_preset(&mut self, preset: Preset) {
        self.setup.apply_preset(preset);
        self.duration_input = preset.minutes.to_string();
    }
}

/// Feedback screen fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackField {
    Mood,
    Rating,
    PagesRead,
    CurrentPage,
}

/// State of the feedback screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackForm {
    pub mood: usize,
    pub rating: u8,
    pub field: FeedbackField,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self {
            mood: 0,
            rating: 3,
            field: FeedbackField::Mood,
        }
    }
}

/// A visible toast.
#[derive(Debug, Clone)]
pub struct ToastEntry {
    pub toast: Toast,
    pub expires: Instant,
}

/// Post-completion redirect waiting for its delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub url: String,
    pub due: Instant,
}

/// Application state.
pub struct App {
    pub timer: SessionTimer,
    pub form: SetupForm,
    pub feedback: FeedbackForm,
    /// Distraction editor input, when open.
    pub editor: Option<String>,
    pub toasts: Vec<ToastEntry>,
    pub redirect: Option<Redirect>,
    pub should_quit: bool,
    pub moods: Vec<String>,
    pub presets: Vec<Preset>,
    base_url: String,
    completion: CompletionConfig,
    default_minutes: u32,
    default_category: String,
    last_tick: Instant,
    outbox: Vec<Command>,
}

impl App {
    /// Create a new app instance.
    #[must_use]
    pub fn new(config: &Config, base_url: &str, now: Instant) -> Self {
        Self::with_timer(SessionTimer::from_config(config), config, base_url, now)
    }

    /// Create an app around an existing session.
    #[must_use]
    pub fn with_timer(timer: SessionTimer, config: &Config, base_url: &str, now: Instant) -> Self {
        let timer_config = &config.timer;
        Self {
            timer,
            form: SetupForm::new(timer_config.default_minutes, &timer_config.default_category),
            feedback: FeedbackForm::default(),
            editor: None,
            toasts: Vec::new(),
            redirect: None,
            should_quit: false,
            moods: timer_config.moods.clone(),
            presets: timer_config.presets.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            completion: config.completion.clone(),
            default_minutes: timer_config.default_minutes,
            default_category: timer_config.default_category.clone(),
            last_tick: now,
            outbox: Vec::new(),
        }
    }

    /// Queue the startup loads.
    pub fn start_up(&mut self, now: Instant) {
        let effects = self.timer.on_load();
        self.run_effects(effects, now);
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.editor.is_some() {
            return Mode::Editing;
        }
        match self.timer.state() {
            TimerState::Idle => Mode::Setup,
            TimerState::Running | TimerState::Paused => Mode::Running,
            TimerState::Finished => Mode::Feedback,
        }
    }

    /// Requests queued since the last call.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    /// Handle a user action.
    pub fn handle(&mut self, action: Action, now: Instant, wall: DateTime<Utc>) {
        if action == Action::Quit {
            self.should_quit = true;
            return;
        }

        match self.mode() {
            Mode::Editing => self.handle_editor(action, now),
            Mode::Setup => self.handle_setup(action, now),
            Mode::Running => self.handle_running(action, now, wall),
            Mode::Feedback => self.handle_feedback(action, now),
        }
    }

    fn handle_editor(&mut self, action: Action, now: Instant) {
        let Some(input) = &mut self.editor else {
            return;
        };
        match action {
            Action::Input(c) => input.push(c),
            Action::Backspace => {
                input.pop();
            }
            Action::Submit => {
                let effects = self.timer.save_distractions(input);
                self.editor = None;
                self.run_effects(effects, now);
            }
            Action::Close => self.editor = None,
            _ => {}
        }
    }

    fn handle_setup(&mut self, action: Action, now: Instant) {
        let reading = self.form.setup.reading;
        match action {
            Action::NextField => self.form.field = self.form.field.step(true, reading),
            Action::PrevField => self.form.field = self.form.field.step(false, reading),
            Action::Input(c) => {
                self.form.input(c);
                self.sync_duration();
            }
            Action::Backspace => {
                self.form.backspace();
                self.sync_duration();
            }
            Action::Toggle | Action::Left | Action::Right => {
                let forward = action != Action::Left;
                match self.form.field {
                    SetupField::Kind => self.form.setup.kind = self.form.setup.kind.toggled(),
                    SetupField::Reading => self.form.setup.set_reading(!reading),
                    SetupField::Book => self.form.cycle_book(self.timer.books(), forward),
                    _ => {}
                }
            }
            Action::Preset(index) => {
                if let Some(preset) = self.presets.get(index).copied() {
                    self.form.apply_preset(preset);
                    self.timer.set_preset(preset);
                }
            }
            Action::Submit => self.submit_setup(now),
            Action::StartReading => self.submit_reading(now),
            Action::EditDomains => self.open_editor(),
            Action::ReloadDomains => {
                let effects = self.timer.reload_distractions();
                self.run_effects(effects, now);
            }
            _ => {}
        }
    }

    fn sync_duration(&mut self) {
        if self.form.field == SetupField::Duration {
            if let Some(minutes) = self.form.minutes() {
                self.timer.set_duration(minutes);
            }
        }
    }

    fn submit_setup(&mut self, now: Instant) {
        let Some(minutes) = self.form.minutes() else {
            self.form.field = SetupField::Duration;
            self.push_toast(Toast::warning("Please enter a valid duration"), now);
            return;
        };
        self.form.setup.duration_minutes = minutes;
        let effects = self.timer.start(&self.form.setup);
        self.last_tick = now;
        self.run_effects(effects, now);
    }

    fn submit_reading(&mut self, now: Instant) {
        let minutes = self.form.minutes().unwrap_or(self.default_minutes);
        let book_id = self
            .form
            .setup
            .book
            .as_ref()
            .map(|b| b.id.clone())
            .unwrap_or_default();
        let effects = self.timer.start_reading(&book_id, minutes);
        self.last_tick = now;
        self.run_effects(effects, now);
    }

    fn handle_running(&mut self, action: Action, now: Instant, wall: DateTime<Utc>) {
        let effects = match action {
            Action::Pause | Action::Toggle => self.timer.pause(),
            Action::Stop => self.timer.stop(),
            Action::Reset => self.timer.reset(),
            Action::Dismiss => self.timer.dismiss_focus_lock(wall),
            Action::EditDomains => {
                self.open_editor();
                Vec::new()
            }
            Action::ReloadDomains => self.timer.reload_distractions(),
            _ => Vec::new(),
        };
        self.run_effects(effects, now);
    }

    fn handle_feedback(&mut self, action: Action, now: Instant) {
        let reading = self.timer.reading_progress().is_some();
        let fields: &[FeedbackField] = if reading {
            &[
                FeedbackField::Mood,
                FeedbackField::Rating,
                FeedbackField::PagesRead,
                FeedbackField::CurrentPage,
            ]
        } else {
            &[FeedbackField::Mood, FeedbackField::Rating]
        };
        let pos = fields.iter().position(|f| *f == self.feedback.field).unwrap_or(0);

        match action {
            Action::NextField => self.feedback.field = fields[(pos + 1) % fields.len()],
            Action::PrevField => {
                self.feedback.field = fields[(pos + fields.len() - 1) % fields.len()];
            }
            Action::Left | Action::Right => self.adjust_feedback(action == Action::Right),
            Action::Input(c) => {
                if let Some(digit) = c.to_digit(10) {
                    self.type_feedback_digit(digit);
                }
            }
            Action::Backspace => self.erase_feedback_digit(),
            Action::Submit => {
                let mood = self
                    .moods
                    .get(self.feedback.mood)
                    .cloned()
                    .unwrap_or_else(|| "😊".to_string());
                let effects = self.timer.submit_feedback(&mood, self.feedback.rating);
                self.run_effects(effects, now);
            }
            Action::Reset => {
                let effects = self.timer.reset();
                self.run_effects(effects, now);
            }
            _ => {}
        }
    }

    fn adjust_feedback(&mut self, up: bool) {
        match self.feedback.field {
            FeedbackField::Mood if !self.moods.is_empty() => {
                let len = self.moods.len();
                self.feedback.mood = if up {
                    (self.feedback.mood + 1) % len
                } else {
                    (self.feedback.mood + len - 1) % len
                };
            }
            FeedbackField::Rating => {
                self.feedback.rating = if up {
                    (self.feedback.rating + 1).min(5)
                } else {
                    self.feedback.rating.saturating_sub(1).max(1)
                };
            }
            FeedbackField::PagesRead => {
                let pages = self.pages_read();
                let next = if up { pages.saturating_add(1) } else { pages.saturating_sub(1) };
                self.timer.set_pages_read(next);
            }
            FeedbackField::CurrentPage => {
                let page = self.current_page();
                let next = if up { page.saturating_add(1) } else { page.saturating_sub(1) };
                self.timer.set_current_page(next);
            }
            FeedbackField::Mood => {}
        }
    }

    fn type_feedback_digit(&mut self, digit: u32) {
        match self.feedback.field {
            FeedbackField::Rating if (1..=5).contains(&digit) => {
                self.feedback.rating = u8::try_from(digit).unwrap_or(3);
            }
            FeedbackField::PagesRead => {
                let pages = self.pages_read().saturating_mul(10).saturating_add(digit);
                self.timer.set_pages_read(pages);
            }
            FeedbackField::CurrentPage => {
                let page = self.current_page().saturating_mul(10).saturating_add(digit);
                self.timer.set_current_page(page);
            }
            _ => {}
        }
    }

    fn erase_feedback_digit(&mut self) {
        match self.feedback.field {
            FeedbackField::PagesRead => self.timer.set_pages_read(self.pages_read() / 10),
            FeedbackField::CurrentPage => self.timer.set_current_page(self.current_page() / 10),
            _ => {}
        }
    }

    fn pages_read(&self) -> u32 {
        self.timer.reading_progress().map_or(0, |p| p.pages_read())
    }

    fn current_page(&self) -> u32 {
        self.timer.reading_progress().map_or(0, |p| p.current_page())
    }

    fn open_editor(&mut self) {
        self.editor = Some(self.timer.focus_lock().domains().join(", "));
    }

    /// Apply a server response.
    pub fn deliver(&mut self, delivery: Delivery, now: Instant, wall: DateTime<Utc>) {
        let effects = self.timer.apply(delivery, wall);
        self.run_effects(effects, now);
    }

    /// Advance clocks: countdown ticks, focus lock, toasts and the redirect.
    pub fn on_frame(&mut self, now: Instant, wall: DateTime<Utc>) {
        if self.timer.is_ticking() {
            while now.duration_since(self.last_tick) >= TICK && self.timer.is_ticking() {
                self.last_tick += TICK;
                let effects = self.timer.tick();
                self.run_effects(effects, now);
            }
        } else {
            // Next tick is a full second after (re)starting
            self.last_tick = now;
        }

        self.timer.poll_focus_lock(wall);
        self.toasts.retain(|t| t.expires > now);

        if self.redirect.as_ref().is_some_and(|r| r.due <= now) {
            if let Some(redirect) = self.redirect.take() {
                self.follow_redirect(&redirect.url, now);
            }
        }
    }

    fn follow_redirect(&mut self, url: &str, now: Instant) {
        if self.completion.open_browser {
            info!(%url, "opening dashboard");
            if let Err(e) = webbrowser::open(url) {
                warn!(error = %e, "could not open browser");
            }
        }
        self.push_toast(Toast::info(format!("Continue at {url}")), now);
    }

    fn run_effects(&mut self, effects: Vec<Effect>, now: Instant) {
        for effect in effects {
            match effect {
                Effect::Send(request) => self.outbox.push(Command::Send {
                    epoch: self.timer.epoch(),
                    request,
                }),
                Effect::AbortStale => self.outbox.push(Command::AbortBefore(self.timer.epoch())),
                Effect::Toast(toast) => self.push_toast(toast, now),
                Effect::FocusTaskInput => self.form.field = SetupField::Task,
                Effect::PromptFeedback => self.feedback = FeedbackForm::default(),
                Effect::Redirect(destination) => self.schedule_redirect(destination, now),
            }
        }
    }

    fn schedule_redirect(&mut self, destination: Destination, now: Instant) {
        let url = format!("{}{}", self.base_url, destination.path());
        debug!(%url, "redirect scheduled");
        self.redirect = Some(Redirect {
            url,
            due: now + self.completion.redirect_delay(),
        });
        self.form = SetupForm::new(self.default_minutes, &self.default_category);
    }

    fn push_toast(&mut self, toast: Toast, now: Instant) {
        self.toasts.push(ToastEntry {
            toast,
            expires: now + TOAST_TTL,
        });
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
    }
}
