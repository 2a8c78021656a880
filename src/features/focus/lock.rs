//! Focus lock: a recurring reminder of the user's distracting domains.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::FocusLockConfig;

/// Message shown when no domain can be sampled.
pub const FALLBACK_MESSAGE: &str = "Remember to avoid distracting sites during your focus session";

/// Timing and sampling knobs for the reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusLockSettings {
    /// Interval between message refreshes.
    pub refresh: Duration,
    /// How long a dismissal suppresses the widget.
    pub dismiss_for: Duration,
    /// Maximum domains named per message.
    pub sample_size: usize,
}

impl Default for FocusLockSettings {
    fn default() -> Self {
        Self::from(&FocusLockConfig::default())
    }
}

impl From<&FocusLockConfig> for FocusLockSettings {
    fn from(config: &FocusLockConfig) -> Self {
        // Capped at a day so chrono never overflows
        let refresh = config.refresh_seconds.clamp(1, 86_400);
        let dismiss = config.dismiss_minutes.min(1_440);
        Self {
            refresh: Duration::seconds(i64::try_from(refresh).unwrap_or(30)),
            dismiss_for: Duration::minutes(i64::try_from(dismiss).unwrap_or(5)),
            sample_size: config.sample_size,
        }
    }
}

/// Reminder widget state.
#[derive(Debug, Clone)]
pub struct FocusLock {
    settings: FocusLockSettings,
    domains: Vec<String>,
    visible: bool,
    message: String,
    dismissed_until: Option<DateTime<Utc>>,
    next_refresh: Option<DateTime<Utc>>,
    rng: StdRng,
}

impl FocusLock {
    #[must_use]
    pub fn new(settings: FocusLockSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Deterministic sampling, for tests.
    #[must_use]
    pub fn with_seed(settings: FocusLockSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: FocusLockSettings, rng: StdRng) -> Self {
        Self {
            settings,
            domains: Vec::new(),
            visible: false,
            message: String::new(),
            dismissed_until: None,
            next_refresh: None,
            rng,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &FocusLockSettings {
        &self.settings
    }

    /// Replace the domain list.
    pub fn set_domains(&mut self, domains: Vec<String>) {
        self.domains = domains;
    }

    #[must_use]
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn is_dismissed(&self) -> bool {
        self.dismissed_until.is_some()
    }

    /// When a pending dismissal lifts.
    #[must_use]
    pub const fn dismissed_until(&self) -> Option<DateTime<Utc>> {
        self.dismissed_until
    }

    /// Show the widget with a fresh message and schedule refreshes.
    ///
    /// Does nothing while dismissed or when there are no domains.
    pub fn show(&mut self, now: DateTime<Utc>) -> bool {
        if self.domains.is_empty() || self.is_dismissed() {
            return false;
        }

        self.message = self.compose();
        self.visible = true;
        self.next_refresh = Some(now + self.settings.refresh);
        true
    }

    /// Hide the widget and cancel its refresher.
    pub fn hide(&mut self) {
        self.visible = false;
        self.next_refresh = None;
    }

    /// Hide the widget and suppress it for the dismissal window.
    pub fn dismiss(&mut self, now: DateTime<Utc>) {
        self.dismissed_until = Some(now + self.settings.dismiss_for);
        self.hide();
        debug!(until = ?self.dismissed_until, "focus lock dismissed");
    }

    /// Forget a pending dismissal without showing anything.
    pub fn clear_dismissal(&mut self) {
        self.dismissed_until = None;
    }

    /// Advance the widget's timers.
    ///
    /// Lifts an expired dismissal (reshowing iff `session_running`) and
    /// refreshes the message when its interval has elapsed. Returns true if
    /// anything visible changed.
    pub fn poll(&mut self, now: DateTime<Utc>, session_running: bool) -> bool {
        let mut changed = false;

        if let Some(until) = self.dismissed_until {
            if now >= until {
                self.dismissed_until = None;
                if session_running {
                    changed |= self.show(now);
                }
            }
        }

        if let Some(next) = self.next_refresh {
            if self.visible && now >= next {
                if session_running && !self.is_dismissed() {
                    let message = self.compose();
                    changed |= message != self.message;
                    self.message = message;
                }
                self.next_refresh = Some(now + self.settings.refresh);
            }
        }

        changed
    }

    fn compose(&mut self) -> String {
        let sample = sample_domains(&self.domains, self.settings.sample_size, &mut self.rng);
        reminder_message(&sample, self.domains.len(), self.settings.sample_size)
    }
}

/// Pick up to `count` distinct entries at random.
pub fn sample_domains<R: Rng + ?Sized>(domains: &[String], count: usize, rng: &mut R) -> Vec<String> {
    domains
        .choose_multiple(rng, count.min(domains.len()))
        .cloned()
        .collect()
}

/// Build the reminder text for a sample drawn from `total` domains.
#[must_use]
pub fn reminder_message(sample: &[String], total: usize, sample_size: usize) -> String {
    if sample.is_empty() {
        return FALLBACK_MESSAGE.to_string();
    }

    let mut message = format!("Stay focused! Avoid: {}", sample.join(", "));
    if total > sample_size {
        let _ = write!(message, " (+{} more)", total - sample_size);
    }
    message
}

/// Split a comma-separated domain list, trimming entries and dropping empty ones.
///
/// No dedupe or normalization happens here; the server owns that.
#[must_use]
pub fn parse_domain_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(ToString::to_string)
        .collect()
}
