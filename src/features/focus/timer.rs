//! Countdown engine for focus sessions.
//!
//! Provides the second-granularity countdown plus duration parsing/formatting.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Countdown state.
///
/// `Paused` only exists inside a run, so "paused implies running" holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Not started; the setup form is shown.
    Idle,
    /// Counting down.
    Running,
    /// Run in progress but not counting.
    Paused,
    /// Stopped or completed; waiting for session feedback.
    Finished,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Ready"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// A countdown timer that advances one second per [`Countdown::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    duration_seconds: u32,
    remaining_seconds: u32,
    state: TimerState,
}

impl Countdown {
    /// Create an idle countdown with the given duration.
    #[must_use]
    pub const fn new(duration_seconds: u32) -> Self {
        Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            state: TimerState::Idle,
        }
    }

    /// Create an idle countdown from minutes.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self::new(minutes.saturating_mul(60))
    }

    /// Begin a run with the given duration, refilling the remaining time.
    ///
    /// Returns false when a run is already in progress.
    pub fn start(&mut self, duration_seconds: u32) -> bool {
        if self.is_running() {
            return false;
        }

        self.duration_seconds = duration_seconds;
        self.remaining_seconds = duration_seconds;
        self.state = TimerState::Running;
        true
    }

    /// Adopt a run that is already in progress elsewhere.
    ///
    /// The original duration is unknown, so it is approximated by the remaining time.
    pub fn resume_from(&mut self, remaining_seconds: u32, paused: bool) {
        self.duration_seconds = remaining_seconds;
        self.remaining_seconds = remaining_seconds;
        self.state = if paused { TimerState::Paused } else { TimerState::Running };
    }

    /// Toggle pause.
    ///
    /// Returns `Some(true)` when now paused, `Some(false)` when resumed and
    /// `None` when there is no run to pause.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(true)
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(false)
            }
            TimerState::Idle | TimerState::Finished => None,
        }
    }

    /// Tick the timer by one second.
    ///
    /// Returns true if the timer just completed.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        if self.remaining_seconds == 0 {
            self.state = TimerState::Finished;
            true
        } else {
            false
        }
    }

    /// End the run early, keeping the remaining time.
    ///
    /// Returns false when there was no run.
    pub fn stop(&mut self) -> bool {
        if self.is_running() {
            self.state = TimerState::Finished;
            true
        } else {
            false
        }
    }

    /// Reset the timer to its configured duration.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.duration_seconds;
        self.state = TimerState::Idle;
    }

    /// Change the duration while no run is in progress.
    ///
    /// Returns false (and changes nothing) while running.
    pub fn set_duration(&mut self, duration_seconds: u32) -> bool {
        if self.is_running() {
            return false;
        }
        self.duration_seconds = duration_seconds;
        self.remaining_seconds = duration_seconds;
        true
    }

    /// Configured duration in seconds.
    #[must_use]
    pub const fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Remaining seconds.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Get remaining time as Duration.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        Duration::seconds(i64::from(self.remaining_seconds))
    }

    /// Get progress as a fraction (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 1.0;
        }
        let done = f64::from(self.duration_seconds.saturating_sub(self.remaining_seconds));
        (done / f64::from(self.duration_seconds)).clamp(0.0, 1.0)
    }

    /// Whether a run is in progress (counting or paused).
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running | TimerState::Paused)
    }

    /// Whether the run is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    /// Whether the one-second tick should be scheduled.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Get the current state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }
}

/// Format a duration as MM:SS. Minutes are not wrapped at an hour.
#[must_use]
pub fn format_duration_mmss(d: Duration) -> String {
    let total_seconds = d.num_seconds().abs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Longest session accepted from user input (24 hours).
pub const MAX_DURATION_SECONDS: i64 = 24 * 60 * 60;

/// Parse a duration string like "25m", "1h30m", "90s".
///
/// Returns `None` for zero, negative or overflowing input and for anything
/// longer than [`MAX_DURATION_SECONDS`].
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    // A bare number means minutes
    if let Ok(minutes) = s.parse::<i64>() {
        return bounded(minutes.checked_mul(60)?);
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if !current_num.is_empty() {
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        } else {
            return None;
        }
    }

    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    bounded(total_seconds)
}

fn bounded(seconds: i64) -> Option<Duration> {
    if (1..=MAX_DURATION_SECONDS).contains(&seconds) {
        Duration::try_seconds(seconds)
    } else {
        None
    }
}

/// Parse a duration string into whole minutes, rounding partial minutes up.
///
/// The server only accepts whole minutes.
#[must_use]
pub fn parse_minutes(s: &str) -> Option<u32> {
    let seconds = parse_duration(s)?.num_seconds();
    u32::try_from((seconds + 59) / 60).ok()
}
