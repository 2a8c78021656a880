//! Wire types for the Hook server's `/hook/*` endpoints.

use serde::{Deserialize, Serialize};

use crate::features::focus::SessionKind;

/// Status value the server uses for a successful call.
pub const STATUS_SUCCESS: &str = "success";

/// Common `{status, message}` envelope shared by the JSON responses.
pub trait Envelope {
    /// Raw `status` field.
    fn status(&self) -> &str;
    /// Optional human-readable `message` field.
    fn message(&self) -> Option<&str>;

    /// Whether the server reported success.
    fn is_success(&self) -> bool {
        self.status() == STATUS_SUCCESS
    }
}

macro_rules! envelope {
    ($($ty:ty),* $(,)?) => {
        $(impl Envelope for $ty {
            fn status(&self) -> &str {
                &self.status
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        })*
    };
}

/// Form posted to `/hook/start_timer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartTimerForm {
    pub task_name: String,
    /// Whole minutes.
    pub duration: u32,
    pub timer_type: SessionKind,
    pub category: String,
    /// `"true"` or `"false"`; the server compares the string.
    pub is_reading_session: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_book_id: Option<String>,
}

/// Book summary echoed back by `/hook/start_timer`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LinkedBookInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub page_count: Option<u32>,
}

/// Response of `/hook/start_timer`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartTimerResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub distraction_domains: Option<Vec<String>>,
    #[serde(default)]
    pub linked_book: Option<LinkedBookInfo>,
}

/// Bare `{status, message}` response of pause and cancel.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ack {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Form posted to `/hook/complete_timer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteForm {
    pub mood: String,
    pub productivity_rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_read: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
}

/// Response of `/hook/complete_timer`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompleteResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub reading_bonus: i64,
    #[serde(default)]
    pub pages_read: u32,
    #[serde(default)]
    pub linked_module: Option<String>,
}

/// Response of `/hook/get_timer_status`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimerStatus {
    pub active: bool,
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub timer_type: Option<String>,
    /// Seconds left, possibly fractional.
    #[serde(default)]
    pub remaining: f64,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl TimerStatus {
    /// Session kind reported by the server, `work` when missing.
    #[must_use]
    pub fn kind(&self) -> SessionKind {
        self.timer_type
            .as_deref()
            .map_or(SessionKind::Work, SessionKind::parse)
    }

    /// Remaining time truncated to whole seconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn remaining_seconds(&self) -> u32 {
        if self.remaining.is_finite() && self.remaining > 0.0 {
            self.remaining.floor() as u32
        } else {
            0
        }
    }
}

/// Response of `/hook/get_distraction_list` and `/hook/update_distraction_list`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistractionList {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

/// JSON body posted to `/hook/update_distraction_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistractionUpdate {
    pub domains: Vec<String>,
}

/// A book from `/hook/get_user_books`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress_percentage: f64,
}

/// Response of `/hook/get_user_books`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookList {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Form posted to `/hook/start_reading_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadingSessionForm {
    pub book_id: String,
    /// Whole minutes.
    pub duration: u32,
}

/// Book block of the `/hook/start_reading_session` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReadingBook {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub page_count: u32,
}

/// Response of `/hook/start_reading_session`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadingSessionResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub book: Option<ReadingBook>,
    #[serde(default)]
    pub distraction_domains: Option<Vec<String>>,
}

envelope!(
    Ack,
    StartTimerResponse,
    CompleteResponse,
    DistractionList,
    BookList,
    ReadingSessionResponse,
);
