//! Side effects requested by session state transitions.
//!
//! Transitions on [`super::SessionTimer`] never touch the network or the
//! screen. They return effects and the front end carries them out.

use serde::Serialize;

use crate::api::{CompleteForm, ReadingSessionForm, StartTimerForm};

/// An outbound call to the Hook server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Start(StartTimerForm),
    StartReading(ReadingSessionForm),
    Pause,
    Cancel,
    Complete(CompleteForm),
    Status,
    LoadDistractions,
    SaveDistractions { domains: Vec<String> },
    LoadBooks,
}

impl Request {
    /// Whether the response belongs to the current session run.
    ///
    /// Scoped responses are dropped once the session has been reset.
    #[must_use]
    pub const fn is_session_scoped(&self) -> bool {
        matches!(
            self,
            Self::Start(_)
                | Self::StartReading(_)
                | Self::Pause
                | Self::Complete(_)
                | Self::Status
        )
    }
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

/// A short-lived user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self { message: message.into(), kind }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Info)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Warning)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }
}

/// Where to go once a session has been completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Task timer dashboard.
    Hook,
    /// Reading dashboard.
    Nook,
}

impl Destination {
    /// Pick the destination from the `linked_module` field of a completion.
    #[must_use]
    pub fn from_linked_module(module: Option<&str>) -> Self {
        if module == Some("nook") {
            Self::Nook
        } else {
            Self::Hook
        }
    }

    /// Server path of the destination page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Hook => "/hook/",
            Self::Nook => "/nook/",
        }
    }
}

/// Something the front end must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Dispatch a request tagged with the session's current epoch.
    Send(Request),
    /// Show a toast.
    Toast(Toast),
    /// Move input focus to the task name field.
    FocusTaskInput,
    /// Show the completion/feedback prompt.
    PromptFeedback,
    /// Abort requests issued under an older epoch.
    AbortStale,
    /// Follow the post-completion redirect after the configured delay.
    Redirect(Destination),
}
