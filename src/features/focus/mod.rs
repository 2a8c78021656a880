//! Focus sessions.
//!
//! Everything here is client-side state and has no I/O:
//! - the countdown engine
//! - the session aggregate and the effects it emits
//! - the focus-lock reminder
//! - reading-session linkage
//!
//! The [`dispatch`] module is the one exception. It runs requests on a
//! tokio runtime and feeds the results back as [`Delivery`] values.

pub mod dispatch;
pub mod effect;
pub mod lock;
pub mod reading;
pub mod session;
pub mod timer;

pub use dispatch::{Delivery, Dispatcher, Outcome};
pub use effect::{Destination, Effect, Request, Toast, ToastKind};
pub use lock::{parse_domain_list, FocusLock, FocusLockSettings};
pub use reading::{book_label, BookLink, ReadingProgress};
pub use session::{SessionKind, SessionSetup, SessionTimer};
pub use timer::{format_duration, format_duration_mmss, parse_duration, parse_minutes, Countdown, TimerState};
