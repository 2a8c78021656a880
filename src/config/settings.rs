//! Configuration settings for hook.
//!
//! Settings are loaded from `~/.hook/config.yaml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::HookError;
use crate::features::focus::SessionKind;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server connection settings.
    pub server: ServerConfig,
    /// Countdown defaults.
    pub timer: TimerConfig,
    /// Focus lock reminder settings.
    pub focus_lock: FocusLockConfig,
    /// What happens after a session is completed.
    pub completion: CompletionConfig,
}

/// Server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the Hook server, without the `/hook` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `session` cookie of a logged-in user.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// A one-key duration/kind preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Duration in minutes.
    pub minutes: u32,
    /// Session kind the preset switches to.
    pub kind: SessionKind,
}

/// Countdown defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Duration of a new session in minutes.
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    /// Category used when none is entered.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Presets cycled from the setup screen.
    #[serde(default = "default_presets")]
    pub presets: Vec<Preset>,
    /// Mood choices offered on completion.
    #[serde(default = "default_moods")]
    pub moods: Vec<String>,
}

/// Focus lock reminder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusLockConfig {
    /// Seconds between reminder message refreshes.
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u64,
    /// Minutes the reminder stays hidden after a dismissal.
    #[serde(default = "default_dismiss_minutes")]
    pub dismiss_minutes: u64,
    /// Maximum number of domains named in one reminder.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

/// Completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Delay before following the post-completion redirect.
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_seconds: u64,
    /// Open the redirect target in a browser instead of just showing it.
    #[serde(default)]
    pub open_browser: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

const fn default_minutes() -> u32 {
    25
}

fn default_category() -> String {
    "general".to_string()
}

fn default_presets() -> Vec<Preset> {
    vec![
        Preset { minutes: 25, kind: SessionKind::Work },
        Preset { minutes: 5, kind: SessionKind::Break },
        Preset { minutes: 15, kind: SessionKind::Break },
        Preset { minutes: 50, kind: SessionKind::Work },
    ]
}

fn default_moods() -> Vec<String> {
    ["😊", "🤩", "😐", "😴", "😤"].iter().map(ToString::to_string).collect()
}

const fn default_refresh_seconds() -> u64 {
    30
}

const fn default_dismiss_minutes() -> u64 {
    5
}

const fn default_sample_size() -> usize {
    3
}

const fn default_redirect_delay() -> u64 {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            default_category: default_category(),
            presets: default_presets(),
            moods: default_moods(),
        }
    }
}

impl Default for FocusLockConfig {
    fn default() -> Self {
        Self {
            refresh_seconds: default_refresh_seconds(),
            dismiss_minutes: default_dismiss_minutes(),
            sample_size: default_sample_size(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            redirect_delay_seconds: default_redirect_delay(),
            open_browser: false,
        }
    }
}

impl ServerConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl CompletionConfig {
    /// Redirect delay as a `Duration`.
    #[must_use]
    pub const fn redirect_delay(&self) -> Duration {
        Duration::from_secs(self.redirect_delay_seconds)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, HookError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, HookError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            HookError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            HookError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), HookError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| HookError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            HookError::Config(format!("Failed to write config file {}: {e}", path.display()))
        })
    }

    /// Override the server URL, e.g. from `--server` or `HOOK_SERVER`.
    pub fn with_server(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.server.base_url = url;
        }
        self
    }
}
