use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::types::{
    Ack, BookList, CompleteForm, CompleteResponse, DistractionList, DistractionUpdate, Envelope,
    ReadingSessionForm, ReadingSessionResponse, StartTimerForm, StartTimerResponse, TimerStatus,
};
use crate::config::ServerConfig;
use crate::error::HookError;

/// Async client for the Hook server's timer endpoints.
#[derive(Clone)]
pub struct HookClient {
    http: reqwest::Client,
    base_url: String,
}

impl HookClient {
    /// Build a client from server settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie is not a valid header value or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ServerConfig) -> Result<Self, HookError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie.as_deref() {
            let value = HeaderValue::from_str(&format!("session={cookie}"))
                .map_err(|e| HookError::Config(format!("Invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a server path such as `/hook/`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a session.
    ///
    /// # Errors
    ///
    /// Returns `HookError::Http` on transport failure and `HookError::Server`
    /// when the server reports an error.
    pub async fn start_timer(&self, form: &StartTimerForm) -> Result<StartTimerResponse, HookError> {
        info!(task = %form.task_name, minutes = form.duration, "starting timer");
        let resp = self.http.post(self.url("/hook/start_timer")).form(form).send().await?;
        checked(decode(resp).await?, "Failed to start timer")
    }

    /// Toggle the server-side pause flag.
    ///
    /// # Errors
    ///
    /// See [`HookClient::start_timer`].
    pub async fn pause_timer(&self) -> Result<Ack, HookError> {
        info!("toggling pause");
        let resp = self.http.post(self.url("/hook/pause_timer")).send().await?;
        checked(decode(resp).await?, "Failed to pause timer")
    }

    /// Drop the active server-side timer.
    ///
    /// # Errors
    ///
    /// See [`HookClient::start_timer`].
    pub async fn cancel_timer(&self) -> Result<Ack, HookError> {
        info!("cancelling timer");
        let resp = self.http.post(self.url("/hook/cancel_timer")).send().await?;
        checked(decode(resp).await?, "Failed to cancel timer")
    }

    /// Finalize the active session and collect points.
    ///
    /// # Errors
    ///
    /// See [`HookClient::start_timer`].
    pub async fn complete_timer(&self, form: &CompleteForm) -> Result<CompleteResponse, HookError> {
        info!(mood = %form.mood, rating = form.productivity_rating, "completing session");
        let resp = self.http.post(self.url("/hook/complete_timer")).form(form).send().await?;
        checked(decode(resp).await?, "Failed to complete session")
    }

    /// Ask whether a timer is already running server-side.
    ///
    /// # Errors
    ///
    /// Returns `HookError::Http` on transport failure.
    pub async fn timer_status(&self) -> Result<TimerStatus, HookError> {
        let resp = self.http.get(self.url("/hook/get_timer_status")).send().await?;
        decode(resp).await
    }

    /// Fetch the saved distraction domains.
    ///
    /// # Errors
    ///
    /// See [`HookClient::start_timer`].
    pub async fn distraction_list(&self) -> Result<DistractionList, HookError> {
        let resp = self.http.get(self.url("/hook/get_distraction_list")).send().await?;
        checked(decode(resp).await?, "Error loading distraction list")
    }

    /// Replace the saved distraction domains.
    ///
    /// # Errors
    ///
    /// See [`HookClient::start_timer`].
    pub async fn update_distraction_list(
        &self,
        domains: Vec<String>,
    ) -> Result<DistractionList, HookError> {
        info!(count = domains.len(), "saving distraction list");
        let resp = self
            .http
            .post(self.url("/hook/update_distraction_list"))
            .json(&DistractionUpdate { domains })
            .send()
            .await?;
        checked(decode(resp).await?, "Error saving distraction list")
    }

    /// Fetch the books available for reading sessions.
    ///
    /// # Errors
    ///
    /// See [`HookClient::start_timer`].
    pub async fn user_books(&self) -> Result<BookList, HookError> {
        let resp = self.http.get(self.url("/hook/get_user_books")).send().await?;
        checked(decode(resp).await?, "Error loading books")
    }

    /// Start a session linked to a book.
    ///
    /// # Errors
    ///
    /// See [`HookClient::start_timer`].
    pub async fn start_reading_session(
        &self,
        form: &ReadingSessionForm,
    ) -> Result<ReadingSessionResponse, HookError> {
        info!(book = %form.book_id, minutes = form.duration, "starting reading session");
        let resp = self
            .http
            .post(self.url("/hook/start_reading_session"))
            .form(form)
            .send()
            .await?;
        checked(decode(resp).await?, "Failed to start reading session")
    }
}

/// Read a JSON body, whatever the HTTP status.
///
/// The server reports logical failures in the body, sometimes with a 4xx.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, HookError> {
    let status = resp.status();
    let body = resp.text().await?;
    debug!(%status, bytes = body.len(), "response received");

    serde_json::from_str(&body).map_err(|e| {
        if status.is_success() {
            HookError::Parse(e)
        } else {
            HookError::Server(format!("Server returned {status}"))
        }
    })
}

fn checked<T: Envelope>(value: T, fallback: &str) -> Result<T, HookError> {
    if value.is_success() {
        Ok(value)
    } else {
        Err(HookError::server(value.message(), fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ServerConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..ServerConfig::default()
        };
        let client = HookClient::new(&config).unwrap();

        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/hook/"), "http://localhost:5000/hook/");
    }

    #[test]
    fn test_invalid_cookie_rejected() {
        let config = ServerConfig {
            session_cookie: Some("bad\nvalue".to_string()),
            ..ServerConfig::default()
        };

        assert!(matches!(HookClient::new(&config), Err(HookError::Config(_))));
    }

    #[test]
    fn test_checked_passes_success() {
        let ack = Ack { status: "success".to_string(), message: Some("Timer paused!".to_string()) };
        assert!(checked(ack, "fallback").is_ok());
    }

    #[test]
    fn test_checked_maps_error_message() {
        let ack = Ack { status: "error".to_string(), message: None };
        let err = checked(ack, "Failed to pause timer").unwrap_err();
        assert_eq!(err.to_string(), "Failed to pause timer");
    }
}
