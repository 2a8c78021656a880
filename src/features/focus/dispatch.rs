//! Carries [`Request`]s to the server and hands the results back.
//!
//! Requests run as tasks on a tokio runtime. Their results come back over a
//! channel that the synchronous front end drains between frames. Every
//! delivery carries the session epoch it was issued under, so responses
//! for a session that has since been reset can be recognized and dropped.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{
    Ack, BookList, CompleteResponse, DistractionList, HookClient, ReadingSessionResponse,
    StartTimerResponse, TimerStatus,
};
use crate::error::HookError;

use super::effect::Request;

/// Result of one request.
#[derive(Debug)]
pub enum Outcome {
    Started(Result<StartTimerResponse, HookError>),
    ReadingStarted(Result<ReadingSessionResponse, HookError>),
    Paused(Result<Ack, HookError>),
    Cancelled(Result<Ack, HookError>),
    Completed(Result<CompleteResponse, HookError>),
    Status(Result<TimerStatus, HookError>),
    Distractions(Result<DistractionList, HookError>),
    DistractionsSaved(Result<DistractionList, HookError>),
    Books(Result<BookList, HookError>),
}

/// A finished request, tagged with the epoch it was sent under.
#[derive(Debug)]
pub struct Delivery {
    pub epoch: u64,
    /// Whether the response is tied to a single session run.
    pub scoped: bool,
    pub outcome: Outcome,
}

struct InFlight {
    epoch: u64,
    scoped: bool,
    handle: JoinHandle<()>,
}

/// Spawns requests and collects their deliveries.
pub struct Dispatcher {
    client: HookClient,
    runtime: Handle,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    in_flight: Vec<InFlight>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(client: HookClient, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            runtime,
            tx,
            rx,
            in_flight: Vec::new(),
        }
    }

    /// Spawn `request` under `epoch`.
    pub fn send(&mut self, epoch: u64, request: Request) {
        self.prune();

        let scoped = request.is_session_scoped();
        let client = self.client.clone();
        let tx = self.tx.clone();
        debug!(epoch, ?request, "dispatching");

        let handle = self.runtime.spawn(async move {
            let outcome = execute(&client, request).await;
            if tx.send(Delivery { epoch, scoped, outcome }).is_err() {
                debug!("delivery dropped: receiver closed");
            }
        });
        self.in_flight.push(InFlight { epoch, scoped, handle });
    }

    /// Abort session-scoped requests issued before `epoch`.
    ///
    /// Unscoped requests such as cancel and the startup loads keep running.
    pub fn abort_before(&mut self, epoch: u64) {
        self.in_flight.retain(|task| {
            if task.scoped && task.epoch < epoch {
                task.handle.abort();
                false
            } else {
                true
            }
        });
    }

    /// Take every delivery that has arrived so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Delivery> {
        self.rx.try_iter().collect()
    }

    /// Block until a delivery arrives or `timeout` elapses.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Delivery> {
        match self.rx.recv_timeout(timeout) {
            Ok(delivery) => Some(delivery),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Requests still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|t| !t.handle.is_finished()).count()
    }

    fn prune(&mut self) {
        self.in_flight.retain(|t| !t.handle.is_finished());
    }
}

/// Perform one request against the server.
pub async fn execute(client: &HookClient, request: Request) -> Outcome {
    match request {
        Request::Start(form) => Outcome::Started(client.start_timer(&form).await),
        Request::StartReading(form) => {
            Outcome::ReadingStarted(client.start_reading_session(&form).await)
        }
        Request::Pause => Outcome::Paused(client.pause_timer().await),
        Request::Cancel => Outcome::Cancelled(client.cancel_timer().await),
        Request::Complete(form) => Outcome::Completed(client.complete_timer(&form).await),
        Request::Status => Outcome::Status(client.timer_status().await),
        Request::LoadDistractions => Outcome::Distractions(client.distraction_list().await),
        Request::SaveDistractions { domains } => {
            Outcome::DistractionsSaved(client.update_distraction_list(domains).await)
        }
        Request::LoadBooks => Outcome::Books(client.user_books().await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn unreachable_client() -> HookClient {
        let config = ServerConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            session_cookie: None,
            request_timeout_secs: 1,
        };
        HookClient::new(&config).unwrap()
    }

    #[test]
    fn test_transport_errors_are_delivered() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut dispatcher = Dispatcher::new(unreachable_client(), runtime.handle().clone());

        dispatcher.send(4, Request::Pause);
        let delivery = dispatcher.recv_timeout(Duration::from_secs(5)).unwrap();

        assert_eq!(delivery.epoch, 4);
        assert!(delivery.scoped);
        assert!(matches!(delivery.outcome, Outcome::Paused(Err(ref e)) if e.is_transport()));
    }

    #[test]
    fn test_abort_before_keeps_unscoped_requests() {
        // Tasks only run inside block_on, so nothing finishes before the abort
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let mut dispatcher = Dispatcher::new(unreachable_client(), runtime.handle().clone());

        dispatcher.send(0, Request::Status);
        dispatcher.send(1, Request::Cancel);
        dispatcher.abort_before(1);
        runtime.block_on(async { tokio::time::sleep(Duration::from_millis(1500)).await });

        let deliveries = dispatcher.drain();
        assert_eq!(deliveries.len(), 1);
        assert!(matches!(deliveries[0].outcome, Outcome::Cancelled(_)));
        assert_eq!(dispatcher.in_flight(), 0);
    }
}
