//! Background ping worker
//!
//! Runs on its own named OS thread and answers `"ping"` with `"pong"`.
//! Requests arrive over one channel and replies leave over another, so the
//! worker shares no state with the application thread.

use pingbus_core::{panic_message, Result, WorkerError};
use pingbus_settings::WorkerSettings;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The only message the worker understands
pub const PING: &str = "ping";

/// The worker's answer to [`PING`]
pub const PONG: &str = "pong";

/// Requests sent to the worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkerRequest {
    /// A message to answer
    Message(String),
    /// Stop after draining earlier requests
    Shutdown,
}

/// Counters reported by the worker when it exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Messages received
    pub received: u64,
    /// Messages answered
    pub replied: u64,
    /// Messages the worker did not understand
    pub ignored: u64,
}

/// The worker's reply to `message`, if it has one
pub fn respond(message: &str) -> Option<&'static str> {
    match message {
        PING => Some(PONG),
        _ => None,
    }
}

/// Handle to a running worker thread
///
/// Dropping the handle shuts the worker down and joins it.
pub struct PingWorker {
    name: String,
    requests: Sender<WorkerRequest>,
    replies: Receiver<String>,
    handle: Option<JoinHandle<WorkerStats>>,
    reply_timeout: Duration,
}

impl PingWorker {
    /// Start a worker thread configured by `settings`
    pub fn spawn(settings: &WorkerSettings) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let name = settings.thread_name.clone();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(request_rx, reply_tx))
            .map_err(|e| WorkerError::Spawn {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!(worker = %name, "Worker started");
        Ok(Self {
            name,
            requests: request_tx,
            replies: reply_rx,
            handle: Some(handle),
            reply_timeout: settings.reply_timeout(),
        })
    }

    /// Worker thread name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured reply timeout
    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    /// Send a message to the worker
    pub fn post_message(&self, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        tracing::debug!(worker = %self.name, "Posting '{}'", message);
        self.requests
            .send(WorkerRequest::Message(message))
            .map_err(|_| self.disconnected())?;
        Ok(())
    }

    /// Take a reply if one is waiting, without blocking
    pub fn try_recv(&self) -> Result<Option<String>> {
        match self.replies.try_recv() {
            Ok(reply) => Ok(Some(reply)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(self.disconnected().into()),
        }
    }

    /// Block until a reply arrives or `timeout` elapses
    pub fn recv_timeout(&self, timeout: Duration) -> Result<String> {
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Ok(reply),
            Err(RecvTimeoutError::Timeout) => Err(WorkerError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into()),
            Err(RecvTimeoutError::Disconnected) => Err(self.disconnected().into()),
        }
    }

    /// Stop the worker and wait for it to exit
    pub fn shutdown(mut self) -> Result<WorkerStats> {
        self.stop()
    }

    fn stop(&mut self) -> Result<WorkerStats> {
        let Some(handle) = self.handle.take() else {
            return Ok(WorkerStats::default());
        };

        // The worker may already have exited.
        let _ = self.requests.send(WorkerRequest::Shutdown);

        let stats = handle.join().map_err(|cause| WorkerError::Panicked {
            reason: panic_message(cause.as_ref()),
        })?;

        tracing::info!(
            worker = %self.name,
            received = stats.received,
            replied = stats.replied,
            ignored = stats.ignored,
            "Worker stopped"
        );
        Ok(stats)
    }

    fn disconnected(&self) -> WorkerError {
        WorkerError::Disconnected {
            name: self.name.clone(),
        }
    }
}

impl Drop for PingWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(worker = %self.name, "Worker shutdown failed: {}", e);
        }
    }
}

impl std::fmt::Debug for PingWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PingWorker")
            .field("name", &self.name)
            .field("running", &self.handle.is_some())
            .field("reply_timeout", &self.reply_timeout)
            .finish()
    }
}

/// Worker thread body
fn run(requests: Receiver<WorkerRequest>, replies: Sender<String>) -> WorkerStats {
    let mut stats = WorkerStats::default();

    for request in requests {
        let message = match request {
            WorkerRequest::Message(message) => message,
            WorkerRequest::Shutdown => break,
        };
        stats.received += 1;

        match respond(&message) {
            Some(reply) => {
                if replies.send(reply.to_string()).is_err() {
                    tracing::debug!("Reply channel closed, worker exiting");
                    break;
                }
                stats.replied += 1;
            }
            None => {
                stats.ignored += 1;
                tracing::warn!("Ignoring unsupported message '{}'", message);
            }
        }
    }

    stats
}
