//! Error handling for pingbus
//!
//! The event bus itself never fails: publishing to an unknown event or
//! removing an unknown subscription is a no-op. Errors only appear around
//! it:
//! - Event bus errors (configuring the process-wide instance)
//! - Worker errors (spawning, messaging, and joining the worker thread)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::any::Any;
use thiserror::Error;

/// Event bus error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// The process-wide bus was already created, either by an earlier
    /// `init_event_bus` call or by a first use of `event_bus()`.
    #[error("Global event bus already initialized")]
    AlreadyInitialized,
}

/// Worker error type
///
/// Represents failures at the boundary between the application thread and
/// the background worker thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The worker thread could not be started
    #[error("Failed to spawn worker '{name}': {reason}")]
    Spawn {
        /// The worker thread name.
        name: String,
        /// The reason the spawn failed.
        reason: String,
    },

    /// The channel to or from the worker is closed
    #[error("Worker '{name}' is disconnected")]
    Disconnected {
        /// The worker thread name.
        name: String,
    },

    /// No reply arrived in time
    #[error("Worker reply timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The worker thread panicked
    #[error("Worker panicked: {reason}")]
    Panicked {
        /// The panic message, if one could be recovered.
        reason: String,
    },
}

/// Main error type for pingbus
///
/// A unified error type that can represent any error from the core and the
/// worker layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Event bus error
    #[error(transparent)]
    EventBus(#[from] EventBusError),

    /// Worker error
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl Error {
    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Worker(WorkerError::Timeout { .. }))
    }

    /// Check if this is a worker error
    pub fn is_worker_error(&self) -> bool {
        matches!(self, Error::Worker(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Best-effort text of a panic payload
pub fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(msg) = cause.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = cause.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
