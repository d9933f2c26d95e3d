//! Event type definitions for the event bus.
//!
//! Every application event is a variant of [`AppEvent`]. Each variant is
//! keyed by the event name it is published under, so typed publishers use
//! [`EventBus::emit`](super::EventBus::emit) and subscribers register on the
//! matching name from [`names`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event names used by the application.
pub mod names {
    /// A reply received from the background worker.
    pub const WORKER_MESSAGE: &str = "worker-message";
    /// Worker thread lifecycle changes.
    pub const WORKER_LIFECYCLE: &str = "worker-lifecycle";
    /// Component mount/unmount notifications.
    pub const COMPONENT: &str = "component";
}

/// An event that knows the name it is published under.
pub trait BusEvent {
    /// The event name used as the subscription key.
    fn name(&self) -> &str;
}

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// A reply from the worker
    WorkerMessage(WorkerMessage),
    /// Worker thread lifecycle
    WorkerLifecycle(WorkerLifecycle),
    /// Component tree lifecycle
    Component(ComponentEvent),
}

impl AppEvent {
    /// Build a worker message event stamped with the current time.
    pub fn worker_message(data: impl Into<String>) -> Self {
        AppEvent::WorkerMessage(WorkerMessage::new(data))
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::WorkerMessage(msg) => format!("Worker message: {}", msg.data),
            AppEvent::WorkerLifecycle(e) => e.description(),
            AppEvent::Component(e) => e.description(),
        }
    }

    /// The worker message payload, if this is one.
    pub fn as_worker_message(&self) -> Option<&WorkerMessage> {
        match self {
            AppEvent::WorkerMessage(msg) => Some(msg),
            _ => None,
        }
    }
}

impl BusEvent for AppEvent {
    fn name(&self) -> &str {
        match self {
            AppEvent::WorkerMessage(_) => names::WORKER_MESSAGE,
            AppEvent::WorkerLifecycle(_) => names::WORKER_LIFECYCLE,
            AppEvent::Component(_) => names::COMPONENT,
        }
    }
}

/// Data received from the worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMessage {
    /// The reply text as sent by the worker.
    pub data: String,
    /// When the reply was received on the application side.
    pub received_at: DateTime<Utc>,
}

impl WorkerMessage {
    /// Create a message received now.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            received_at: Utc::now(),
        }
    }
}

/// Worker lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerLifecycle {
    /// The worker thread is running.
    Started {
        /// Worker thread name.
        name: String,
    },
    /// The worker thread exited cleanly.
    Stopped {
        /// Worker thread name.
        name: String,
        /// Number of messages the worker handled.
        handled: u64,
    },
    /// The worker thread failed.
    Failed {
        /// Worker thread name.
        name: String,
        /// What went wrong.
        reason: String,
    },
}

impl WorkerLifecycle {
    fn description(&self) -> String {
        match self {
            WorkerLifecycle::Started { name } => format!("Worker {} started", name),
            WorkerLifecycle::Stopped { name, handled } => {
                format!("Worker {} stopped after {} messages", name, handled)
            }
            WorkerLifecycle::Failed { name, reason } => {
                format!("Worker {} failed: {}", name, reason)
            }
        }
    }
}

/// Component tree events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentEvent {
    /// A component subscribed its listeners.
    Mounted {
        /// Component name.
        component: String,
    },
    /// A component removed its listeners.
    Unmounted {
        /// Component name.
        component: String,
    },
}

impl ComponentEvent {
    fn description(&self) -> String {
        match self {
            ComponentEvent::Mounted { component } => format!("{} mounted", component),
            ComponentEvent::Unmounted { component } => format!("{} unmounted", component),
        }
    }
}
