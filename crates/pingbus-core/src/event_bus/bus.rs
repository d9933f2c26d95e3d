//! Event Bus implementation.
//!
//! Provides the core EventBus struct and the optional process-wide instance
//! for application-wide event distribution.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, BusEvent};
use crate::error::{panic_message, EventBusError};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// What happens when a listener panics during `publish`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// The panic unwinds to the publisher and later listeners are skipped.
    #[default]
    Propagate,
    /// The panic is caught and logged, and later listeners still run.
    Isolate,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Propagate => write!(f, "propagate"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

/// Configuration for the event bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Channel capacity for the async broadcast receivers.
    pub channel_capacity: usize,
    /// Listener panic handling.
    pub failure_policy: FailurePolicy,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            failure_policy: FailurePolicy::Propagate,
        }
    }
}

/// Outcome of a single `publish` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Listeners that ran to completion.
    pub delivered: usize,
    /// Listeners that panicked (only counted under [`FailurePolicy::Isolate`]).
    pub failed: usize,
}

impl PublishReport {
    /// True when no listener was registered for the event.
    pub fn is_empty(&self) -> bool {
        self.delivered == 0 && self.failed == 0
    }
}

/// A published event as seen by async receivers
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<P> {
    /// Event name the payload was published under.
    pub name: String,
    /// The published payload.
    pub payload: P,
}

/// Type alias for event handler functions
type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct Subscription<P> {
    id: SubscriptionId,
    handler: Handler<P>,
}

/// Event bus keyed by event name.
///
/// Each event name maps to an ordered list of handlers. `publish` calls the
/// handlers registered for that name, in registration order, on the calling
/// thread. Handlers run against a snapshot of the list taken when `publish`
/// starts and no lock is held while they run, so a handler may subscribe,
/// unsubscribe, or publish again without deadlocking.
pub struct EventBus<P = AppEvent> {
    /// Per-event handlers in registration order
    listeners: RwLock<HashMap<String, Vec<Subscription<P>>>>,
    /// Broadcast channel sender for async receivers
    sender: broadcast::Sender<Envelope<P>>,
    /// Configuration
    config: EventBusConfig,
}

impl<P> EventBus<P>
where
    P: Clone + Send + 'static,
{
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            listeners: RwLock::new(HashMap::new()),
            sender,
            config,
        }
    }

    /// Register `handler` for `event`.
    ///
    /// The handler is appended after any handlers already registered for
    /// the event. It is called on the publishing thread, so it should return
    /// quickly to avoid blocking later handlers and the publisher.
    ///
    /// Event names must be non-empty.
    pub fn subscribe<F>(&self, event: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        debug_assert!(!event.is_empty(), "event name must not be empty");

        let id = SubscriptionId::new();
        self.listeners
            .write()
            .entry(event.to_string())
            .or_default()
            .push(Subscription {
                id,
                handler: Arc::new(handler),
            });
        tracing::debug!("Subscription {} added to '{}'", id, event);
        id
    }

    /// Publish `payload` to every handler registered for `event`.
    ///
    /// Publishing an event nobody subscribed to is a no-op and returns an
    /// empty report. After the handlers ran, the payload is forwarded to any
    /// live async receivers.
    pub fn publish(&self, event: &str, payload: P) -> PublishReport {
        let handlers: Vec<(SubscriptionId, Handler<P>)> = {
            let listeners = self.listeners.read();
            match listeners.get(event) {
                Some(subs) => subs
                    .iter()
                    .map(|sub| (sub.id, Arc::clone(&sub.handler)))
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut report = PublishReport::default();
        for (id, handler) in &handlers {
            match self.config.failure_policy {
                FailurePolicy::Propagate => {
                    handler(&payload);
                    report.delivered += 1;
                }
                FailurePolicy::Isolate => {
                    match panic::catch_unwind(AssertUnwindSafe(|| handler(&payload))) {
                        Ok(()) => report.delivered += 1,
                        Err(cause) => {
                            report.failed += 1;
                            tracing::error!(
                                subscription = %id,
                                event = %event,
                                "Listener panicked: {}",
                                panic_message(cause.as_ref())
                            );
                        }
                    }
                }
            }
        }

        if self.sender.receiver_count() > 0 {
            // Receivers may drop between the check and the send.
            let _ = self.sender.send(Envelope {
                name: event.to_string(),
                payload,
            });
        }

        tracing::trace!(
            event = %event,
            delivered = report.delivered,
            failed = report.failed,
            "Event published"
        );
        report
    }

    /// Publish a typed event under the name it reports.
    pub fn emit(&self, event: P) -> PublishReport
    where
        P: BusEvent,
    {
        let name = event.name().to_owned();
        self.publish(&name, event)
    }

    /// Remove the subscription `id` from `event`.
    ///
    /// Returns true if the subscription was found and removed. Unknown
    /// events and ids are ignored, so calling this twice is harmless.
    pub fn unsubscribe(&self, event: &str, id: SubscriptionId) -> bool {
        // Dropped after the lock is released; a handler's captures may touch the bus on drop.
        let removed = {
            let mut listeners = self.listeners.write();
            let Some(subs) = listeners.get_mut(event) else {
                return false;
            };
            let removed = subs
                .iter()
                .position(|sub| sub.id == id)
                .map(|index| subs.remove(index));
            if subs.is_empty() {
                listeners.remove(event);
            }
            removed
        };

        match removed {
            Some(_) => {
                tracing::debug!("Subscription {} removed from '{}'", id, event);
                true
            }
            None => false,
        }
    }

    /// Get a receiver for manual event polling
    ///
    /// Useful for async contexts that want to observe every published event
    /// in a tokio task. Receivers only see events published after they were
    /// created; slow receivers observe `RecvError::Lagged`.
    pub fn receiver(&self) -> broadcast::Receiver<Envelope<P>> {
        self.sender.subscribe()
    }

    /// Number of handlers registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }

    /// Total number of handlers across all events
    pub fn subscriber_count(&self) -> usize {
        self.listeners.read().values().map(Vec::len).sum()
    }

    /// Names of the events that currently have handlers, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.listeners.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }
}

impl<P> Default for EventBus<P>
where
    P: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for EventBus<P>
where
    P: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.event_names())
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

/// Global event bus instance
static EVENT_BUS: OnceLock<EventBus<AppEvent>> = OnceLock::new();

/// Get or initialize the process-wide event bus
///
/// The application passes its own bus to every component; this instance
/// exists for code that has no handle to thread through. It lives for the
/// rest of the process.
pub fn event_bus() -> &'static EventBus<AppEvent> {
    EVENT_BUS.get_or_init(EventBus::new)
}

/// Initialize the process-wide event bus with custom configuration
///
/// Must be called before any call to `event_bus()`.
pub fn init_event_bus(config: EventBusConfig) -> Result<(), EventBusError> {
    EVENT_BUS
        .set(EventBus::with_config(config))
        .map_err(|_| EventBusError::AlreadyInitialized)
}

/// Convenience macro to emit a typed event on the process-wide event bus
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::event_bus::event_bus().emit($event)
    };
}

/// Convenience macro to subscribe to an event on the process-wide event bus
#[macro_export]
macro_rules! on_event {
    ($name:expr, $handler:expr) => {
        $crate::event_bus::event_bus().subscribe($name, $handler)
    };
}
