//! # pingbus Core
//!
//! Core types for pingbus: the named-event bus that connects the component
//! tree to the background worker, the application event types carried on
//! it, and the error types shared by the other crates.

pub mod error;
pub mod event_bus;
pub mod types;

pub use error::{panic_message, Error, EventBusError, Result, WorkerError};

// Re-export event bus for convenience
pub use event_bus::{
    event_bus, init_event_bus, names, AppEvent, BusEvent, ComponentEvent, Envelope, EventBus,
    EventBusConfig, FailurePolicy, PublishReport, SubscriptionId, WorkerLifecycle, WorkerMessage,
};

pub use types::{thread_safe, thread_safe_vec, ThreadSafe, ThreadSafeVec};
