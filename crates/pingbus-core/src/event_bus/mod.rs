//! # Event Bus Module
//!
//! Publish/subscribe by event name between the component tree, the worker
//! bridge, and anything else that holds a bus handle.
//!
//! ## Overview
//!
//! - Subscribers register a handler under an event name and get back a
//!   [`SubscriptionId`] for later removal
//! - Publishers call every handler for that name, in registration order, on
//!   their own thread
//! - Async code can observe all published events through [`EventBus::receiver`]
//!
//! ## Usage
//!
//! ```rust
//! use pingbus_core::event_bus::{names, AppEvent, EventBus};
//! use std::sync::Arc;
//!
//! let bus: Arc<EventBus> = Arc::new(EventBus::new());
//!
//! let subscription = bus.subscribe(names::WORKER_MESSAGE, |event| {
//!     if let Some(msg) = event.as_worker_message() {
//!         println!("message from worker received: {}", msg.data);
//!     }
//! });
//!
//! bus.emit(AppEvent::worker_message("pong"));
//!
//! bus.unsubscribe(names::WORKER_MESSAGE, subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
