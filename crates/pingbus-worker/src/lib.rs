//! # pingbus Worker
//!
//! The background worker thread and the bridge that turns its replies into
//! `worker-message` events on the bus.
//!
//! The worker never touches the bus. It talks to the application thread
//! over channels only; whichever thread owns the [`WorkerBridge`] receives
//! the replies and publishes them, so bus handlers always run there.

pub mod bridge;
pub mod worker;

pub use bridge::WorkerBridge;
pub use worker::{respond, PingWorker, WorkerStats, PING, PONG};
