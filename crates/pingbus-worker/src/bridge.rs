//! Worker to event bus bridge
//!
//! Owns a [`PingWorker`] and publishes each reply it produces as an
//! [`AppEvent::WorkerMessage`] on the bus. Publishing happens on the thread
//! that calls [`WorkerBridge::pump`] or [`WorkerBridge::wait_for_reply`].

use crate::worker::{PingWorker, WorkerStats};
use pingbus_core::{AppEvent, EventBus, PublishReport, Result, WorkerLifecycle};
use pingbus_settings::WorkerSettings;
use std::sync::Arc;

/// Connects a worker's replies to an event bus
#[derive(Debug)]
pub struct WorkerBridge {
    worker: PingWorker,
    bus: Arc<EventBus>,
}

impl WorkerBridge {
    /// Spawn a worker and announce it on `bus`
    pub fn start(settings: &WorkerSettings, bus: Arc<EventBus>) -> Result<Self> {
        let worker = PingWorker::spawn(settings)?;
        bus.emit(AppEvent::WorkerLifecycle(WorkerLifecycle::Started {
            name: worker.name().to_string(),
        }));
        Ok(Self { worker, bus })
    }

    /// The bridged worker
    pub fn worker(&self) -> &PingWorker {
        &self.worker
    }

    /// Send a message to the worker
    pub fn post_message(&self, message: impl Into<String>) -> Result<()> {
        self.worker.post_message(message)
    }

    /// Publish every reply that has already arrived
    ///
    /// Returns how many replies were published.
    pub fn pump(&self) -> Result<usize> {
        let mut published = 0;
        while let Some(reply) = self.worker.try_recv()? {
            self.deliver(reply);
            published += 1;
        }
        Ok(published)
    }

    /// Wait up to the configured reply timeout for one reply and publish it
    pub fn wait_for_reply(&self) -> Result<PublishReport> {
        let reply = self.worker.recv_timeout(self.worker.reply_timeout())?;
        Ok(self.deliver(reply))
    }

    /// Stop the worker and announce the outcome on the bus
    pub fn shutdown(self) -> Result<WorkerStats> {
        let Self { worker, bus } = self;
        let name = worker.name().to_string();

        match worker.shutdown() {
            Ok(stats) => {
                bus.emit(AppEvent::WorkerLifecycle(WorkerLifecycle::Stopped {
                    name,
                    handled: stats.received,
                }));
                Ok(stats)
            }
            Err(e) => {
                bus.emit(AppEvent::WorkerLifecycle(WorkerLifecycle::Failed {
                    name,
                    reason: e.to_string(),
                }));
                Err(e)
            }
        }
    }

    fn deliver(&self, reply: String) -> PublishReport {
        let report = self.bus.emit(AppEvent::worker_message(reply));
        tracing::debug!(
            worker = %self.worker.name(),
            delivered = report.delivered,
            "Worker reply published"
        );
        report
    }
}
