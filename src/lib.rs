//! # pingbus
//!
//! A headless component tree and a background worker that talk over a
//! named-event bus:
//! - The worker runs on its own thread and answers `"ping"` with `"pong"`
//! - Replies are published on the bus as `worker-message` events
//! - Mounted components subscribe to `worker-message` and log what arrives
//!
//! ## Architecture
//!
//! pingbus is organized as a workspace with multiple crates:
//!
//! 1. **pingbus-core** - Event bus, event types, errors
//! 2. **pingbus-settings** - Configuration and its persistence
//! 3. **pingbus-worker** - Ping worker thread and its bus bridge
//! 4. **pingbus** - Component tree, logging, and the binary

pub mod app;

pub use app::{App, Child, Component};

pub use pingbus_core::{
    event_bus, init_event_bus, names, AppEvent, BusEvent, ComponentEvent, Envelope, Error,
    EventBus, EventBusConfig, EventBusError, FailurePolicy, PublishReport, Result,
    SubscriptionId, WorkerError, WorkerLifecycle, WorkerMessage,
};

pub use pingbus_core::{thread_safe, thread_safe_vec, ThreadSafe, ThreadSafeVec};

pub use pingbus_settings::{
    BusSettings, Config, ConfigError, LogFormat, LoggingSettings, SettingsError, WorkerSettings,
};

pub use pingbus_worker::{PingWorker, WorkerBridge, WorkerStats, PING, PONG};

use anyhow::Context;
use std::sync::Arc;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from settings
///
/// Sets up structured logging with:
/// - Console output in the configured format (pretty, compact or json)
/// - RUST_LOG environment variable support, falling back to the configured level
/// - Thread names, so worker output is easy to tell apart
///
/// Fails if the level is unknown or a global subscriber is already set.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = settings.level()?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true);

    let registry = tracing_subscriber::registry().with(env_filter);
    match settings.format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    }
    .context("failed to install tracing subscriber")?;

    Ok(())
}

/// Outcome of one ping round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Reply received from the worker
    pub reply: String,
    /// Listeners the reply was delivered to
    pub delivered: usize,
    /// Messages seen by the app component
    pub app_received: Vec<String>,
    /// Messages seen by the child component
    pub child_received: Vec<String>,
    /// Worker counters at shutdown
    pub worker: WorkerStats,
}

/// Mount the component tree, ping the worker once, and tear everything down
pub fn run(config: &Config) -> anyhow::Result<RunSummary> {
    config.validate()?;

    let bus: Arc<EventBus> = Arc::new(EventBus::with_config(config.bus.to_bus_config()));

    let mut app = App::new();
    app.mount(&bus);

    let bridge = WorkerBridge::start(&config.worker, Arc::clone(&bus))
        .context("failed to start worker")?;

    bridge.post_message(PING)?;
    let report = bridge
        .wait_for_reply()
        .with_context(|| format!("no reply from worker '{}'", bridge.worker().name()))?;

    app.unmount(&bus);
    let worker = bridge.shutdown()?;

    let app_received = app.received();
    let reply = app_received.first().cloned().unwrap_or_default();
    tracing::info!(
        reply = %reply,
        delivered = report.delivered,
        "Round trip complete"
    );

    Ok(RunSummary {
        reply,
        delivered: report.delivered,
        child_received: app.child().received(),
        app_received,
        worker,
    })
}
