use pingbus::{
    init_logging, names, run, thread_safe_vec, App, AppEvent, Component, Config, EventBus,
    FailurePolicy, LogFormat, LoggingSettings, WorkerBridge, WorkerSettings, PING, PONG,
};
use std::sync::Arc;

#[test]
fn default_run_delivers_pong_to_both_components() {
    let summary = run(&Config::default()).expect("run");

    assert_eq!(summary.reply, PONG);
    assert_eq!(summary.delivered, 2);
    assert_eq!(summary.app_received, vec![PONG.to_string()]);
    assert_eq!(summary.child_received, vec![PONG.to_string()]);
    assert_eq!(summary.worker.received, 1);
    assert_eq!(summary.worker.replied, 1);
}

#[test]
fn app_listener_runs_before_child_listener() {
    let bus: Arc<EventBus> = Arc::new(EventBus::new());
    let order = thread_safe_vec();

    let first = order.clone();
    bus.subscribe(names::WORKER_MESSAGE, move |_| first.lock().push("observer"));

    let mut app = App::new();
    app.mount(&bus);

    let last = order.clone();
    bus.subscribe(names::WORKER_MESSAGE, move |_| last.lock().push("late"));

    let bridge = WorkerBridge::start(
        &WorkerSettings {
            thread_name: "order-test".to_string(),
            reply_timeout_ms: 2000,
        },
        Arc::clone(&bus),
    )
    .expect("start");
    bridge.post_message(PING).expect("post");
    let report = bridge.wait_for_reply().expect("reply");
    bridge.shutdown().expect("shutdown");

    assert_eq!(report.delivered, 4);
    assert_eq!(*order.lock(), vec!["observer", "late"]);
    assert_eq!(app.received(), vec![PONG.to_string()]);
    assert_eq!(app.child().received(), vec![PONG.to_string()]);
}

#[test]
fn unmounted_tree_receives_nothing() {
    let bus: EventBus = EventBus::new();
    let mut app = App::new();

    app.mount(&bus);
    app.unmount(&bus);
    assert_eq!(bus.listener_count(names::WORKER_MESSAGE), 0);

    let report = bus.emit(AppEvent::worker_message(PONG));
    assert!(report.is_empty());
    assert!(app.received().is_empty());
    assert!(app.child().received().is_empty());
}

#[test]
fn remount_does_not_duplicate_delivery() {
    let bus: EventBus = EventBus::new();
    let mut app = App::new();

    app.mount(&bus);
    app.unmount(&bus);
    app.mount(&bus);
    app.mount(&bus);

    bus.emit(AppEvent::worker_message(PONG));
    assert_eq!(app.received(), vec![PONG.to_string()]);
    assert_eq!(app.child().received(), vec![PONG.to_string()]);
}

#[test]
fn run_uses_settings_from_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pingbus.toml");
    std::fs::write(
        &path,
        r#"
[bus]
channel_capacity = 16
failure_policy = "isolate"

[worker]
thread_name = "file-worker"
reply_timeout_ms = 3000
"#,
    )
    .expect("write config");

    let config = Config::load_or_default(Some(&path)).expect("load");
    assert_eq!(config.bus.failure_policy, FailurePolicy::Isolate);
    assert_eq!(config.worker.thread_name, "file-worker");

    let summary = run(&config).expect("run");
    assert_eq!(summary.reply, PONG);
}

#[test]
fn run_rejects_invalid_config() {
    let mut config = Config::default();
    config.worker.reply_timeout_ms = 0;

    assert!(run(&config).is_err());
}

#[test]
fn init_logging_rejects_unknown_level() {
    let settings = LoggingSettings {
        level: "chatty".to_string(),
        format: LogFormat::Compact,
    };

    assert!(init_logging(&settings).is_err());
}
