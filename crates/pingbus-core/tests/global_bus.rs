//! The process-wide bus is shared by every test in this binary, so all of
//! its checks live in a single test.

use pingbus_core::{
    emit, event_bus, init_event_bus, names, on_event, thread_safe_vec, AppEvent, EventBusConfig,
    EventBusError, FailurePolicy,
};

#[test]
fn global_bus_lifecycle() {
    let config = EventBusConfig {
        failure_policy: FailurePolicy::Isolate,
        ..Default::default()
    };
    init_event_bus(config.clone()).expect("first init succeeds");
    assert_eq!(
        init_event_bus(config),
        Err(EventBusError::AlreadyInitialized)
    );
    assert_eq!(event_bus().config().failure_policy, FailurePolicy::Isolate);

    let seen = thread_safe_vec();
    let sink = seen.clone();
    let id = on_event!(names::WORKER_MESSAGE, move |event: &AppEvent| {
        if let Some(msg) = event.as_worker_message() {
            sink.lock().push(msg.data.clone());
        }
    });

    let report = emit!(AppEvent::worker_message("pong"));
    assert_eq!(report.delivered, 1);
    assert_eq!(*seen.lock(), vec!["pong".to_string()]);

    assert!(event_bus().unsubscribe(names::WORKER_MESSAGE, id));
    assert!(emit!(AppEvent::worker_message("again")).is_empty());
    assert_eq!(seen.lock().len(), 1);
}
