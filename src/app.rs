//! Component tree
//!
//! A headless stand-in for the UI: an [`App`] component owning a [`Child`].
//! Both listen for `worker-message` events while mounted. Mounting
//! subscribes, unmounting unsubscribes, and mounting twice is a no-op, so a
//! component never leaves a stale listener behind on the bus.

use pingbus_core::{
    names, thread_safe_vec, AppEvent, ComponentEvent, EventBus, SubscriptionId, ThreadSafeVec,
};

/// A node in the component tree
pub trait Component: Send {
    /// Display name used in logs and lifecycle events
    fn name(&self) -> &str;

    /// Register this component's listeners on `bus`
    fn mount(&mut self, bus: &EventBus);

    /// Remove this component's listeners from `bus`
    fn unmount(&mut self, bus: &EventBus);

    /// Whether the component currently holds listeners
    fn is_mounted(&self) -> bool;
}

/// Records and logs worker messages while subscribed
struct WorkerMessageListener {
    component: String,
    log_prefix: &'static str,
    received: ThreadSafeVec<String>,
    subscription: Option<SubscriptionId>,
}

impl WorkerMessageListener {
    fn new(component: &str, log_prefix: &'static str) -> Self {
        Self {
            component: component.to_string(),
            log_prefix,
            received: thread_safe_vec(),
            subscription: None,
        }
    }

    fn mount(&mut self, bus: &EventBus) {
        if self.subscription.is_some() {
            return;
        }

        let received = self.received.clone();
        let component = self.component.clone();
        let prefix = self.log_prefix;
        let id = bus.subscribe(names::WORKER_MESSAGE, move |event| {
            if let Some(msg) = event.as_worker_message() {
                tracing::info!(component = %component, "{}: {}", prefix, msg.data);
                received.lock().push(msg.data.clone());
            }
        });
        self.subscription = Some(id);

        bus.emit(AppEvent::Component(ComponentEvent::Mounted {
            component: self.component.clone(),
        }));
    }

    fn unmount(&mut self, bus: &EventBus) {
        let Some(id) = self.subscription.take() else {
            return;
        };

        bus.unsubscribe(names::WORKER_MESSAGE, id);
        bus.emit(AppEvent::Component(ComponentEvent::Unmounted {
            component: self.component.clone(),
        }));
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

/// Leaf component
pub struct Child {
    listener: WorkerMessageListener,
}

impl Child {
    /// Create an unmounted child
    pub fn new() -> Self {
        Self {
            listener: WorkerMessageListener::new("Child", "message from worker received in child"),
        }
    }

    /// Worker messages seen so far
    pub fn received(&self) -> Vec<String> {
        self.listener.received()
    }
}

impl Default for Child {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Child {
    fn name(&self) -> &str {
        &self.listener.component
    }

    fn mount(&mut self, bus: &EventBus) {
        self.listener.mount(bus);
    }

    fn unmount(&mut self, bus: &EventBus) {
        self.listener.unmount(bus);
    }

    fn is_mounted(&self) -> bool {
        self.listener.subscription.is_some()
    }
}

/// Root component
///
/// Mounts itself before its children and unmounts its children first, so
/// on `worker-message` the app's listener runs before the child's.
pub struct App {
    listener: WorkerMessageListener,
    child: Child,
}

impl App {
    /// Create an unmounted app with its child
    pub fn new() -> Self {
        Self {
            listener: WorkerMessageListener::new("App", "message from worker received"),
            child: Child::new(),
        }
    }

    /// Worker messages seen by the app component
    pub fn received(&self) -> Vec<String> {
        self.listener.received()
    }

    /// The child component
    pub fn child(&self) -> &Child {
        &self.child
    }

    /// Mutable access to the child, e.g. to unmount it alone
    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for App {
    fn name(&self) -> &str {
        &self.listener.component
    }

    fn mount(&mut self, bus: &EventBus) {
        self.listener.mount(bus);
        self.child.mount(bus);
    }

    fn unmount(&mut self, bus: &EventBus) {
        self.child.unmount(bus);
        self.listener.unmount(bus);
    }

    fn is_mounted(&self) -> bool {
        self.listener.subscription.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_subscribes_app_then_child() {
        let bus: EventBus = EventBus::new();
        let mut app = App::new();

        app.mount(&bus);
        assert!(app.is_mounted());
        assert!(app.child().is_mounted());
        assert_eq!(bus.listener_count(names::WORKER_MESSAGE), 2);

        let report = bus.emit(AppEvent::worker_message("pong"));
        assert_eq!(report.delivered, 2);
        assert_eq!(app.received(), vec!["pong".to_string()]);
        assert_eq!(app.child().received(), vec!["pong".to_string()]);
    }

    #[test]
    fn test_mount_is_idempotent() {
        let bus: EventBus = EventBus::new();
        let mut app = App::new();

        app.mount(&bus);
        app.mount(&bus);
        assert_eq!(bus.listener_count(names::WORKER_MESSAGE), 2);

        bus.emit(AppEvent::worker_message("pong"));
        assert_eq!(app.received().len(), 1);
    }

    #[test]
    fn test_unmount_removes_listeners() {
        let bus: EventBus = EventBus::new();
        let mut app = App::new();

        app.mount(&bus);
        app.unmount(&bus);
        assert!(!app.is_mounted());
        assert_eq!(bus.listener_count(names::WORKER_MESSAGE), 0);

        assert!(bus.emit(AppEvent::worker_message("pong")).is_empty());
        assert!(app.received().is_empty());

        // Unmounting again is harmless
        app.unmount(&bus);
    }

    #[test]
    fn test_unmounted_child_stops_receiving() {
        let bus: EventBus = EventBus::new();
        let mut app = App::new();
        app.mount(&bus);

        app.child_mut().unmount(&bus);
        bus.emit(AppEvent::worker_message("pong"));

        assert_eq!(app.received(), vec!["pong".to_string()]);
        assert!(app.child().received().is_empty());
    }

    #[test]
    fn test_lifecycle_events_in_tree_order() {
        let bus: EventBus = EventBus::new();
        let seen = thread_safe_vec();
        let sink = seen.clone();
        bus.subscribe(names::COMPONENT, move |event| {
            if let AppEvent::Component(change) = event {
                sink.lock().push(change.clone());
            }
        });

        let mut app = App::new();
        app.mount(&bus);
        app.unmount(&bus);

        let mounted = |c: &str| ComponentEvent::Mounted {
            component: c.to_string(),
        };
        let unmounted = |c: &str| ComponentEvent::Unmounted {
            component: c.to_string(),
        };
        assert_eq!(
            *seen.lock(),
            vec![
                mounted("App"),
                mounted("Child"),
                unmounted("Child"),
                unmounted("App")
            ]
        );
    }
}
