use std::sync::Mutex;

use uuid::Uuid;

/// Change notification emitted by the activity pool. Day-plan storage
/// subscribes and patches its denormalized bookings instead of the pool
/// reaching into day-plan state directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityEvent {
    Updated {
        id: Uuid,
        title: String,
        description: Option<String>,
        cost: f64,
    },
    Removed {
        id: Uuid,
    },
}

type Subscriber = Box<dyn Fn(&ActivityEvent) + Send>;

/// Synchronous in-process event bus. Subscribers run to completion inside
/// `publish`, matching the single-session execution model: by the time a
/// pool mutation returns, every dependent view is already patched.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&ActivityEvent) + Send + 'static,
    {
        self.subscribers
            .lock()
            .expect("event bus poisoned")
            .push(Box::new(handler));
    }

    pub fn publish(&self, event: &ActivityEvent) {
        for handler in self.subscribers.lock().expect("event bus poisoned").iter() {
            handler(event);
        }
    }
}
