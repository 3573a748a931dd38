use crate::domain::LibraryEvent;
use crate::ports::event_publisher::EventPublisher;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Handler = Arc<dyn Fn(&LibraryEvent) -> HandlerResult + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// In-memory publish/subscribe bus
///
/// Handlers are keyed by event name and called synchronously in
/// subscription order. A handler that returns an error or panics is logged
/// and skipped; neither reaches the publisher.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<String, Vec<(SubscriptionId, Handler)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for the given event name
    pub fn subscribe<F>(&self, event_name: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&LibraryEvent) -> HandlerResult + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners
            .entry(event_name.to_string())
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Unknown ids are ignored.
    pub fn unsubscribe(&self, event_name: &str, id: SubscriptionId) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handlers) = listeners.get_mut(event_name) {
            handlers.retain(|(existing, _)| *existing != id);
        }
    }

    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(event_name)
            .map_or(0, Vec::len)
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: LibraryEvent) {
        // Snapshot so handlers may subscribe or unsubscribe while running
        let handlers: Vec<Handler> = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(event.name())
            .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        for handler in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(event = event.name(), error = %e, "event subscriber failed");
                }
                Err(payload) => {
                    tracing::warn!(
                        event = event.name(),
                        panic = panic_message(&*payload),
                        "event subscriber panicked"
                    );
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
