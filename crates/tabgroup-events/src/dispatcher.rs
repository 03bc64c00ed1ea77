//! Event dispatcher

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An event that can be routed by name.
pub trait Event: Clone + Send + Sync + 'static {
    fn name(&self) -> &'static str;
}

pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle returned by [`EventDispatcher::on`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration<E> {
    id: ListenerId,
    /// `None` matches every event
    name: Option<&'static str>,
    listener: Listener<E>,
}

pub struct EventDispatcher<E> {
    listeners: Arc<RwLock<Vec<Registration<E>>>>,
    next_id: Arc<AtomicU64>,
}

impl<E: Event> EventDispatcher<E> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a listener for one event name
    pub fn on<F>(&self, name: &'static str, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.register(Some(name), Arc::new(listener))
    }

    /// Register a listener for every event
    pub fn on_any<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener))
    }

    fn register(&self, name: Option<&'static str>, listener: Listener<E>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push(Registration { id, name, listener });
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        listeners.len() != before
    }

    pub fn has_listeners(&self, name: &str) -> bool {
        self.listeners
            .read()
            .iter()
            .any(|r| r.name.map_or(true, |n| n == name))
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver `event` to every matching listener in registration order.
    ///
    /// The listener list is snapshotted before delivery, so listeners may emit,
    /// register or remove listeners re-entrantly. Listeners added during an
    /// emission do not receive it. Returns the number of listeners called.
    pub fn emit(&self, event: E) -> usize {
        let name = event.name();
        let targets: Vec<Listener<E>> = self
            .listeners
            .read()
            .iter()
            .filter(|r| r.name.map_or(true, |n| n == name))
            .map(|r| Arc::clone(&r.listener))
            .collect();

        tracing::trace!(event = name, listeners = targets.len(), "Dispatching event");

        for listener in &targets {
            listener(&event);
        }

        targets.len()
    }
}

impl<E: Event> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventDispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<E> std::fmt::Debug for EventDispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}
