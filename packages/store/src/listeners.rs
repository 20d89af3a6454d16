//! Ordered subscriber registry with RAII unsubscription.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use crate::lock;

/// Zero-argument change callback.
pub type Listener = Arc<dyn Fn() + Send + Sync + 'static>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Set of change callbacks, notified in registration order.
#[derive(Clone, Default)]
pub struct Listeners {
    registry: Arc<Mutex<Registry>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Registering the same `Arc` twice keeps a single
    /// entry; both returned handles then refer to it.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let mut registry = lock(&self.registry);
        let existing = registry
            .entries
            .iter()
            .find(|(_, l)| Arc::ptr_eq(l, &listener))
            .map(|(id, _)| *id);
        let id = match existing {
            Some(id) => id,
            None => {
                let id = registry.next_id;
                registry.next_id += 1;
                registry.entries.push((id, listener));
                id
            }
        };
        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
            active: true,
        }
    }

    /// Call every registered listener.
    ///
    /// Listeners run outside the registry lock, so a callback may subscribe
    /// or unsubscribe. A panicking callback is logged and skipped.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = lock(&self.registry)
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| (*listener)())).is_err() {
                tracing::warn!("favorites listener panicked; continuing with the rest");
            }
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.registry).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`Listeners::subscribe`]. Unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
    active: bool,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if !std::mem::take(&mut self.active) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
