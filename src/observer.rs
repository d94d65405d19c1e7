//! Minimal observable with well-defined re-entrancy.
//!
//! Listeners are called in subscription order. The listener list is
//! snapshotted before an emission and the lock is released while callbacks
//! run, so a callback may subscribe, unsubscribe or emit again without
//! deadlocking. Within one emission:
//! - a listener removed before its turn is skipped
//! - a listener added during the emission is not called until the next one
//! - every other listener is called exactly once

use std::sync::{Arc, Mutex, Weak};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::platform::lock;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: 'static> Detach for Mutex<Listeners<T>> {
    fn detach(&self, id: u64) {
        lock(self).entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// A list of listeners for values of type `T`.
pub struct Observable<T: 'static> {
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T: 'static> Observable<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Append a listener. It stays registered until the returned
    /// [`Subscription`] is unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut listeners = lock(&self.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::new(callback)));
            id
        };

        let registry: Weak<dyn Detach> = Arc::downgrade(&self.listeners) as Weak<dyn Detach>;
        Subscription {
            id,
            registry,
            active: AtomicBool::new(true),
        }
    }

    /// Call every listener with `value`. Returns how many were called.
    pub fn emit(&self, value: &T) -> usize {
        let snapshot: Vec<(u64, Callback<T>)> = lock(&self.listeners).entries.clone();

        let mut called = 0;
        for (id, callback) in snapshot {
            let still_registered = lock(&self.listeners)
                .entries
                .iter()
                .any(|(entry_id, _)| *entry_id == id);
            if still_registered {
                callback(value);
                called += 1;
            }
        }
        called
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        lock(&self.listeners).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one registered listener.
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
    active: AtomicBool,
}

impl Subscription {
    /// Remove exactly this listener. Later calls are no-ops.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            if let Some(registry) = self.registry.upgrade() {
                registry.detach(self.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    // ==================== Emit Tests ====================

    #[test]
    fn test_emit_in_subscription_order() {
        let observable = Observable::<u32>::new();
        let calls = recorder();

        let c = calls.clone();
        let _a = observable.subscribe(move |_| c.lock().unwrap().push("a"));
        let c = calls.clone();
        let _b = observable.subscribe(move |_| c.lock().unwrap().push("b"));

        assert_eq!(observable.emit(&1), 2);
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
    }

    // ==================== Unsubscribe Tests ====================

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let observable = Observable::<u32>::new();
        let first = observable.subscribe(|_| {});
        let _second = observable.subscribe(|_| {});

        first.unsubscribe();
        first.unsubscribe();

        assert_eq!(observable.len(), 1);
        assert!(!first.is_active());
    }

    // ==================== Re-entrancy Tests ====================

    #[test]
    fn test_self_unsubscribe_during_emit_keeps_others() {
        let observable = Arc::new(Observable::<u32>::new());
        let calls = recorder();

        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let c = calls.clone();
        let s = slot.clone();
        let sub = observable.subscribe(move |_| {
            c.lock().unwrap().push("self");
            if let Some(sub) = s.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        let c = calls.clone();
        let _other = observable.subscribe(move |_| c.lock().unwrap().push("other"));

        observable.emit(&1);
        observable.emit(&2);

        assert_eq!(*calls.lock().unwrap(), vec!["self", "other", "other"]);
    }

    #[test]
    fn test_listener_removed_mid_emit_is_skipped() {
        let observable = Observable::<u32>::new();
        let later_calls = Arc::new(AtomicUsize::new(0));

        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let s = slot.clone();
        let _remover = observable.subscribe(move |_| {
            if let Some(sub) = s.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });

        let counter = later_calls.clone();
        let later = observable.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        *slot.lock().unwrap() = Some(later);

        assert_eq!(observable.emit(&1), 1);
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_added_mid_emit_waits_for_next() {
        let observable = Arc::new(Observable::<u32>::new());
        let added_calls = Arc::new(AtomicUsize::new(0));
        let kept: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));

        let obs = Arc::downgrade(&observable);
        let counter = added_calls.clone();
        let k = kept.clone();
        let _adder = observable.subscribe(move |value| {
            if *value == 1 {
                if let Some(obs) = obs.upgrade() {
                    let counter = counter.clone();
                    let sub = obs.subscribe(move |_| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    });
                    k.lock().unwrap().push(sub);
                }
            }
        });

        observable.emit(&1);
        assert_eq!(added_calls.load(Ordering::SeqCst), 0);

        observable.emit(&2);
        assert_eq!(added_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_after_observable_dropped() {
        let observable = Observable::<u32>::new();
        let sub = observable.subscribe(|_| {});
        drop(observable);
        sub.unsubscribe();
        assert!(!sub.is_active());
    }
}
