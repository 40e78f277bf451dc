//! In-process publish/subscribe channel.
//!
//! Explicitly constructed and passed where needed - there is no ambient
//! global bus. One faulty subscriber cannot block delivery: a listener
//! returning an error is logged and the remaining listeners still run.
//!
//! Delivery runs over a snapshot of the listener list, so a listener may
//! subscribe, unsubscribe, or publish on the same bus from inside its own
//! callback. Listeners added during delivery first see the next event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Error a listener may surface during delivery. Logged, never propagated.
#[derive(Debug, Error)]
#[error("Listener failed: {0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Arc<dyn Fn(&E) -> Result<(), ListenerError> + Send + Sync>;

/// Process-lifetime pub/sub channel for events of type `E`.
pub struct EventBus<E> {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener<E>)>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&E) -> Result<(), ListenerError> + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Deliver an event to every listener, in subscription order.
    ///
    /// The list is snapshotted before delivery; the lock is not held while
    /// listeners run, so callbacks may manage subscriptions re-entrantly.
    pub fn publish(&self, event: &E) {
        let snapshot: Vec<(SubscriptionId, Listener<E>)> = self.lock().clone();
        for (id, listener) in snapshot {
            if let Err(e) = listener(event) {
                tracing::warn!(subscription = id.0, error = %e, "Event listener failed");
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Listener<E>)>> {
        match self.listeners.lock() {
            Ok(guard) => guard,
            // A listener list is always left consistent; a panic elsewhere
            // holding the lock does not invalidate it.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn delivers_to_all_listeners_in_order() {
        let bus = EventBus::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let seen = seen.clone();
            bus.subscribe(move |event: &u32| {
                seen.lock().map_err(|e| ListenerError::new(e.to_string()))?.push((tag, *event));
                Ok(())
            });
        }

        bus.publish(&7);
        assert_eq!(*seen.lock().unwrap(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn failing_listener_does_not_block_the_rest() {
        let bus = EventBus::<()>::new();
        let delivered = Arc::new(AtomicUsize::new(0));

        bus.subscribe(|_| Err(ListenerError::new("boom")));
        let counter = delivered.clone();
        bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.publish(&());
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_listener() {
        let bus = EventBus::<()>::new();
        let id = bus.subscribe(|_| Ok(()));
        bus.subscribe(|_| Ok(()));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn listener_may_subscribe_during_delivery() {
        let bus = Arc::new(EventBus::<u32>::new());
        let late_deliveries = Arc::new(AtomicUsize::new(0));

        let inner = bus.clone();
        let counter = late_deliveries.clone();
        bus.subscribe(move |_| {
            let counter = counter.clone();
            inner.subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            Ok(())
        });

        // Completes instead of blocking on its own listener list.
        bus.publish(&1);
        assert_eq!(bus.listener_count(), 2);
        // The listener added mid-delivery first sees the next event.
        assert_eq!(late_deliveries.load(Ordering::SeqCst), 0);

        bus.publish(&2);
        assert_eq!(late_deliveries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_delivery() {
        let bus = Arc::new(EventBus::<()>::new());
        let own_id = Arc::new(Mutex::new(None));

        let inner = bus.clone();
        let slot = own_id.clone();
        let id = bus.subscribe(move |_| {
            let id = slot
                .lock()
                .map_err(|e| ListenerError::new(e.to_string()))?
                .take();
            if let Some(id) = id {
                inner.unsubscribe(id);
            }
            Ok(())
        });
        *own_id.lock().unwrap() = Some(id);

        bus.publish(&());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn listener_may_publish_on_the_same_bus() {
        let bus = Arc::new(EventBus::<u32>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = bus.clone();
        bus.subscribe(move |event: &u32| {
            if *event == 1 {
                inner.publish(&2);
            }
            Ok(())
        });
        {
            let seen = seen.clone();
            bus.subscribe(move |event: &u32| {
                seen.lock().map_err(|e| ListenerError::new(e.to_string()))?.push(*event);
                Ok(())
            });
        }

        bus.publish(&1);
        // The nested publish delivers fully before the outer one resumes.
        assert_eq!(*seen.lock().unwrap(), vec![2, 1]);
    }
}
