//! Event Implementation
//!
//! An [`Event`] is a list of handlers that are invoked synchronously, in
//! subscription order, every time the event is emitted.
//!
//! # Re-entrancy
//!
//! Handlers frequently react to a notification by mutating the very
//! objects that emitted it (a behavior removing a view from a region while
//! the region is still notifying). To make that safe, `emit` snapshots the
//! handler list and releases the lock before calling anything. A handler
//! that unsubscribes during an emit still receives the notification that
//! was already in flight; handlers must tolerate that.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::subscriber::{SubscriberId, Subscription};

type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;
type HandlerList<A> = Mutex<Vec<(SubscriberId, Handler<A>)>>;

/// A synchronous multicast notification source.
pub struct Event<A> {
    handlers: Arc<HandlerList<A>>,
}

impl<A: 'static> Event<A> {
    /// Create an event with no subscribers.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a handler.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let id = SubscriberId::new();
        self.handlers.lock().push((id, Arc::new(handler)));

        let handlers: Weak<HandlerList<A>> = Arc::downgrade(&self.handlers);
        Subscription::new(id, move |id| {
            if let Some(handlers) = handlers.upgrade() {
                handlers.lock().retain(|(sub, _)| *sub != id);
            }
        })
    }

    /// Invoke every registered handler with `args`.
    pub fn emit(&self, args: &A) {
        let snapshot: Vec<Handler<A>> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(args);
        }
    }

    /// Get the number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().len()
    }
}

impl<A: 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("subscriber_count", &self.handlers.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn emit_reaches_all_subscribers_in_order() {
        let event = Event::<i32>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let log1 = log.clone();
        let _a = event.subscribe(move |v| log1.lock().push(("a", *v)));
        let log2 = log.clone();
        let _b = event.subscribe(move |v| log2.lock().push(("b", *v)));

        event.emit(&7);
        assert_eq!(*log.lock(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropping_subscription_detaches() {
        let event = Event::<()>::new();
        let count = Arc::new(AtomicI32::new(0));
        let count_clone = count.clone();

        let subscription = event.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(event.subscriber_count(), 1);

        event.emit(&());
        drop(subscription);
        event.emit(&());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(event.subscriber_count(), 0);
    }

    #[test]
    fn handler_may_subscribe_during_emit() {
        let event = Arc::new(Event::<()>::new());
        let late = Arc::new(Mutex::new(Vec::new()));

        let event_clone = event.clone();
        let late_clone = late.clone();
        let _outer = event.subscribe(move |_| {
            let sub = event_clone.subscribe(|_| {});
            late_clone.lock().push(sub);
        });

        event.emit(&());
        assert_eq!(event.subscriber_count(), 2);
    }

    #[test]
    fn subscription_outliving_event_is_harmless() {
        let event = Event::<()>::new();
        let subscription = event.subscribe(|_| {});
        drop(event);
        drop(subscription);
    }
}
