//! Subscriber identities and subscription handles.
//!
//! Every call that observes an event source returns a [`Subscription`].
//! The handle owns the registration: dropping it (or calling
//! [`Subscription::unsubscribe`]) detaches the handler from its source.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a subscriber.
///
/// Each registered handler gets a unique ID when it subscribes. The ID is
/// what the event source uses to find and remove the handler later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered event handler.
///
/// Dropping this handle unregisters the handler from its source. If the
/// source has already been dropped, dropping the handle does nothing.
#[must_use = "dropping a Subscription immediately unsubscribes the handler"]
pub struct Subscription {
    id: SubscriberId,
    detach: Option<Box<dyn FnOnce(SubscriberId) + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new<F>(id: SubscriberId, detach: F) -> Self
    where
        F: FnOnce(SubscriberId) + Send + Sync + 'static,
    {
        Self {
            id,
            detach: Some(Box::new(detach)),
        }
    }

    /// Get the subscriber ID this handle owns.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Detach the handler now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
