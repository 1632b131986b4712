//! Region members.
//!
//! A [`Member`] wraps one item of a region together with the metadata the
//! region tracks for it: an optional name and the active flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::navigation::NavigationKind;
use super::view::ViewRef;
use crate::reactive::{Event, Subscription};

/// Unique identifier for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(u64);

impl MemberId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Payload of a member's activation notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveChanged {
    pub is_active: bool,
    pub navigation: NavigationKind,
}

/// One item hosted by a region.
///
/// The wrapped item is fixed at construction. The active flag is written
/// only by the owning region's activation logic.
pub struct Member {
    id: MemberId,
    item: ViewRef,
    name: RwLock<Option<String>>,
    is_active: AtomicBool,
    active_changed: Event<ActiveChanged>,
}

impl Member {
    /// Wrap an item. The member starts inactive and unnamed.
    pub fn new(item: ViewRef) -> Arc<Self> {
        Arc::new(Self {
            id: MemberId::next(),
            item,
            name: RwLock::new(None),
            is_active: AtomicBool::new(false),
            active_changed: Event::new(),
        })
    }

    /// Wrap an item under a name.
    pub fn named(item: ViewRef, name: impl Into<String>) -> Arc<Self> {
        let member = Self::new(item);
        *member.name.write() = Some(name.into());
        member
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    /// The wrapped item.
    pub fn item(&self) -> &ViewRef {
        &self.item
    }

    pub fn name(&self) -> Option<String> {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: Option<String>) {
        *self.name.write() = name;
    }

    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    /// Update the active flag and notify observers.
    ///
    /// Observers are notified even when `active` equals the current value.
    pub fn set_active(&self, active: bool, navigation: NavigationKind) {
        self.is_active.store(active, Ordering::SeqCst);
        self.active_changed.emit(&ActiveChanged {
            is_active: active,
            navigation,
        });
    }

    /// Observe activation changes.
    pub fn on_active_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ActiveChanged) + Send + Sync + 'static,
    {
        self.active_changed.subscribe(handler)
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.active_changed.subscriber_count()
    }
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("is_active", &self.is_active())
            .finish()
    }
}
