//! The raw member collection of a region.
//!
//! [`MemberCollection`] is ordered by insertion, unfiltered and unsorted.
//! Every mutation is reported through a [`CollectionChange`] once the
//! collection's lock has been released, so observers may read (or mutate)
//! the collection from inside their handlers.

use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::{smallvec, SmallVec};

use super::member::Member;
use super::view::{same_view, ViewRef};
use crate::reactive::{Event, Subscription};

/// Items carried by a change. Nearly every change carries exactly one.
pub type ChangedItems<T> = SmallVec<[T; 1]>;

/// The kind of a collection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Add,
    Remove,
    Reset,
}

/// A change to an ordered collection.
#[derive(Debug, Clone)]
pub enum CollectionChange<T> {
    /// `items` now occupy consecutive positions starting at `index`.
    Add { items: ChangedItems<T>, index: usize },
    /// `items` were removed; they started at `index` before the removal.
    /// `None` when the items were not present to begin with.
    Remove {
        items: ChangedItems<T>,
        index: Option<usize>,
    },
    /// Anything may have changed; observers must re-read everything.
    Reset,
}

impl<T> CollectionChange<T> {
    pub fn action(&self) -> ChangeAction {
        match self {
            CollectionChange::Add { .. } => ChangeAction::Add,
            CollectionChange::Remove { .. } => ChangeAction::Remove,
            CollectionChange::Reset => ChangeAction::Reset,
        }
    }

    /// Items carried by the change; empty for `Reset`.
    pub fn items(&self) -> &[T] {
        match self {
            CollectionChange::Add { items, .. } | CollectionChange::Remove { items, .. } => {
                items.as_slice()
            }
            CollectionChange::Reset => &[],
        }
    }

    /// Position of the change; `None` for `Reset` and for removals of
    /// items that were not present.
    pub fn index(&self) -> Option<usize> {
        match self {
            CollectionChange::Add { index, .. } => Some(*index),
            CollectionChange::Remove { index, .. } => *index,
            CollectionChange::Reset => None,
        }
    }
}

/// Insertion-ordered, change-notifying list of region members.
pub struct MemberCollection {
    members: RwLock<Vec<Arc<Member>>>,
    changed: Event<CollectionChange<Arc<Member>>>,
}

impl MemberCollection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            members: RwLock::new(Vec::new()),
            changed: Event::new(),
        })
    }

    /// Append a member.
    pub fn push(&self, member: Arc<Member>) {
        let index = {
            let mut members = self.members.write();
            members.push(Arc::clone(&member));
            members.len() - 1
        };

        self.changed.emit(&CollectionChange::Add {
            items: smallvec![member],
            index,
        });
    }

    /// Append several members as a single `Add` change.
    pub fn extend<I>(&self, new_members: I)
    where
        I: IntoIterator<Item = Arc<Member>>,
    {
        let items: ChangedItems<Arc<Member>> = new_members.into_iter().collect();
        if items.is_empty() {
            return;
        }

        let index = {
            let mut members = self.members.write();
            let index = members.len();
            members.extend(items.iter().cloned());
            index
        };

        self.changed.emit(&CollectionChange::Add { items, index });
    }

    /// Remove a member by identity.
    ///
    /// Returns the position it had, or `None` if it was not present.
    pub fn remove(&self, member: &Arc<Member>) -> Option<usize> {
        let (removed, index) = {
            let mut members = self.members.write();
            let index = members.iter().position(|m| Arc::ptr_eq(m, member))?;
            (members.remove(index), index)
        };

        self.changed.emit(&CollectionChange::Remove {
            items: smallvec![removed],
            index: Some(index),
        });
        Some(index)
    }

    /// Remove every member, reported as a single `Reset`.
    pub fn clear(&self) {
        let had_members = {
            let mut members = self.members.write();
            let had_members = !members.is_empty();
            members.clear();
            had_members
        };

        if had_members {
            self.changed.emit(&CollectionChange::Reset);
        }
    }

    /// Copy of the current contents, in order.
    pub fn snapshot(&self) -> Vec<Arc<Member>> {
        self.members.read().clone()
    }

    /// Find the member wrapping `item`.
    pub fn find_by_item(&self, item: &ViewRef) -> Option<Arc<Member>> {
        self.members
            .read()
            .iter()
            .find(|m| same_view(m.item(), item))
            .cloned()
    }

    /// Find the member registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<Member>> {
        self.members
            .read()
            .iter()
            .find(|m| m.name().as_deref() == Some(name))
            .cloned()
    }

    pub fn contains(&self, member: &Arc<Member>) -> bool {
        self.members.read().iter().any(|m| Arc::ptr_eq(m, member))
    }

    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Observe mutations.
    pub fn on_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&CollectionChange<Arc<Member>>) + Send + Sync + 'static,
    {
        self.changed.subscribe(handler)
    }
}

impl std::fmt::Debug for MemberCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberCollection")
            .field("len", &self.len())
            .finish()
    }
}
