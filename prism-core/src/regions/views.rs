//! Filtered Projections
//!
//! A [`ViewsCollection`] is a read-only, change-notifying view over a
//! [`MemberCollection`]: it keeps the items of the members that pass a
//! filter, optionally sorted, and reports how that list changes.
//!
//! # How Projections Stay Current
//!
//! The projection observes two kinds of sources:
//!
//! 1. The raw collection. Adds, removes and resets there are translated
//!    into point `Add`/`Remove` notifications (or a `Reset`).
//!
//! 2. Every member's activation event. A member whose filter result flips
//!    enters or leaves the projection without the raw collection changing.
//!
//! For each member the projection keeps a monitor record remembering
//! whether the member is currently in the filtered list. The record is
//! what distinguishes "entered the filter" from "was already there", and
//! it owns the subscription to the member's activation event.
//!
//! After every observed mutation the materialized list is recomputed from
//! scratch, so it always equals `sort(filter(raw))`. Notifications are
//! emitted only after every lock has been released.
//!
//! # Sorting
//!
//! Without a comparator the projection follows raw order. With one, the
//! list is stable-sorted by it, and raw additions are reported as a single
//! `Reset` instead of point adds.

use std::cmp::Ordering;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use smallvec::{smallvec, SmallVec};
use tracing::trace;

use super::collection::{ChangeAction, CollectionChange, MemberCollection};
use super::member::{Member, MemberId};
use super::navigation::NavigationKind;
use super::view::{same_view, ViewRef};
use crate::reactive::{Event, Subscription};

/// Membership predicate of a projection.
///
/// Must be a pure function of the member's current state.
pub type Filter = Arc<dyn Fn(&Member) -> bool + Send + Sync>;

/// Ordering applied to a projection's items. Must be a total order.
pub type SortComparison = Arc<dyn Fn(&ViewRef, &ViewRef) -> Ordering + Send + Sync>;

/// Notification raised by a [`ViewsCollection`].
#[derive(Clone)]
pub struct ViewsChanged {
    pub change: CollectionChange<ViewRef>,
    /// Why the change happened. `None` for raw-collection mutations and
    /// resets.
    pub navigation: Option<NavigationKind>,
}

impl ViewsChanged {
    pub fn action(&self) -> ChangeAction {
        self.change.action()
    }

    pub fn items(&self) -> &[ViewRef] {
        self.change.items()
    }

    pub fn index(&self) -> Option<usize> {
        self.change.index()
    }
}

impl std::fmt::Debug for ViewsChanged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewsChanged")
            .field("action", &self.action())
            .field("count", &self.items().len())
            .field("index", &self.index())
            .field("navigation", &self.navigation)
            .finish()
    }
}

/// Per-member bookkeeping.
struct MonitorInfo {
    in_filtered_list: bool,
    /// Keeps the projection subscribed to the member's activation event.
    _subscription: Subscription,
}

/// What an activation change did to a member's membership.
enum Transition {
    Entered,
    Left,
}

struct Projection {
    source: Arc<MemberCollection>,
    filter: Filter,
    sort: RwLock<Option<SortComparison>>,
    monitored: Mutex<IndexMap<MemberId, MonitorInfo>>,
    filtered: RwLock<Arc<Vec<ViewRef>>>,
    changed: Event<ViewsChanged>,
}

/// Filtered, sorted, change-notifying projection of a member collection.
pub struct ViewsCollection {
    projection: Arc<Projection>,
    _source_subscription: Subscription,
}

impl ViewsCollection {
    /// Project `source` through `filter`.
    pub fn new<F>(source: Arc<MemberCollection>, filter: F) -> Self
    where
        F: Fn(&Member) -> bool + Send + Sync + 'static,
    {
        let projection = Arc::new(Projection {
            source: Arc::clone(&source),
            filter: Arc::new(filter),
            sort: RwLock::new(None),
            monitored: Mutex::new(IndexMap::new()),
            filtered: RwLock::new(Arc::new(Vec::new())),
            changed: Event::new(),
        });

        projection.monitor_all();

        let weak: Weak<Projection> = Arc::downgrade(&projection);
        let source_subscription = source.on_changed(move |change| {
            if let Some(projection) = weak.upgrade() {
                projection.source_changed(change);
            }
        });

        projection.update_filtered();

        Self {
            projection,
            _source_subscription: source_subscription,
        }
    }

    /// Every member of `source`.
    pub fn all(source: Arc<MemberCollection>) -> Self {
        Self::new(source, |_| true)
    }

    /// The active members of `source`.
    pub fn active(source: Arc<MemberCollection>) -> Self {
        Self::new(source, Member::is_active)
    }

    /// Replace (or clear) the comparator.
    ///
    /// Always recomputes and raises exactly one `Reset`.
    pub fn set_sort_comparison(&self, sort: Option<SortComparison>) {
        *self.projection.sort.write() = sort;
        self.projection.update_filtered();
        self.projection.notify_reset();
    }

    pub fn sort_comparison(&self) -> Option<SortComparison> {
        self.projection.sort.read().clone()
    }

    pub fn contains(&self, item: &ViewRef) -> bool {
        self.projection
            .filtered
            .read()
            .iter()
            .any(|candidate| same_view(candidate, item))
    }

    /// Position of `item` in the projection.
    pub fn index_of(&self, item: &ViewRef) -> Option<usize> {
        self.projection.index_of(item)
    }

    pub fn get(&self, index: usize) -> Option<ViewRef> {
        self.projection.filtered.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.projection.filtered.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projection.filtered.read().is_empty()
    }

    /// Iterate over a snapshot of the current items.
    ///
    /// Later mutations do not affect an iterator already handed out.
    pub fn iter(&self) -> ViewsIter {
        ViewsIter {
            items: self.projection.snapshot(),
            position: 0,
        }
    }

    pub fn to_vec(&self) -> Vec<ViewRef> {
        (*self.projection.snapshot()).clone()
    }

    /// Observe changes to the projection.
    pub fn on_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ViewsChanged) + Send + Sync + 'static,
    {
        self.projection.changed.subscribe(handler)
    }

    #[cfg(test)]
    fn monitored_count(&self) -> usize {
        self.projection.monitored.lock().len()
    }
}

impl<'a> IntoIterator for &'a ViewsCollection {
    type Item = ViewRef;
    type IntoIter = ViewsIter;

    fn into_iter(self) -> ViewsIter {
        self.iter()
    }
}

impl std::fmt::Debug for ViewsCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewsCollection")
            .field("len", &self.len())
            .field("sorted", &self.projection.sort.read().is_some())
            .field("monitored", &self.projection.monitored.lock().len())
            .finish()
    }
}

/// Iterator over a projection snapshot.
pub struct ViewsIter {
    items: Arc<Vec<ViewRef>>,
    position: usize,
}

impl Iterator for ViewsIter {
    type Item = ViewRef;

    fn next(&mut self) -> Option<ViewRef> {
        let item = self.items.get(self.position).cloned();
        if item.is_some() {
            self.position += 1;
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ViewsIter {}

impl Projection {
    fn snapshot(&self) -> Arc<Vec<ViewRef>> {
        Arc::clone(&self.filtered.read())
    }

    fn index_of(&self, item: &ViewRef) -> Option<usize> {
        self.filtered
            .read()
            .iter()
            .position(|candidate| same_view(candidate, item))
    }

    /// Recompute the materialized list from the raw collection.
    fn update_filtered(&self) {
        let sort = self.sort.read().clone();

        let mut items: Vec<ViewRef> = self
            .source
            .snapshot()
            .iter()
            .filter(|member| (self.filter)(member))
            .map(|member| Arc::clone(member.item()))
            .collect();

        if let Some(compare) = sort {
            items.sort_by(|a, b| compare(a, b));
        }

        *self.filtered.write() = Arc::new(items);
    }

    fn monitor_all(self: &Arc<Self>) {
        for member in self.source.snapshot() {
            let in_list = (self.filter)(&member);
            self.add_monitor(&member, in_list);
        }
    }

    fn add_monitor(self: &Arc<Self>, member: &Arc<Member>, in_filtered_list: bool) {
        let weak = Arc::downgrade(self);
        let weak_member = Arc::downgrade(member);
        let subscription = member.on_active_changed(move |args| {
            if let (Some(projection), Some(member)) = (weak.upgrade(), weak_member.upgrade()) {
                projection.member_activation_changed(&member, args.navigation);
            }
        });

        self.monitored.lock().insert(
            member.id(),
            MonitorInfo {
                in_filtered_list,
                _subscription: subscription,
            },
        );
    }

    fn remove_monitor(&self, member: &Member) {
        // Drop the record outside the lock; dropping it unsubscribes.
        let removed = self.monitored.lock().shift_remove(&member.id());
        drop(removed);
    }

    fn reset_monitors(self: &Arc<Self>) {
        let previous = std::mem::take(&mut *self.monitored.lock());
        drop(previous);
        self.monitor_all();
    }

    fn source_changed(self: &Arc<Self>, change: &CollectionChange<Arc<Member>>) {
        match change {
            CollectionChange::Add { items, .. } => {
                let mut entered: SmallVec<[ViewRef; 1]> = SmallVec::new();
                for member in items {
                    // An earlier observer of the same change may already
                    // have removed it again.
                    if !self.source.contains(member) {
                        trace!(member = ?member.id(), "added member already gone");
                        continue;
                    }
                    let in_filter = (self.filter)(member);
                    self.add_monitor(member, in_filter);
                    if in_filter {
                        entered.push(Arc::clone(member.item()));
                    }
                }

                self.update_filtered();

                if entered.is_empty() {
                    return;
                }

                // Insert positions under a comparator are not tracked
                // incrementally.
                if self.sort.read().is_some() {
                    self.notify_reset();
                } else {
                    for item in entered {
                        self.notify_add(item, None);
                    }
                }
            }
            CollectionChange::Remove { items, .. } => {
                let mut working: Vec<ViewRef> = (*self.snapshot()).clone();
                let mut removals: SmallVec<[(ViewRef, usize); 1]> = SmallVec::new();

                for member in items {
                    self.remove_monitor(member);
                    if !(self.filter)(member) {
                        continue;
                    }
                    if let Some(index) = working
                        .iter()
                        .position(|candidate| same_view(candidate, member.item()))
                    {
                        working.remove(index);
                        removals.push((Arc::clone(member.item()), index));
                    }
                }

                self.update_filtered();

                for (item, index) in removals {
                    self.notify(ViewsChanged {
                        change: CollectionChange::Remove {
                            items: smallvec![item],
                            index: Some(index),
                        },
                        navigation: None,
                    });
                }
            }
            CollectionChange::Reset => {
                self.reset_monitors();
                self.update_filtered();
                self.notify_reset();
            }
        }
    }

    fn member_activation_changed(&self, member: &Member, navigation: NavigationKind) {
        let in_filter = (self.filter)(member);

        let transition = {
            let mut monitored = self.monitored.lock();
            // The member may have been removed by an earlier handler of the
            // same notification.
            let Some(info) = monitored.get_mut(&member.id()) else {
                trace!(member = ?member.id(), "activation change for unmonitored member ignored");
                return;
            };

            if in_filter {
                if info.in_filtered_list {
                    return;
                }
                info.in_filtered_list = true;
                Transition::Entered
            } else {
                // The record stays: the member may pass the filter again.
                info.in_filtered_list = false;
                Transition::Left
            }
        };

        match transition {
            Transition::Entered => {
                self.update_filtered();
                self.notify_add(Arc::clone(member.item()), Some(navigation));
            }
            Transition::Left => {
                // Reported even when the item was not in the list; the
                // index is then `None`.
                let index = self.index_of(member.item());
                self.update_filtered();
                self.notify(ViewsChanged {
                    change: CollectionChange::Remove {
                        items: smallvec![Arc::clone(member.item())],
                        index,
                    },
                    navigation: Some(navigation),
                });
            }
        }
    }

    fn notify_add(&self, item: ViewRef, navigation: Option<NavigationKind>) {
        if let Some(index) = self.index_of(&item) {
            self.notify(ViewsChanged {
                change: CollectionChange::Add {
                    items: smallvec![item],
                    index,
                },
                navigation,
            });
        }
    }

    fn notify_reset(&self) {
        self.notify(ViewsChanged {
            change: CollectionChange::Reset,
            navigation: None,
        });
    }

    fn notify(&self, args: ViewsChanged) {
        trace!(
            action = ?args.action(),
            index = ?args.index(),
            navigation = ?args.navigation,
            "views changed"
        );
        self.changed.emit(&args);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
