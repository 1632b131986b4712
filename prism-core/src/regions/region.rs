//! Regions
//!
//! A [`Region`] owns the raw member collection, the two projections
//! exposed to the rest of the application (`views` and `active_views`),
//! the ambient context value and the attached behaviors.
//!
//! # Threading
//!
//! All region types are `Send + Sync`, but a region expects every mutation
//! and notification to happen on one logical UI thread. Concurrent
//! mutation from several threads keeps memory safe yet may interleave
//! notifications in an order observers cannot make sense of; serializing
//! access is the caller's obligation.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;

use super::behaviors::{
    BindRegionContextBehavior, DeclaredLifetimes, KeepAlivePolicy, RegionBehavior,
    RegionMemberLifetimeBehavior,
};
use super::collection::MemberCollection;
use super::error::{RegionError, Result};
use super::member::Member;
use super::navigation::NavigationKind;
use super::settings::{RegionKind, RegionSettings};
use super::view::{same_view, ContextValue, ViewRef};
use super::views::{SortComparison, ViewsCollection};
use crate::reactive::{Observable, Subscription};

/// A named placeholder hosting views.
pub struct Region {
    name: String,
    kind: RegionKind,
    members: Arc<MemberCollection>,
    views: ViewsCollection,
    active_views: ViewsCollection,
    context: Observable<Option<ContextValue>>,
    behaviors: Mutex<IndexMap<String, Box<dyn RegionBehavior>>>,
}

impl Region {
    /// Create an empty region with no behaviors attached.
    pub fn new(name: impl Into<String>, kind: RegionKind) -> Arc<Self> {
        let members = MemberCollection::new();
        Arc::new(Self {
            name: name.into(),
            kind,
            views: ViewsCollection::all(Arc::clone(&members)),
            active_views: ViewsCollection::active(Arc::clone(&members)),
            members,
            context: Observable::new(None),
            behaviors: Mutex::new(IndexMap::new()),
        })
    }

    /// Create a region and attach the behaviors the settings ask for, using
    /// [`DeclaredLifetimes`] with no declarations as the keep-alive policy.
    pub fn from_settings(settings: &RegionSettings) -> Result<Arc<Self>> {
        Self::from_settings_with_policy(settings, DeclaredLifetimes::new())
    }

    pub fn from_settings_with_policy<P>(settings: &RegionSettings, policy: P) -> Result<Arc<Self>>
    where
        P: KeepAlivePolicy + 'static,
    {
        let region = Self::new(settings.name.clone(), settings.kind);

        if settings.member_lifetime {
            region.add_behavior(
                RegionMemberLifetimeBehavior::KEY,
                RegionMemberLifetimeBehavior::new(policy),
            )?;
        }
        if settings.context_binding {
            region.add_behavior(BindRegionContextBehavior::KEY, BindRegionContextBehavior::new())?;
        }

        Ok(region)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    /// The raw member collection.
    pub fn members(&self) -> &Arc<MemberCollection> {
        &self.members
    }

    /// Every view in the region, in insertion order unless sorted.
    pub fn views(&self) -> &ViewsCollection {
        &self.views
    }

    /// The active views.
    pub fn active_views(&self) -> &ViewsCollection {
        &self.active_views
    }

    /// Add a view.
    pub fn add(&self, view: ViewRef) -> Result<()> {
        self.insert(Member::new(view))
    }

    /// Add a view under a name unique within the region.
    pub fn add_named(&self, view: ViewRef, name: impl Into<String>) -> Result<()> {
        self.insert(Member::named(view, name))
    }

    fn insert(&self, member: Arc<Member>) -> Result<()> {
        if self.members.find_by_item(member.item()).is_some() {
            return Err(RegionError::ViewAlreadyExists {
                region: self.name.clone(),
            });
        }
        if let Some(name) = member.name() {
            if self.members.find_by_name(&name).is_some() {
                return Err(RegionError::NameInUse {
                    region: self.name.clone(),
                    name,
                });
            }
        }

        debug!(region = %self.name, name = ?member.name(), "adding view");
        self.members.push(Arc::clone(&member));

        if self.kind == RegionKind::AllActive {
            member.set_active(true, NavigationKind::Programmatic);
        }
        Ok(())
    }

    /// Remove a view.
    pub fn remove(&self, view: &ViewRef) -> Result<()> {
        let member = self.member_or_err(view)?;
        debug!(region = %self.name, name = ?member.name(), "removing view");
        self.members.remove(&member);
        Ok(())
    }

    /// Remove every view, one at a time.
    pub fn remove_all(&self) {
        debug!(region = %self.name, count = self.members.len(), "removing all views");
        for member in self.members.snapshot() {
            self.members.remove(&member);
        }
    }

    /// Mark a view as active.
    ///
    /// In a single-active region the currently active views are
    /// deactivated first.
    pub fn activate(&self, view: &ViewRef, navigation: NavigationKind) -> Result<()> {
        let member = self.member_or_err(view)?;

        if self.kind == RegionKind::SingleActive {
            for current in self.active_views.iter() {
                if same_view(&current, view) {
                    continue;
                }
                if let Some(other) = self.members.find_by_item(&current) {
                    if other.is_active() {
                        other.set_active(false, navigation);
                    }
                }
            }
        }

        if !member.is_active() {
            debug!(region = %self.name, name = ?member.name(), %navigation, "activating view");
            member.set_active(true, navigation);
        }
        Ok(())
    }

    /// Mark a view as inactive.
    pub fn deactivate(&self, view: &ViewRef, navigation: NavigationKind) -> Result<()> {
        if self.kind == RegionKind::AllActive {
            return Err(RegionError::DeactivateNotAllowed {
                region: self.name.clone(),
            });
        }

        let member = self.member_or_err(view)?;
        if member.is_active() {
            debug!(region = %self.name, name = ?member.name(), %navigation, "deactivating view");
            member.set_active(false, navigation);
        }
        Ok(())
    }

    /// Look up a view by the name it was added under.
    pub fn get_view(&self, name: &str) -> Option<ViewRef> {
        self.members
            .find_by_name(name)
            .map(|member| Arc::clone(member.item()))
    }

    /// The member wrapping `view`.
    pub fn member(&self, view: &ViewRef) -> Option<Arc<Member>> {
        self.members.find_by_item(view)
    }

    fn member_or_err(&self, view: &ViewRef) -> Result<Arc<Member>> {
        self.member(view).ok_or_else(|| RegionError::ViewNotInRegion {
            region: self.name.clone(),
        })
    }

    pub fn context(&self) -> Option<ContextValue> {
        self.context.get()
    }

    /// Replace the region context.
    ///
    /// Returns `false`, without notifying, when `context` is the current
    /// value.
    pub fn set_context(&self, context: Option<ContextValue>) -> bool {
        self.context.set(context)
    }

    pub fn on_context_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Option<ContextValue>) + Send + Sync + 'static,
    {
        self.context.subscribe(handler)
    }

    /// Sort both projections.
    pub fn set_sort_comparison(&self, sort: Option<SortComparison>) {
        self.views.set_sort_comparison(sort.clone());
        self.active_views.set_sort_comparison(sort);
    }

    /// Attach a behavior under `key`.
    pub fn add_behavior<B>(self: &Arc<Self>, key: impl Into<String>, behavior: B) -> Result<()>
    where
        B: RegionBehavior + 'static,
    {
        let key = key.into();
        if self.behaviors.lock().contains_key(&key) {
            return Err(RegionError::BehaviorAlreadyExists(key));
        }

        let mut behavior: Box<dyn RegionBehavior> = Box::new(behavior);
        behavior.attach(self);
        debug!(region = %self.name, behavior = %key, "behavior attached");

        self.behaviors.lock().insert(key, behavior);
        Ok(())
    }

    /// Detach and drop the behavior registered under `key`.
    pub fn remove_behavior(&self, key: &str) -> bool {
        let removed = self.behaviors.lock().shift_remove(key);
        match removed {
            Some(mut behavior) => {
                behavior.detach();
                debug!(region = %self.name, behavior = %key, "behavior detached");
                true
            }
            None => false,
        }
    }

    pub fn behavior_keys(&self) -> Vec<String> {
        self.behaviors.lock().keys().cloned().collect()
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        for (_, behavior) in self.behaviors.get_mut().iter_mut() {
            behavior.detach();
        }
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("views", &self.views.len())
            .field("active_views", &self.active_views.len())
            .field("behaviors", &self.behavior_keys())
            .finish()
    }
}
