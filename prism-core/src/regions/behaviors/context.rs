//! Region context binding.
//!
//! Keeps the region context and the context slot of every view in the
//! region in sync, in both directions:
//!
//! - the region context is pushed into a view's slot when the behavior
//!   attaches, when the view joins, and whenever the region context changes;
//! - a value written into a view's slot becomes the region context, which
//!   is then pushed to every view again.
//!
//! The round trip terminates because slots and the region context ignore
//! writes of the value they already hold.

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::trace;

use super::RegionBehavior;
use crate::reactive::Subscription;
use crate::regions::collection::CollectionChange;
use crate::regions::region::Region;
use crate::regions::view::{view_key, ContextValue, ViewRef};
use crate::regions::views::ViewsChanged;

/// Binds the region context to the context slot of every view.
#[derive(Default)]
pub struct BindRegionContextBehavior {
    binding: Option<Arc<ContextBinding>>,
    subscriptions: Vec<Subscription>,
}

impl BindRegionContextBehavior {
    pub const KEY: &'static str = "ContextToViews";

    pub fn new() -> Self {
        Self::default()
    }
}

/// A view whose slot is being observed.
struct BoundView {
    /// Held so the identity key stays valid.
    view: ViewRef,
    _subscription: Subscription,
}

struct ContextBinding {
    region: Weak<Region>,
    bound: Mutex<IndexMap<usize, BoundView>>,
}

impl ContextBinding {
    /// Push the current context into `view` and start observing its slot.
    fn bind(&self, view: &ViewRef, context: &Option<ContextValue>) {
        let Some(slot) = view.context_slot() else {
            return;
        };

        slot.set(context.clone());

        let region = self.region.clone();
        let subscription = slot.subscribe(move |value| {
            if let Some(region) = region.upgrade() {
                trace!(region = %region.name(), "pulling context from view");
                region.set_context(value.clone());
            }
        });

        self.bound.lock().insert(
            view_key(view),
            BoundView {
                view: Arc::clone(view),
                _subscription: subscription,
            },
        );
    }

    /// Stop observing `view` and clear its slot if the region has a context.
    fn unbind(&self, view: &ViewRef, region: &Region) {
        let removed = self.bound.lock().shift_remove(&view_key(view));
        drop(removed);

        if region.context().is_none() {
            return;
        }
        if let Some(slot) = view.context_slot() {
            slot.set(None);
        }
    }

    fn push_to_all(&self, region: &Region, context: &Option<ContextValue>) {
        trace!(region = %region.name(), "pushing context to views");
        for view in region.views() {
            if let Some(slot) = view.context_slot() {
                slot.set(context.clone());
            }
        }
    }

    fn views_changed(&self, event: &ViewsChanged) {
        let Some(region) = self.region.upgrade() else {
            return;
        };

        match &event.change {
            CollectionChange::Add { items, .. } => {
                let context = region.context();
                for view in items {
                    self.bind(view, &context);
                }
            }
            CollectionChange::Remove { items, .. } => {
                for view in items {
                    self.unbind(view, &region);
                }
            }
            CollectionChange::Reset => self.resync(&region),
        }
    }

    /// Reconcile bindings with the region's current views.
    fn resync(&self, region: &Region) {
        let current = region.views().to_vec();

        let departed: Vec<ViewRef> = {
            let bound = self.bound.lock();
            bound
                .values()
                .map(|bound| Arc::clone(&bound.view))
                .filter(|view| !region.views().contains(view))
                .collect()
        };
        for view in &departed {
            self.unbind(view, region);
        }

        let context = region.context();
        for view in &current {
            let is_bound = self.bound.lock().contains_key(&view_key(view));
            if !is_bound {
                self.bind(view, &context);
            }
        }
    }
}

impl RegionBehavior for BindRegionContextBehavior {
    fn attach(&mut self, region: &Arc<Region>) {
        self.detach();

        let binding = Arc::new(ContextBinding {
            region: Arc::downgrade(region),
            bound: Mutex::new(IndexMap::new()),
        });

        let weak = Arc::downgrade(&binding);
        self.subscriptions.push(region.views().on_changed(move |event| {
            if let Some(binding) = weak.upgrade() {
                binding.views_changed(event);
            }
        }));

        let weak = Arc::downgrade(&binding);
        let weak_region = Arc::downgrade(region);
        self.subscriptions.push(region.on_context_changed(move |context| {
            if let (Some(binding), Some(region)) = (weak.upgrade(), weak_region.upgrade()) {
                binding.push_to_all(&region, context);
            }
        }));

        let context = region.context();
        for view in region.views() {
            binding.bind(&view, &context);
        }

        self.binding = Some(binding);
    }

    fn detach(&mut self) {
        self.subscriptions.clear();
        self.binding = None;
    }
}
