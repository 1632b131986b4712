//! Member lifetime behavior.
//!
//! Watches the active views of a region. A view that leaves the active
//! projection is asked whether it wants to be kept alive; if not, and it
//! is still in the region, it is removed from the region altogether.

use std::any::{Any, TypeId};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::RegionBehavior;
use crate::reactive::Subscription;
use crate::regions::collection::ChangeAction;
use crate::regions::navigation::NavigationKind;
use crate::regions::region::Region;
use crate::regions::view::ViewRef;

/// Decides whether a deactivated view stays in its region.
pub trait KeepAlivePolicy: Send + Sync {
    fn should_keep_alive(&self, view: &ViewRef, navigation: Option<NavigationKind>) -> bool;
}

impl<F> KeepAlivePolicy for F
where
    F: Fn(&ViewRef, Option<NavigationKind>) -> bool + Send + Sync,
{
    fn should_keep_alive(&self, view: &ViewRef, navigation: Option<NavigationKind>) -> bool {
        self(view, navigation)
    }
}

/// Keep-alive policy backed by item capabilities and a table of per-type
/// declarations.
///
/// Checked in order, first answer wins:
///
/// 1. the view's own [`View::keep_alive`](crate::regions::View::keep_alive)
/// 2. its data context's `keep_alive`
/// 3. a declaration for the view's concrete type
/// 4. a declaration for the data context's concrete type
///
/// With no answer the view is not kept alive.
#[derive(Debug, Clone, Default)]
pub struct DeclaredLifetimes {
    declarations: IndexMap<TypeId, bool>,
}

impl DeclaredLifetimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the keep-alive answer for every item of type `T`.
    pub fn declare<T: Any>(mut self, keep_alive: bool) -> Self {
        self.declarations.insert(TypeId::of::<T>(), keep_alive);
        self
    }

    fn declaration_for(&self, value: &dyn Any) -> Option<bool> {
        self.declarations.get(&value.type_id()).copied()
    }
}

impl KeepAlivePolicy for DeclaredLifetimes {
    fn should_keep_alive(&self, view: &ViewRef, _navigation: Option<NavigationKind>) -> bool {
        let data_context = view.data_context();

        view.keep_alive()
            .or_else(|| data_context.as_ref().and_then(|dc| dc.keep_alive()))
            .or_else(|| self.declaration_for(view.as_any()))
            .or_else(|| {
                data_context
                    .as_ref()
                    .and_then(|dc| self.declaration_for(dc.as_any()))
            })
            .unwrap_or(false)
    }
}

/// Removes deactivated views that are not kept alive.
pub struct RegionMemberLifetimeBehavior {
    policy: Arc<dyn KeepAlivePolicy>,
    subscription: Option<Subscription>,
}

impl RegionMemberLifetimeBehavior {
    pub const KEY: &'static str = "RegionMemberLifetimeBehavior";

    pub fn new<P>(policy: P) -> Self
    where
        P: KeepAlivePolicy + 'static,
    {
        Self {
            policy: Arc::new(policy),
            subscription: None,
        }
    }
}

impl RegionBehavior for RegionMemberLifetimeBehavior {
    fn attach(&mut self, region: &Arc<Region>) {
        let weak = Arc::downgrade(region);
        let policy = Arc::clone(&self.policy);

        self.subscription = Some(region.active_views().on_changed(move |event| {
            // Only departures matter; resets carry no items.
            if event.action() != ChangeAction::Remove {
                return;
            }
            let Some(region) = weak.upgrade() else {
                return;
            };

            for view in event.items() {
                if policy.should_keep_alive(view, event.navigation) {
                    continue;
                }
                if !region.views().contains(view) {
                    continue;
                }

                debug!(region = %region.name(), "removing inactive view");
                if let Err(err) = region.remove(view) {
                    warn!(region = %region.name(), error = %err, "failed to remove inactive view");
                }
            }
        }));
    }

    fn detach(&mut self) {
        self.subscription = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::view::{DataContext, View};

    struct Screen {
        keep_alive: Option<bool>,
        data_context: Option<Arc<dyn DataContext>>,
    }

    impl View for Screen {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn keep_alive(&self) -> Option<bool> {
            self.keep_alive
        }

        fn data_context(&self) -> Option<Arc<dyn DataContext>> {
            self.data_context.clone()
        }
    }

    struct Model {
        keep_alive: Option<bool>,
    }

    impl DataContext for Model {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn keep_alive(&self) -> Option<bool> {
            self.keep_alive
        }
    }

    fn screen(keep_alive: Option<bool>, model: Option<Option<bool>>) -> ViewRef {
        Arc::new(Screen {
            keep_alive,
            data_context: model.map(|keep_alive| Arc::new(Model { keep_alive }) as Arc<dyn DataContext>),
        })
    }

    #[test]
    fn default_is_not_kept_alive() {
        let policy = DeclaredLifetimes::new();
        assert!(!policy.should_keep_alive(&screen(None, None), None));
        assert!(!policy.should_keep_alive(&screen(None, Some(None)), None));
    }

    #[test]
    fn view_capability_wins_over_data_context() {
        let policy = DeclaredLifetimes::new();
        assert!(!policy.should_keep_alive(&screen(Some(false), Some(Some(true))), None));
        assert!(policy.should_keep_alive(&screen(Some(true), Some(Some(false))), None));
    }

    #[test]
    fn data_context_capability_wins_over_declarations() {
        let policy = DeclaredLifetimes::new().declare::<Screen>(true);
        assert!(!policy.should_keep_alive(&screen(None, Some(Some(false))), None));
    }

    #[test]
    fn view_type_declaration_wins_over_data_context_type() {
        let policy = DeclaredLifetimes::new()
            .declare::<Screen>(false)
            .declare::<Model>(true);
        assert!(!policy.should_keep_alive(&screen(None, Some(None)), None));

        let policy = DeclaredLifetimes::new().declare::<Model>(true);
        assert!(policy.should_keep_alive(&screen(None, Some(None)), None));
    }

    #[test]
    fn closures_are_policies() {
        let policy = |_: &ViewRef, navigation: Option<NavigationKind>| {
            navigation == Some(NavigationKind::GoBack)
        };
        assert!(policy.should_keep_alive(&screen(None, None), Some(NavigationKind::GoBack)));
        assert!(!policy.should_keep_alive(&screen(None, None), None));
    }
}
