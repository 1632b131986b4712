//! Region items and their optional capabilities.
//!
//! A region hosts opaque items. The core never inspects an item's runtime
//! type; instead items opt into behaviors through the methods of [`View`],
//! all of which have "not supported" defaults.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::reactive::Observable;

/// Shared handle to a region item.
///
/// Items are compared by identity, never by value. See [`same_view`].
pub type ViewRef = Arc<dyn View>;

/// Per-view slot that mirrors the region context.
pub type ContextSlot = Observable<Option<ContextValue>>;

/// An item that can be placed in a region.
///
/// Only [`View::as_any`] is required. Everything else is a capability the
/// item may advertise.
///
/// ```rust,ignore
/// struct Home {
///     context: ContextSlot,
/// }
///
/// impl View for Home {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn context_slot(&self) -> Option<&ContextSlot> {
///         Some(&self.context)
///     }
/// }
/// ```
pub trait View: Send + Sync + 'static {
    /// Access the concrete item, for downcasting and type-level lookups.
    fn as_any(&self) -> &dyn Any;

    /// Whether this item wants to stay in its region once deactivated.
    ///
    /// `None` means the item does not express a preference.
    fn keep_alive(&self) -> Option<bool> {
        None
    }

    /// The view model bound to this item, if any.
    fn data_context(&self) -> Option<Arc<dyn DataContext>> {
        None
    }

    /// The slot receiving the region context.
    ///
    /// Items returning `None` do not take part in context propagation.
    fn context_slot(&self) -> Option<&ContextSlot> {
        None
    }
}

/// A view model bound to a view.
pub trait DataContext: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;

    /// Same meaning as [`View::keep_alive`].
    fn keep_alive(&self) -> Option<bool> {
        None
    }
}

/// Identity comparison between two items.
pub fn same_view(a: &ViewRef, b: &ViewRef) -> bool {
    view_key(a) == view_key(b)
}

/// Stable identity key of an item, valid while the item is alive.
pub(crate) fn view_key(view: &ViewRef) -> usize {
    Arc::as_ptr(view).cast::<()>() as usize
}

impl fmt::Debug for dyn View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = (self as *const dyn View).cast::<()>();
        f.debug_struct("View").field("addr", &addr).finish()
    }
}

/// Opaque region context payload.
///
/// Equality is identity: two `ContextValue`s are equal only when they are
/// clones of the same allocation. Setting a slot to a clone of its current
/// value is therefore a no-op, while setting it to a fresh, structurally
/// equal payload is a change.
#[derive(Clone)]
pub struct ContextValue(Arc<dyn Any + Send + Sync>);

impl ContextValue {
    /// Box a payload.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the payload as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles point at the same payload.
    pub fn ptr_eq(&self, other: &ContextValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ContextValue {}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextValue")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl View for Plain {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn identity_not_structure() {
        let a: ViewRef = Arc::new(Plain);
        let b: ViewRef = Arc::new(Plain);
        let a2 = a.clone();

        assert!(same_view(&a, &a2));
        assert!(!same_view(&a, &b));
    }

    #[test]
    fn default_capabilities_are_absent() {
        let view: ViewRef = Arc::new(Plain);
        assert!(view.keep_alive().is_none());
        assert!(view.data_context().is_none());
        assert!(view.context_slot().is_none());
        assert!(view.as_any().downcast_ref::<Plain>().is_some());
    }

    #[test]
    fn debug_shows_identity() {
        let a: ViewRef = Arc::new(Plain);
        let b: ViewRef = Arc::new(Plain);

        assert_eq!(format!("{:?}", a), format!("{:?}", a.clone()));
        assert_ne!(format!("{:?}", a), format!("{:?}", b));
        assert!(format!("{:?}", a).starts_with("View"));
    }

    #[test]
    fn context_value_equality_is_identity() {
        let a = ContextValue::new("A".to_string());
        let same = a.clone();
        let lookalike = ContextValue::new("A".to_string());

        assert_eq!(a, same);
        assert_ne!(a, lookalike);
        assert_eq!(a.downcast_ref::<String>().map(String::as_str), Some("A"));
        assert!(a.downcast_ref::<u32>().is_none());
    }
}
