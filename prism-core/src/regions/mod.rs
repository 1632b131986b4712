//! Regions
//!
//! A region is a named placeholder in a view tree into which views are
//! added, removed, activated and ordered. This module implements the
//! synchronization engine behind it.
//!
//! # Concepts
//!
//! ## Members
//!
//! Each view in a region is wrapped in a [`Member`] carrying its name and
//! active flag. Members live in the region's raw [`MemberCollection`],
//! which is unfiltered and ordered by insertion.
//!
//! ## Projections
//!
//! A [`ViewsCollection`] is a filtered, optionally sorted, change-notifying
//! view of the raw collection. A region exposes two of them: `views` (every
//! member) and `active_views` (members whose active flag is set). Each
//! projection keeps its own bookkeeping, so any number can observe the same
//! raw collection.
//!
//! ## Behaviors
//!
//! Cross-cutting policies are implemented as [`RegionBehavior`]s observing
//! the projections: evicting deactivated views, and mirroring the region
//! context into each view.

pub mod behaviors;
mod collection;
mod error;
mod member;
mod navigation;
mod region;
mod settings;
mod view;
mod views;

pub use behaviors::{
    BindRegionContextBehavior, DeclaredLifetimes, KeepAlivePolicy, RegionBehavior,
    RegionMemberLifetimeBehavior,
};
pub use collection::{ChangeAction, ChangedItems, CollectionChange, MemberCollection};
pub use error::{RegionError, Result};
pub use member::{ActiveChanged, Member, MemberId};
pub use navigation::NavigationKind;
pub use region::Region;
pub use settings::{RegionKind, RegionSettings};
pub use view::{same_view, ContextSlot, ContextValue, DataContext, View, ViewRef};
pub use views::{Filter, SortComparison, ViewsChanged, ViewsCollection, ViewsIter};
