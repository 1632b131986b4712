//! Region Behaviors
//!
//! Behaviors are independent observers attached to a region. Each one
//! subscribes to the region's projections or properties when attached and
//! releases every subscription when detached (or dropped).
//!
//! - [`RegionMemberLifetimeBehavior`] removes views from the region once
//!   they are deactivated, unless a [`KeepAlivePolicy`] keeps them.
//! - [`BindRegionContextBehavior`] mirrors the region context into every
//!   view's context slot and pulls slot changes back into the region.

mod context;
mod lifetime;

use std::sync::Arc;

use super::region::Region;

pub use context::BindRegionContextBehavior;
pub use lifetime::{DeclaredLifetimes, KeepAlivePolicy, RegionMemberLifetimeBehavior};

/// An observer attached to a region.
pub trait RegionBehavior: Send + Sync {
    /// Start observing `region`.
    ///
    /// Implementations must hold the region weakly.
    fn attach(&mut self, region: &Arc<Region>);

    /// Stop observing. Must be safe to call more than once.
    fn detach(&mut self);
}
