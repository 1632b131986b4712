//! Prism Core
//!
//! This crate provides the region engine of the Prism MVVM framework.
//! It implements:
//!
//! - Region members carrying a name and an active flag
//! - Filtered, sorted, change-notifying projections of a region's members
//! - Region behaviors: member lifetime and context propagation
//! - Regions tying the above together, configurable from settings
//!
//! View resolution, the UI property system, navigation routing and
//! platform view hosting live outside this crate; it only sees views
//! through the [`regions::View`] capability trait.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `reactive`: events, subscription handles and observable values
//! - `regions`: members, projections, behaviors and regions
//!
//! # Example
//!
//! ```rust,ignore
//! use prism_core::regions::{NavigationKind, Region, RegionSettings};
//!
//! let region = Region::from_settings(&RegionSettings::new("MainRegion"))?;
//!
//! region.add_named(home.clone(), "Home")?;
//! region.activate(&home, NavigationKind::RequestNavigate)?;
//! assert!(region.active_views().contains(&home));
//!
//! // Deactivating evicts the view unless it asks to be kept alive.
//! region.deactivate(&home, NavigationKind::RequestNavigate)?;
//! assert!(!region.views().contains(&home));
//! ```

pub mod reactive;
pub mod regions;

pub use regions::{RegionError, Result};
