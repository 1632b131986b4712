//! Reactive Primitives
//!
//! This module implements the notification plumbing the region engine is
//! built on: events, subscription handles, and observable values.
//!
//! # Concepts
//!
//! ## Events
//!
//! An [`Event`] is a synchronous multicast notification. Emitting it calls
//! every handler, in subscription order, before returning.
//!
//! ## Subscriptions
//!
//! Subscribing returns a [`Subscription`] that owns the registration.
//! Owners keep their subscriptions in fields and let them drop on
//! teardown, so no handler outlives the object that registered it.
//!
//! ## Observables
//!
//! An [`Observable`] is a value cell with a change event. Writing the value
//! it already holds is a no-op, which lets two observables be bound to each
//! other without feedback loops.
//!
//! # Implementation Notes
//!
//! Handlers run with no lock held by the emitting object. A handler may
//! therefore read or mutate the emitter, and notifications cascade
//! synchronously.

mod event;
mod observable;
mod subscriber;

pub use event::Event;
pub use observable::Observable;
pub use subscriber::{SubscriberId, Subscription};
