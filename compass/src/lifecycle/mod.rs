//! Foreground lifecycle binding for device resources.
//!
//! The [`LifecycleCoordinator`] owns the three resources the compass needs
//! while it is on screen and ties them to a two-state lifecycle:
//!
//! ```text
//!            activate()                    deactivate()
//! Inactive ─────────────► Active ─────────────────────► Inactive
//!            1. position subscription      3. wake lock
//!            2. orientation subscription   2. orientation subscription
//!            3. wake lock                  1. position subscription
//! ```
//!
//! A resource that cannot be acquired is left absent and reported in the
//! [`ActivationReport`]; activation still completes for the others.
//!
//! # Generations
//!
//! Every activation opens a new [`Generation`]. The callbacks handed to the
//! device services stamp their events with it, and the engine only applies
//! an event while the coordinator [`accepts`](LifecycleCoordinator::accepts)
//! that generation. A sample that was already queued when `deactivate()` ran
//! is therefore discarded instead of touching filter or renderer state.

mod coordinator;
mod error;
mod state;

pub use coordinator::{
    ActivationReport, CallbackFactory, CoordinatorConfig, LifecycleCoordinator,
    LifecycleServices, Resource, ResourceSnapshot,
};
pub use error::LifecycleError;
pub use state::{Generation, LifecycleState};
