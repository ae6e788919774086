//! Lifecycle misuse errors.

use thiserror::Error;

use super::state::Generation;

/// Calls that break the activate/deactivate alternation.
///
/// Both are no-ops: no resource is acquired or released by a rejected call.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("activate() called while already active (generation {0})")]
    AlreadyActive(Generation),

    #[error("deactivate() called while inactive")]
    NotActive,
}
