//! Lifecycle state and activation generations.

use std::fmt;

/// Whether the compass is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Initial and post-teardown state; no resources held.
    #[default]
    Inactive,
    /// Foreground; resources acquired.
    Active,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Inactive => "Inactive",
            LifecycleState::Active => "Active",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Active)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies one activation. Starts at 0 (never active) and increases by
/// one per `activate()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_inactive() {
        assert_eq!(LifecycleState::default(), LifecycleState::Inactive);
        assert!(!LifecycleState::default().is_active());
    }

    #[test]
    fn test_generation_increments() {
        let g = Generation::default();
        assert_eq!(g.value(), 0);
        assert_eq!(g.next().value(), 1);
        assert!(g.next() > g);
        assert_eq!(g.next().to_string(), "#1");
    }
}
