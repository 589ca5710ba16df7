//! Error types for structural operations
//!
//! Every fallible operation in the engine is synchronous and local: it either
//! succeeds completely or fails with one of these variants and leaves the
//! state it touched unchanged.

use std::fmt;

/// Error type for attach/detach, system membership, and construction
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A component's declared dependency would be left unsatisfied
    Dependency {
        /// Type name of the component whose requirement failed
        component: &'static str,
        /// Type name of the kind nothing on the entity satisfies
        missing: &'static str,
    },
    /// A structural invariant would be broken (duplicate component, unknown entity, ...)
    Invariant(String),
    /// An argument was rejected before any mutation happened
    Argument(String),
}

impl SimError {
    /// Shorthand for an invariant violation
    pub fn invariant(msg: impl Into<String>) -> Self {
        SimError::Invariant(msg.into())
    }

    /// Shorthand for a rejected argument
    pub fn argument(msg: impl Into<String>) -> Self {
        SimError::Argument(msg.into())
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Dependency { component, missing } => write!(
                f,
                "Dependency violation: {} requires {} on the same entity",
                component, missing
            ),
            SimError::Invariant(msg) => write!(f, "Invariant violation: {}", msg),
            SimError::Argument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_display() {
        let err = SimError::Dependency {
            component: "ParticleEmitter",
            missing: "dyn Physical",
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Dependency violation"));
        assert!(msg.contains("ParticleEmitter"));
        assert!(msg.contains("dyn Physical"));
    }

    #[test]
    fn test_invariant_display() {
        let msg = format!("{}", SimError::invariant("entity not in system"));
        assert!(msg.contains("Invariant violation"));
        assert!(msg.contains("entity not in system"));
    }

    #[test]
    fn test_argument_display() {
        let msg = format!("{}", SimError::argument("tick_ms must be positive"));
        assert!(msg.contains("Invalid argument"));
        assert!(msg.contains("tick_ms"));
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&SimError::argument("x"));
    }
}
