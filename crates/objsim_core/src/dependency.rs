//! Dependency validation for attaching and detaching components
//!
//! Both checks are pure: they look at a hypothetical component set and report
//! the first problem found. The entity only mutates after a check passes, which
//! is what makes attach/detach atomic.

use crate::component::{Component, ComponentKind};
use crate::error::SimError;

/// First component in `set` that satisfies `kind`
pub fn resolve<'a, I>(set: I, kind: ComponentKind) -> Option<&'a dyn Component>
where
    I: IntoIterator<Item = &'a dyn Component>,
{
    set.into_iter().find(|c| c.satisfies(kind))
}

/// Check that every requirement within `set` is satisfied by some member of `set`
fn check_closed(set: &[&dyn Component]) -> Result<(), SimError> {
    for component in set {
        for required in component.requires() {
            if resolve(set.iter().copied(), required).is_none() {
                return Err(SimError::Dependency {
                    component: component.kind().name(),
                    missing: required.name(),
                });
            }
        }
    }
    Ok(())
}

/// Validate attaching `new` to an entity currently holding `existing`
///
/// Fails if the union would contain two components of the same concrete kind,
/// or if any member of the union has an unsatisfied requirement.
pub fn check_attach(existing: &[&dyn Component], new: &[&dyn Component]) -> Result<(), SimError> {
    let union: Vec<&dyn Component> = existing.iter().chain(new.iter()).copied().collect();

    for (i, component) in union.iter().enumerate().skip(existing.len()) {
        let kind = component.kind();
        if union[..i].iter().any(|other| other.kind() == kind) {
            return Err(SimError::invariant(format!(
                "entity already has a {} component",
                kind.short_name()
            )));
        }
    }

    check_closed(&union)
}

/// Validate removing the components at `removed` (indices into `existing`)
///
/// Fails if any remaining component would lose a requirement.
pub fn check_detach(existing: &[&dyn Component], removed: &[usize]) -> Result<(), SimError> {
    let remaining: Vec<&dyn Component> = existing
        .iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, c)| *c)
        .collect();

    check_closed(&remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base;
    impl Component for Base {}

    struct NeedsBase;
    impl Component for NeedsBase {
        fn requires(&self) -> Vec<ComponentKind> {
            vec![ComponentKind::of::<Base>()]
        }
    }

    struct NeedsNeedsBase;
    impl Component for NeedsNeedsBase {
        fn requires(&self) -> Vec<ComponentKind> {
            vec![ComponentKind::of::<NeedsBase>()]
        }
    }

    #[test]
    fn test_attach_without_dependency_fails() {
        let err = check_attach(&[], &[&NeedsBase]).unwrap_err();
        match err {
            SimError::Dependency { component, missing } => {
                assert!(component.ends_with("NeedsBase"));
                assert!(missing.ends_with("Base"));
            }
            other => panic!("Expected Dependency, got {:?}", other),
        }
    }

    #[test]
    fn test_attach_satisfied_by_existing() {
        assert!(check_attach(&[&Base], &[&NeedsBase]).is_ok());
    }

    #[test]
    fn test_attach_satisfied_by_new_batch() {
        // order inside the batch does not matter
        assert!(check_attach(&[], &[&NeedsBase, &Base]).is_ok());
        assert!(check_attach(&[], &[&NeedsNeedsBase, &NeedsBase, &Base]).is_ok());
    }

    #[test]
    fn test_attach_transitive_gap_fails() {
        assert!(check_attach(&[&Base], &[&NeedsNeedsBase]).is_err());
    }

    #[test]
    fn test_attach_duplicate_kind_is_invariant_violation() {
        let err = check_attach(&[&Base], &[&Base]).unwrap_err();
        assert!(matches!(err, SimError::Invariant(_)));

        let err = check_attach(&[], &[&Base, &Base]).unwrap_err();
        assert!(matches!(err, SimError::Invariant(_)));
    }

    #[test]
    fn test_detach_breaking_dependency_fails() {
        let existing: [&dyn Component; 2] = [&Base, &NeedsBase];
        assert!(check_detach(&existing, &[0]).is_err());
    }

    #[test]
    fn test_detach_dependent_together_succeeds() {
        let existing: [&dyn Component; 2] = [&Base, &NeedsBase];
        assert!(check_detach(&existing, &[0, 1]).is_ok());
        assert!(check_detach(&existing, &[1]).is_ok());
    }

    #[test]
    fn test_resolve_first_match() {
        let set: [&dyn Component; 2] = [&NeedsBase, &Base];
        let found = resolve(set.iter().copied(), ComponentKind::of::<Base>()).unwrap();
        assert_eq!(found.kind(), ComponentKind::of::<Base>());
        assert!(resolve(set.iter().copied(), ComponentKind::of::<NeedsNeedsBase>()).is_none());
    }
}
