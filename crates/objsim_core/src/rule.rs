//! Modification rules
//!
//! A [`Rule`] pairs a modifier with an applier over one component query type.
//! Running it on an entity computes a delta from a shared view of the
//! component, applies it through a mutable view, and removes the entity if the
//! applier says so.

use crate::applier::{Applier, Verdict};
use crate::component::{ComponentKind, Query};
use crate::error::SimError;
use crate::modifier::Modifier;
use crate::system::{ActiveSystem, EntityKey};

/// A modifier and an applier bound to the component type `T`
pub struct Rule<T: Query + ?Sized, M: 'static> {
    modifier: Box<dyn Modifier<T, M>>,
    applier: Box<dyn Applier<T, M>>,
}

impl<T: Query + ?Sized, M: 'static> Rule<T, M> {
    pub fn new(
        modifier: impl Modifier<T, M> + 'static,
        applier: impl Applier<T, M> + 'static,
    ) -> Self {
        Self {
            modifier: Box::new(modifier),
            applier: Box::new(applier),
        }
    }

    /// Kind an entity must satisfy for this rule to apply
    pub fn target_kind(&self) -> ComponentKind {
        T::query_kind()
    }

    /// Run against one entity
    ///
    /// Returns `Ok(None)` if the entity has no component matching `T`, and the
    /// applier's verdict otherwise. On [`Verdict::Remove`] the entity is no
    /// longer in `system` when this returns.
    pub fn run(
        &self,
        dt: f64,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<Option<Verdict>, SimError> {
        let entity = system
            .entity_mut(key)
            .ok_or_else(|| SimError::invariant(format!("entity {:?} is not in this system", key)))?;
        let Some(target) = entity.get_mut::<T>() else {
            return Ok(None);
        };

        let delta = self.modifier.compute(dt, target);
        let verdict = self.applier.apply(target, delta);

        if verdict == Verdict::Remove {
            system.remove_entity(key);
        }
        Ok(Some(verdict))
    }
}

/// Type-erased rule, for storing rules over different types in one list
pub trait DynRule {
    fn target_kind(&self) -> ComponentKind;
    fn run(
        &self,
        dt: f64,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<Option<Verdict>, SimError>;
}

impl<T: Query + ?Sized, M: 'static> DynRule for Rule<T, M> {
    fn target_kind(&self) -> ComponentKind {
        Rule::target_kind(self)
    }

    fn run(
        &self,
        dt: f64,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<Option<Verdict>, SimError> {
        Rule::run(self, dt, system, key)
    }
}
