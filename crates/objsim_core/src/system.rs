//! Active systems
//!
//! An [`ActiveSystem`] is a live container of entities anchored at an origin.
//! Entity positions are relative to that origin. A system can be nested inside
//! another by attaching it to an entity through the
//! [`NestedSystem`](crate::traits::NestedSystem) component.

use std::sync::atomic::{AtomicU64, Ordering};
use slotmap::{new_key_type, SlotMap};
use objsim_math::Vec3;
use crate::behavior::{Behavior, Target};
use crate::component::ComponentKind;
use crate::entity::{DirtyFlags, Entity};
use crate::error::SimError;
use crate::host::Host;
use crate::traits::NestedSystem;

new_key_type! {
    /// Key to an entity in an active system
    ///
    /// Generational: once an entity is removed, its key stays invalid even if
    /// the slot is reused.
    pub struct EntityKey;
}

/// Process-unique id of an active system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SystemId(u64);

impl SystemId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SystemId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id
    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Global rules of a system: behaviors run once per tick against the whole system
#[derive(Default)]
pub struct SystemDefinition {
    behaviors: Vec<Box<dyn Behavior>>,
}

impl SystemDefinition {
    /// Create a definition without behaviors
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a global behavior
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behaviors.push(Box::new(behavior));
        self
    }

    /// Append a boxed global behavior
    pub fn push(&mut self, behavior: Box<dyn Behavior>) {
        self.behaviors.push(behavior);
    }

    /// Number of global behaviors
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Whether there are no global behaviors
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

/// A live, mutable container of entities
pub struct ActiveSystem {
    id: SystemId,
    origin: Vec3,
    entities: SlotMap<EntityKey, Entity>,
    /// Simulated milliseconds since creation
    lifetime: f64,
    /// Updates since creation or the last lifetime reset
    ticks: u64,
    definition: SystemDefinition,
}

impl ActiveSystem {
    /// Create an empty system at `origin` with no global behaviors
    pub fn new(origin: Vec3) -> Self {
        Self::with_definition(origin, SystemDefinition::new())
    }

    /// Create an empty system at `origin` driven by `definition`
    pub fn with_definition(origin: Vec3, definition: SystemDefinition) -> Self {
        Self {
            id: SystemId::next(),
            origin,
            entities: SlotMap::with_key(),
            lifetime: 0.0,
            ticks: 0,
            definition,
        }
    }

    /// Unique id of this system
    #[inline]
    pub fn id(&self) -> SystemId {
        self.id
    }

    /// Origin of this system's reference frame
    ///
    /// Returned by value; the live origin cannot be changed through it.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    // --- Membership ---

    /// Add an entity, returning its key
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityKey {
        entity.set_system(Some(self.id));
        self.entities.insert(entity)
    }

    /// Add several entities, returning their keys in order
    pub fn add_entities(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<EntityKey> {
        entities.into_iter().map(|e| self.add_entity(e)).collect()
    }

    /// Remove an entity and hand it back, detached
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let mut entity = self.entities.remove(key)?;
        entity.set_system(None);
        Some(entity)
    }

    /// Remove several entities atomically
    ///
    /// Fails without removing anything if any key is unknown or repeated.
    pub fn remove_entities(&mut self, keys: &[EntityKey]) -> Result<Vec<Entity>, SimError> {
        for (i, key) in keys.iter().enumerate() {
            if !self.entities.contains_key(*key) {
                return Err(SimError::invariant(format!("entity {:?} is not in this system", key)));
            }
            if keys[..i].contains(key) {
                return Err(SimError::invariant(format!("entity {:?} listed twice", key)));
            }
        }
        Ok(keys.iter().filter_map(|key| self.remove_entity(*key)).collect())
    }

    /// Whether the key refers to a live entity of this system
    #[inline]
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// Get an entity by key
    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Get an entity by key for component access
    ///
    /// Membership itself can only change through add/remove.
    pub fn entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Iterate over keys and entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Snapshot of all entity keys
    ///
    /// Safe to iterate while adding or removing entities.
    pub fn keys(&self) -> Vec<EntityKey> {
        self.entities.keys().collect()
    }

    /// Snapshot of the keys of entities with a component satisfying `kind`
    pub fn keys_with(&self, kind: ComponentKind) -> Vec<EntityKey> {
        self.entities
            .iter()
            .filter(|(_, e)| e.has(&[kind]))
            .map(|(k, _)| k)
            .collect()
    }

    /// Keys and flags of every dirty entity, clearing the flags
    ///
    /// Nested systems keep their own flags.
    pub fn take_dirty(&mut self) -> Vec<(EntityKey, DirtyFlags)> {
        self.entities
            .iter_mut()
            .filter(|(_, e)| e.is_dirty())
            .map(|(key, e)| {
                let flags = e.dirty_flags();
                e.clear_dirty();
                (key, flags)
            })
            .collect()
    }

    /// Number of entities directly in this system
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether this system holds no entities directly
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities in this system and all nested systems
    pub fn total_len(&self) -> usize {
        self.entities
            .values()
            .map(|e| 1 + e.get::<NestedSystem>().map_or(0, |n| n.system().total_len()))
            .sum()
    }

    /// Whether no leaf entity remains anywhere in the tree
    ///
    /// Entities that only carry an exhausted nested system do not count.
    pub fn is_exhausted(&self) -> bool {
        self.entities.values().all(|e| {
            e.component_count() == 1
                && e.get::<NestedSystem>()
                    .is_some_and(|nested| nested.system().is_exhausted())
        })
    }

    // --- Lifetime ---

    /// Simulated milliseconds since creation
    #[inline]
    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    /// Updates run since creation or the last [`reset_lifetime`](Self::reset_lifetime)
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the current update is the first one since creation or reset
    ///
    /// Also true before any update ran. Counted in updates rather than
    /// milliseconds, so a system whose first update has a non-zero `dt`
    /// (a nested system added while the scheduler runs) still initializes.
    #[inline]
    pub fn is_first_tick(&self) -> bool {
        self.ticks <= 1
    }

    /// Start an update of `dt` milliseconds; entities are advanced separately
    pub fn increment_lifetime(&mut self, dt: f64) {
        self.lifetime += dt;
        self.ticks += 1;
    }

    /// Reset lifetime to zero, re-arming initialization behaviors and sources
    pub fn reset_lifetime(&mut self) {
        self.lifetime = 0.0;
        self.ticks = 0;
    }

    // --- Behaviors ---

    /// The global behaviors of this system
    pub fn definition(&self) -> &SystemDefinition {
        &self.definition
    }

    /// Add a global behavior
    pub fn add_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.definition.push(Box::new(behavior));
    }

    /// Run every global behavior once, in order
    ///
    /// A failing behavior does not stop the others; every failure is logged
    /// and the first one is returned.
    pub fn run_behaviors(&mut self, host: &mut dyn Host, dt: f64) -> Result<(), SimError> {
        let mut behaviors = std::mem::take(&mut self.definition.behaviors);
        let mut first_error = None;

        for behavior in behaviors.iter_mut() {
            if let Err(e) = behavior.behave(host, dt, self, Target::System) {
                log::error!("Global behavior failed in system {}: {}", self.id.get(), e);
                first_error.get_or_insert(e);
            }
        }

        // Keep behaviors registered while running
        behaviors.append(&mut self.definition.behaviors);
        self.definition.behaviors = behaviors;

        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for ActiveSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSystem")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("entities", &self.entities.len())
            .field("lifetime", &self.lifetime)
            .field("ticks", &self.ticks)
            .field("behaviors", &self.definition.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::FnBehavior;
    use crate::host::NullHost;
    use crate::traits::Motion;

    fn entity() -> Entity {
        Entity::new().with(Motion::default()).unwrap()
    }

    #[test]
    fn test_system_ids_are_unique() {
        let a = ActiveSystem::new(Vec3::ZERO);
        let b = ActiveSystem::new(Vec3::ZERO);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_origin_is_a_copy() {
        let system = ActiveSystem::new(Vec3::new(1.0, 2.0, 3.0));
        let mut origin = system.origin();
        origin.x = 100.0;
        assert_eq!(system.origin(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_add_sets_back_reference() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let key = system.add_entity(entity());
        assert_eq!(system.entity(key).unwrap().system(), Some(system.id()));
        assert_eq!(system.len(), 1);
    }

    #[test]
    fn test_remove_clears_back_reference() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let key = system.add_entity(entity());
        let removed = system.remove_entity(key).unwrap();
        assert_eq!(removed.system(), None);
        assert!(!system.contains(key));
        assert!(system.remove_entity(key).is_none());
    }

    #[test]
    fn test_remove_entities_is_atomic() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let keys = system.add_entities(vec![entity(), entity()]);
        let gone = system.add_entity(entity());
        system.remove_entity(gone);

        let result = system.remove_entities(&[keys[0], gone]);
        assert!(matches!(result, Err(SimError::Invariant(_))));
        assert_eq!(system.len(), 2);

        let result = system.remove_entities(&[keys[0], keys[0]]);
        assert!(result.is_err());
        assert_eq!(system.len(), 2);

        let removed = system.remove_entities(&keys).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(system.is_empty());
    }

    #[test]
    fn test_keys_with_filters_by_kind() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let with_motion = system.add_entity(entity());
        system.add_entity(Entity::new());
        assert_eq!(system.keys_with(ComponentKind::of::<Motion>()), vec![with_motion]);
        assert_eq!(system.keys().len(), 2);
    }

    #[test]
    fn test_take_dirty_clears_flags() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let fresh = system.add_entity(entity());
        let quiet = system.add_entity(entity());
        system.entity_mut(quiet).unwrap().clear_dirty();

        assert_eq!(system.take_dirty(), vec![(fresh, DirtyFlags::ALL)]);
        assert!(system.take_dirty().is_empty());

        system.entity_mut(quiet).unwrap().mark_dirty(DirtyFlags::MOTION);
        assert_eq!(system.take_dirty(), vec![(quiet, DirtyFlags::MOTION)]);
    }

    #[test]
    fn test_lifetime() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        assert!(system.is_first_tick());
        system.increment_lifetime(50.0);
        assert!(system.is_first_tick());
        system.increment_lifetime(50.0);
        assert_eq!(system.lifetime(), 100.0);
        assert_eq!(system.ticks(), 2);
        assert!(!system.is_first_tick());

        system.reset_lifetime();
        assert_eq!(system.lifetime(), 0.0);
        assert_eq!(system.ticks(), 0);
        system.increment_lifetime(50.0);
        assert!(system.is_first_tick());
    }

    #[test]
    fn test_nested_counts_and_exhaustion() {
        let mut inner = ActiveSystem::new(Vec3::new(0.0, 10.0, 0.0));
        assert!(inner.is_exhausted());
        let inner_key = inner.add_entity(entity());

        let mut outer = ActiveSystem::new(Vec3::ZERO);
        outer.add_entity(Entity::new().with(NestedSystem::new(inner)).unwrap());
        assert_eq!(outer.len(), 1);
        assert_eq!(outer.total_len(), 2);
        assert!(!outer.is_exhausted());

        let carrier = outer.keys()[0];
        outer
            .entity_mut(carrier)
            .and_then(|e| e.get_mut::<NestedSystem>())
            .unwrap()
            .system_mut()
            .remove_entity(inner_key);
        assert!(outer.is_exhausted());
        assert!(!outer.is_empty());
    }

    #[test]
    fn test_carrier_with_other_components_is_not_exhausted() {
        let mut outer = ActiveSystem::new(Vec3::ZERO);
        let rocket = outer.add_entity(
            Entity::new()
                .with(Motion::default().with_velocity(Vec3::new(0.0, 5.0, 0.0)))
                .unwrap()
                .with(NestedSystem::new(ActiveSystem::new(Vec3::ZERO)))
                .unwrap(),
        );
        assert!(!outer.is_exhausted());

        outer
            .entity_mut(rocket)
            .unwrap()
            .remove(&[ComponentKind::of::<Motion>()])
            .unwrap();
        assert!(outer.is_exhausted());
    }

    #[test]
    fn test_run_behaviors_in_order_and_keeps_them() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        system.add_behavior(FnBehavior::new(|_, _, system: &mut ActiveSystem, _| {
            system.add_entity(Entity::new());
            Ok(())
        }));
        system.add_behavior(FnBehavior::new(|_, _, system: &mut ActiveSystem, _| {
            // sees the entity spawned by the first behavior
            if system.len() % 2 == 1 {
                system.add_entity(Entity::new());
            }
            Ok(())
        }));

        system.run_behaviors(&mut NullHost, 50.0).unwrap();
        assert_eq!(system.len(), 2);
        system.run_behaviors(&mut NullHost, 50.0).unwrap();
        assert_eq!(system.len(), 4);
        assert_eq!(system.definition().len(), 2);
    }

    #[test]
    fn test_failing_behavior_does_not_stop_others() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        system.add_behavior(FnBehavior::new(|_, _, _: &mut ActiveSystem, _| {
            Err(SimError::argument("boom"))
        }));
        system.add_behavior(FnBehavior::new(|_, _, system: &mut ActiveSystem, _| {
            system.add_entity(Entity::new());
            Ok(())
        }));

        let result = system.run_behaviors(&mut NullHost, 0.0);
        assert_eq!(result, Err(SimError::argument("boom")));
        assert_eq!(system.len(), 1);
    }
}
