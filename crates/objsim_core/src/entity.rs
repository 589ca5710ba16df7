//! Entity type
//!
//! An Entity is an ordered bag of components plus a tick counter, an optional
//! expiration threshold, and the id of the active system holding it.

use bitflags::bitflags;
use crate::component::{Component, ComponentKind, Query};
use crate::dependency;
use crate::error::SimError;
use crate::system::SystemId;

bitflags! {
    /// Flags indicating which parts of an entity changed since the host last looked
    ///
    /// Hosts mirroring entities into an external world use these to skip
    /// entities that did not move or change shape.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Components were attached or detached
        const COMPONENTS = 1 << 0;
        /// Position or velocity was advanced by a physics renderer
        const MOTION = 1 << 1;
        /// All flags set
        const ALL = Self::COMPONENTS.bits() | Self::MOTION.bits();
    }
}

/// A simulated object
///
/// Components are kept in insertion order. The component set only changes
/// through [`Entity::add`] and [`Entity::remove`], which validate dependencies
/// before touching anything.
pub struct Entity {
    components: Vec<Box<dyn Component>>,
    /// Ticks survived so far
    lifetime: u64,
    /// Remove once `lifetime` reaches this many ticks
    expires_after: Option<u64>,
    system: Option<SystemId>,
    dirty: DirtyFlags,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    /// Create an entity without components
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            lifetime: 0,
            expires_after: None,
            system: None,
            dirty: DirtyFlags::ALL, // New entities are dirty
        }
    }

    /// Create an entity holding `components`
    pub fn with_components(components: Vec<Box<dyn Component>>) -> Result<Self, SimError> {
        let mut entity = Self::new();
        entity.add(components)?;
        Ok(entity)
    }

    /// Builder form of [`Entity::add`] for a single component
    pub fn with(mut self, component: impl Component) -> Result<Self, SimError> {
        self.add(vec![Box::new(component)])?;
        Ok(self)
    }

    /// Expire after the given number of ticks
    pub fn with_expiration(mut self, ticks: u64) -> Self {
        self.expires_after = Some(ticks);
        self
    }

    // --- Component set ---

    fn views(&self) -> Vec<&dyn Component> {
        self.components.iter().map(|c| &**c).collect()
    }

    /// Attach components atomically
    ///
    /// Either every component is attached or, on a dependency or duplicate
    /// violation, none is and the entity is unchanged.
    pub fn add(&mut self, components: Vec<Box<dyn Component>>) -> Result<(), SimError> {
        if components.is_empty() {
            return Ok(());
        }
        let new: Vec<&dyn Component> = components.iter().map(|c| &**c).collect();
        dependency::check_attach(&self.views(), &new)?;

        self.components.extend(components);
        self.mark_dirty(DirtyFlags::COMPONENTS);
        Ok(())
    }

    /// Detach the first component satisfying each kind, atomically
    ///
    /// Fails without changes if a kind matches nothing, or if a remaining
    /// component would lose one of its requirements. Returns the detached
    /// components in the order of `kinds`.
    pub fn remove(&mut self, kinds: &[ComponentKind]) -> Result<Vec<Box<dyn Component>>, SimError> {
        let mut indices = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let index = self
                .components
                .iter()
                .enumerate()
                .find(|(i, c)| !indices.contains(i) && c.satisfies(kind))
                .map(|(i, _)| i)
                .ok_or_else(|| {
                    SimError::invariant(format!("no {} component attached", kind.short_name()))
                })?;
            indices.push(index);
        }
        dependency::check_detach(&self.views(), &indices)?;

        // Pull out back-to-front so earlier indices stay valid
        let mut order: Vec<usize> = (0..indices.len()).collect();
        order.sort_by(|a, b| indices[*b].cmp(&indices[*a]));
        let mut removed: Vec<Option<Box<dyn Component>>> =
            (0..indices.len()).map(|_| None).collect();
        for slot in order {
            removed[slot] = Some(self.components.remove(indices[slot]));
        }

        if !indices.is_empty() {
            self.mark_dirty(DirtyFlags::COMPONENTS);
        }
        Ok(removed.into_iter().flatten().collect())
    }

    /// Detach and downcast a single concrete component
    pub fn take<T: Component>(&mut self) -> Result<Box<T>, SimError> {
        let mut removed = self.remove(&[ComponentKind::of::<T>()])?;
        let boxed = removed
            .pop()
            .ok_or_else(|| SimError::invariant("component vanished during removal"))?;
        boxed
            .into_any()
            .downcast::<T>()
            .map_err(|_| SimError::invariant("detached component had an unexpected type"))
    }

    /// Whether every kind resolves to some component
    pub fn has(&self, kinds: &[ComponentKind]) -> bool {
        kinds
            .iter()
            .all(|&kind| self.components.iter().any(|c| c.satisfies(kind)))
    }

    /// Whether some component satisfies the query type
    pub fn has_a<T: Query + ?Sized>(&self) -> bool {
        self.has(&[T::query_kind()])
    }

    /// First component matching `T`, in insertion order
    pub fn get<T: Query + ?Sized>(&self) -> Option<&T> {
        self.components.iter().find_map(|c| T::view(&**c))
    }

    /// Mutable access to the first component matching `T`
    pub fn get_mut<T: Query + ?Sized>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(|c| T::view_mut(&mut **c))
    }

    /// Iterate over all components in insertion order
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| &**c)
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    // --- Lifetime ---

    /// Ticks this entity has survived
    #[inline]
    pub fn lifetime(&self) -> u64 {
        self.lifetime
    }

    /// Advance the tick counter by one
    ///
    /// Driven by the lifetime renderer once per tick.
    pub fn increment_lifetime(&mut self) {
        self.lifetime += 1;
    }

    /// Expiration threshold in ticks, if any
    #[inline]
    pub fn expires_after(&self) -> Option<u64> {
        self.expires_after
    }

    /// Change the expiration threshold
    pub fn set_expiration(&mut self, ticks: Option<u64>) {
        self.expires_after = ticks;
    }

    /// Whether the lifetime reached the expiration threshold
    pub fn is_expired(&self) -> bool {
        self.expires_after.is_some_and(|limit| self.lifetime >= limit)
    }

    // --- System membership ---

    /// Id of the active system holding this entity
    #[inline]
    pub fn system(&self) -> Option<SystemId> {
        self.system
    }

    pub(crate) fn set_system(&mut self, system: Option<SystemId>) {
        self.system = system;
    }

    // --- Dirty tracking ---

    /// Check if this entity has any dirty flags set
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Get the current dirty flags
    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Mark this entity as dirty with the given flags
    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    /// Clear all dirty flags
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.components.iter().map(|c| c.kind().short_name()).collect();
        f.debug_struct("Entity")
            .field("components", &kinds)
            .field("lifetime", &self.lifetime)
            .field("expires_after", &self.expires_after)
            .field("system", &self.system)
            .finish()
    }
}
