use objsim_core::{ActiveSystem, EntityKey, SimError};
use crate::renderer::{RenderContext, Renderer};

/// Ages every entity by one tick and removes the expired ones
///
/// An entity with threshold `n` survives `n` ticks and is removed on the
/// next one.
#[derive(Clone, Copy, Debug, Default)]
pub struct LifetimeRenderer;

impl LifetimeRenderer {
    pub const PRIORITY: i32 = 0;
}

impl Renderer for LifetimeRenderer {
    fn name(&self) -> &str {
        "lifetime"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn render(
        &mut self,
        _ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let Some(entity) = system.entity_mut(key) else {
            return Ok(());
        };
        if entity.is_expired() {
            log::trace!("Entity {:?} expired after {} ticks", key, entity.lifetime());
            system.remove_entity(key);
        } else {
            entity.increment_lifetime();
        }
        Ok(())
    }
}
