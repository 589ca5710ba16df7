use objsim_core::traits::{Delegate, Motion};
use objsim_core::{ActiveSystem, ComponentKind, DirtyFlags, EntityKey, Physical, SimError};
use crate::renderer::{RenderContext, Renderer};

/// Advance a position by one tick of its velocity; returns whether it moved
fn integrate(physical: &mut dyn Physical, dt: f64) -> bool {
    let step = physical.velocity() * (dt / 1000.0);
    if step == objsim_core::Vec3::ZERO {
        return false;
    }
    let position = physical.position();
    physical.set_position(position + step);
    true
}

/// Moves [`Motion`] components by their velocity
#[derive(Clone, Copy, Debug, Default)]
pub struct StandalonePhysicsRenderer;

impl StandalonePhysicsRenderer {
    pub const PRIORITY: i32 = 10;
}

impl Renderer for StandalonePhysicsRenderer {
    fn name(&self) -> &str {
        "standalone_physics"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn object_kind(&self) -> Option<ComponentKind> {
        Some(ComponentKind::of::<Motion>())
    }

    fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let Some(entity) = system.entity_mut(key) else {
            return Ok(());
        };
        let moved = entity
            .get_mut::<Motion>()
            .is_some_and(|motion| integrate(motion, ctx.dt));
        if moved {
            entity.mark_dirty(DirtyFlags::MOTION);
        }
        Ok(())
    }
}

/// Moves [`Delegate`] components by their velocity, through the host entity
///
/// Also keeps each delegate's frame in sync with the system it is rendered in.
#[derive(Clone, Copy, Debug, Default)]
pub struct DelegatedPhysicsRenderer;

impl DelegatedPhysicsRenderer {
    pub const PRIORITY: i32 = 20;
}

impl Renderer for DelegatedPhysicsRenderer {
    fn name(&self) -> &str {
        "delegated_physics"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn object_kind(&self) -> Option<ComponentKind> {
        Some(ComponentKind::of::<Delegate>())
    }

    fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let Some(entity) = system.entity_mut(key) else {
            return Ok(());
        };
        let Some(delegate) = entity.get_mut::<Delegate>() else {
            return Ok(());
        };
        if !delegate.is_valid() {
            // left for the invalid-delegate renderer
            return Ok(());
        }
        delegate.set_frame(ctx.frame);
        if integrate(delegate, ctx.dt) {
            entity.mark_dirty(DirtyFlags::MOTION);
        }
        Ok(())
    }
}

/// Removes entities whose host entity is gone
#[derive(Clone, Copy, Debug, Default)]
pub struct InvalidDelegateRenderer;

impl InvalidDelegateRenderer {
    pub const PRIORITY: i32 = 50;
}

impl Renderer for InvalidDelegateRenderer {
    fn name(&self) -> &str {
        "invalid_delegate"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn object_kind(&self) -> Option<ComponentKind> {
        Some(ComponentKind::of::<Delegate>())
    }

    fn render(
        &mut self,
        _ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let invalid = system
            .entity(key)
            .and_then(|e| e.get::<Delegate>())
            .is_some_and(|d| !d.is_valid());
        if invalid {
            log::debug!("Removing entity {:?} with invalid delegate", key);
            system.remove_entity(key);
        }
        Ok(())
    }
}
