use objsim_core::traits::{should_emit, FireworkEmitter, ParticleEmitter};
use objsim_core::{ActiveSystem, ComponentKind, EntityKey, Physical, SimError};
use crate::renderer::{RenderContext, Renderer};

/// Spawns particle effects, more often the faster the emitter moves
#[derive(Clone, Copy, Debug, Default)]
pub struct ParticleRenderer;

impl ParticleRenderer {
    pub const PRIORITY: i32 = 30;
}

impl Renderer for ParticleRenderer {
    fn name(&self) -> &str {
        "particle"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn object_kind(&self) -> Option<ComponentKind> {
        Some(ComponentKind::of::<ParticleEmitter>())
    }

    fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let Some(entity) = system.entity(key) else {
            return Ok(());
        };
        let (Some(emitter), Some(body)) =
            (entity.get::<ParticleEmitter>(), entity.get::<dyn Physical>())
        else {
            return Ok(());
        };
        if should_emit(body.speed(), emitter.speed_threshold(), entity.lifetime()) {
            let position = ctx.to_world(body.position());
            ctx.host.spawn_particle(&emitter.effect, position);
        }
        Ok(())
    }
}

/// Launches fireworks, more often the faster the emitter moves
#[derive(Clone, Copy, Debug, Default)]
pub struct FireworkRenderer;

impl FireworkRenderer {
    pub const PRIORITY: i32 = 40;
}

impl Renderer for FireworkRenderer {
    fn name(&self) -> &str {
        "firework"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn object_kind(&self) -> Option<ComponentKind> {
        Some(ComponentKind::of::<FireworkEmitter>())
    }

    fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let Some(entity) = system.entity(key) else {
            return Ok(());
        };
        let (Some(emitter), Some(body)) =
            (entity.get::<FireworkEmitter>(), entity.get::<dyn Physical>())
        else {
            return Ok(());
        };
        if should_emit(body.speed(), emitter.speed_threshold(), entity.lifetime()) {
            let position = ctx.to_world(body.position());
            ctx.host.spawn_firework(&emitter.effect, position);
        }
        Ok(())
    }
}
