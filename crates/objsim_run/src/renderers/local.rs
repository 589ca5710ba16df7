use objsim_core::traits::{LocalBehavior, RuleSet};
use objsim_core::{ActiveSystem, ComponentKind, EntityKey, SimError, Target};
use crate::renderer::{RenderContext, Renderer};

/// Runs each entity's [`LocalBehavior`] against that entity
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalBehaviorRenderer;

impl LocalBehaviorRenderer {
    pub const PRIORITY: i32 = 60;
}

impl Renderer for LocalBehaviorRenderer {
    fn name(&self) -> &str {
        "local_behavior"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn object_kind(&self) -> Option<ComponentKind> {
        Some(ComponentKind::of::<LocalBehavior>())
    }

    fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let Some(mut behavior) = system
            .entity_mut(key)
            .and_then(|e| e.get_mut::<LocalBehavior>())
            .and_then(|local| local.take())
        else {
            return Ok(());
        };

        let result = behavior.behave(&mut *ctx.host, ctx.dt, system, Target::Entity(key));

        // The behavior may have removed its entity or detached the component
        if let Some(local) = system.entity_mut(key).and_then(|e| e.get_mut::<LocalBehavior>()) {
            local.restore(behavior);
        }
        result
    }
}

/// Runs the rules of each entity's [`RuleSet`] against that entity
///
/// Stops early once a rule removes the entity.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleRenderer;

impl RuleRenderer {
    pub const PRIORITY: i32 = 70;
}

impl Renderer for RuleRenderer {
    fn name(&self) -> &str {
        "rule"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn object_kind(&self) -> Option<ComponentKind> {
        Some(ComponentKind::of::<RuleSet>())
    }

    fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError> {
        let Some(rules) = system
            .entity(key)
            .and_then(|e| e.get::<RuleSet>())
            .map(|set| set.rules())
        else {
            return Ok(());
        };

        for rule in rules.iter() {
            if !system.contains(key) {
                break;
            }
            rule.run(ctx.dt, system, key)?;
        }
        Ok(())
    }
}
