//! Fountain demo scenario
//!
//! A burst of particle emitters is launched upward on the first tick, pulled
//! down by gravity, pushed sideways by a wind that fades with height, and
//! removed once they fall through the floor. Above the fountain a nested
//! system holds a ring of firework emitters held in place by a spring.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use objsim_core::applier::{ExistenceApplier, VelocityApplier};
use objsim_core::behavior::{RuleBehavior, SourceBehavior};
use objsim_core::modifier::{
    AccelerationModifier, ConstantModifier, DragModifier, ForceModifier, ShapedModifier,
    WeightedVectorLengthModifier,
};
use objsim_core::source::{InitializationSource, SpawnSource};
use objsim_core::traits::{FireworkEmitter, Motion, NestedSystem, ParticleEmitter, RuleSet};
use objsim_core::{
    ActiveSystem, DynRule, Entity, FireworkEffect, ForceLaw, ParticleEffect, Physical, Rule, Shape,
    SimError, SystemDefinition, Vec3,
};
use objsim_core::host::Burst;
use crate::config::DemoConfig;

/// World position of the fountain
pub const FOUNTAIN_ORIGIN: Vec3 = Vec3::new(0.0, 64.0, 0.0);

/// Particles live at most this many ticks
const PARTICLE_TICKS: u64 = 100;
/// Fireworks live at most this many ticks
const FIREWORK_TICKS: u64 = 60;
const FIREWORK_COUNT: usize = 4;

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

fn particle(rng: &mut StdRng) -> Result<Entity, SimError> {
    let velocity = Vec3::new(
        rng.gen_range(-2.0..2.0),
        rng.gen_range(6.0..10.0),
        rng.gen_range(-2.0..2.0),
    );
    let emitter = ParticleEmitter::new(ParticleEffect::named("flame").with_count(2), 4.0)?;
    Entity::new()
        .with(Motion::at(Vec3::ZERO).with_velocity(velocity))?
        .with(emitter)
        .map(|e| e.with_expiration(PARTICLE_TICKS))
}

fn fountain_definition(config: &DemoConfig) -> SystemDefinition {
    let mut rng = rng_for(config.seed);
    let launch = SpawnSource::new(config.particles, move || particle(&mut rng));

    let gravity: Rule<dyn Physical, _> =
        Rule::new(AccelerationModifier::gravity(20.0), VelocityApplier);

    // full strength at the nozzle, gone 10 blocks up
    let wind: Rule<dyn Physical, _> = Rule::new(
        WeightedVectorLengthModifier::new(
            AccelerationModifier::new(Vec3::new(3.0, 0.0, 0.0)),
            |p: Vec3| 1.0 - p.y / 10.0,
        ),
        VelocityApplier,
    );

    let floor = Shape::cuboid(Vec3::new(-64.0, -64.0, -64.0), Vec3::new(64.0, -1.0, 64.0));
    let below_floor: Rule<dyn Physical, bool> = Rule::new(
        ShapedModifier::inside(ConstantModifier(false), floor, true),
        ExistenceApplier,
    );

    SystemDefinition::new()
        .with_behavior(SourceBehavior::new(InitializationSource::new(launch)))
        .with_behavior(RuleBehavior::new(gravity))
        .with_behavior(RuleBehavior::new(wind))
        .with_behavior(RuleBehavior::new(below_floor))
}

fn firework_ring() -> Result<ActiveSystem, SimError> {
    let mut ring = ActiveSystem::new(Vec3::new(0.0, 20.0, 0.0));
    let colors = [[255, 64, 64], [64, 255, 64], [64, 64, 255], [255, 255, 64]];

    for (i, color) in colors.iter().enumerate().take(FIREWORK_COUNT) {
        let angle = i as f64 * std::f64::consts::TAU / FIREWORK_COUNT as f64;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * 4.0;

        let spring: Rule<dyn Physical, _> = Rule::new(
            ForceModifier::new(Vec3::ZERO, 2.0, ForceLaw::Proportional),
            VelocityApplier,
        );
        let damping: Rule<dyn Physical, _> = Rule::new(DragModifier::new(0.5), VelocityApplier);
        let rules: Vec<Box<dyn DynRule>> = vec![Box::new(spring), Box::new(damping)];

        let effect = FireworkEffect::new(Burst::Star).with_color(*color).with_trail(true);
        let entity = Entity::new()
            .with(Motion::at(position).with_velocity(Vec3::new(0.0, 0.0, 1.0)))?
            .with(FireworkEmitter::new(effect, 8.0)?)?
            .with(RuleSet::new(rules))?
            .with_expiration(FIREWORK_TICKS);
        ring.add_entity(entity);
    }
    Ok(ring)
}

/// Build the fountain system tree
pub fn build_fountain(config: &DemoConfig) -> Result<ActiveSystem, SimError> {
    let mut fountain = ActiveSystem::with_definition(FOUNTAIN_ORIGIN, fountain_definition(config));
    fountain.add_entity(Entity::new().with(NestedSystem::new(firework_ring()?))?);
    Ok(fountain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use objsim_core::NullHost;
    use objsim_run::{ManualClock, RendererPipeline, RendererKind, Scheduler, SchedulerConfig};

    fn seeded(particles: usize) -> DemoConfig {
        DemoConfig {
            particles,
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_fountain_layout() {
        let fountain = build_fountain(&seeded(8)).unwrap();
        assert_eq!(fountain.origin(), FOUNTAIN_ORIGIN);
        assert_eq!(fountain.len(), 1);
        assert_eq!(fountain.total_len(), 1 + FIREWORK_COUNT);
        assert_eq!(fountain.definition().len(), 4);
    }

    #[test]
    fn test_fountain_launches_on_first_tick_and_runs_dry() {
        let mut kinds = RendererKind::DEFAULTS.to_vec();
        kinds.push(RendererKind::Rule);
        let config = SchedulerConfig {
            stop_when_empty: true,
            ..Default::default()
        };
        let mut scheduler = Scheduler::new(
            config,
            build_fountain(&seeded(8)).unwrap(),
            RendererPipeline::from_kinds(&kinds),
            ManualClock::default(),
        )
        .unwrap();
        scheduler.start();

        scheduler.poll(0, &mut NullHost).unwrap();
        assert_eq!(scheduler.system().total_len(), 1 + FIREWORK_COUNT + 8);

        // every particle and firework expires well within 200 ticks
        scheduler.poll(200 * 50, &mut NullHost).unwrap();
        assert!(!scheduler.is_active());
        assert!(scheduler.system().is_exhausted());
    }
}
