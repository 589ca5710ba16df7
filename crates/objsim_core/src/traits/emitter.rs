use crate::component::{Component, ComponentKind, Physical};
use crate::error::SimError;
use crate::host::{FireworkEffect, ParticleEffect};

/// Slowest emission rate, in ticks between spawns
const MAX_PERIOD: u64 = 10;

/// Ticks between two emissions for an emitter moving at `speed`
///
/// At or above `threshold` the emitter fires every tick. Below it the period
/// grows as speed drops, up to [`MAX_PERIOD`] ticks for an emitter at rest.
pub fn emission_period(speed: f64, threshold: f64) -> u64 {
    if speed >= threshold {
        return 1;
    }
    let floor = threshold / MAX_PERIOD as f64;
    let period = (threshold / speed.max(floor)).round();
    (period as u64).clamp(1, MAX_PERIOD)
}

/// Whether an emitter that has lived `lifetime` ticks fires this tick
pub fn should_emit(speed: f64, threshold: f64, lifetime: u64) -> bool {
    lifetime % emission_period(speed, threshold) == 0
}

fn check_threshold(threshold: f64) -> Result<(), SimError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(SimError::argument(format!(
            "speed threshold must be positive and finite, got {}",
            threshold
        )))
    }
}

/// Spawns a particle effect at its entity, more often the faster it moves
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleEmitter {
    pub effect: ParticleEffect,
    speed_threshold: f64,
}

impl ParticleEmitter {
    /// Create an emitter firing every tick at `speed_threshold` blocks/s or more
    pub fn new(effect: ParticleEffect, speed_threshold: f64) -> Result<Self, SimError> {
        check_threshold(speed_threshold)?;
        Ok(Self {
            effect,
            speed_threshold,
        })
    }

    pub fn speed_threshold(&self) -> f64 {
        self.speed_threshold
    }
}

impl Component for ParticleEmitter {
    fn requires(&self) -> Vec<ComponentKind> {
        vec![ComponentKind::of::<dyn Physical>()]
    }
}

/// Launches a firework at its entity, more often the faster it moves
#[derive(Clone, Debug, PartialEq)]
pub struct FireworkEmitter {
    pub effect: FireworkEffect,
    speed_threshold: f64,
}

impl FireworkEmitter {
    pub fn new(effect: FireworkEffect, speed_threshold: f64) -> Result<Self, SimError> {
        check_threshold(speed_threshold)?;
        Ok(Self {
            effect,
            speed_threshold,
        })
    }

    pub fn speed_threshold(&self) -> f64 {
        self.speed_threshold
    }
}

impl Component for FireworkEmitter {
    fn requires(&self) -> Vec<ComponentKind> {
        vec![ComponentKind::of::<dyn Physical>()]
    }
}
