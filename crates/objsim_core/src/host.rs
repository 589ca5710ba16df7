//! Host boundary
//!
//! Everything the engine needs from the world it runs in: somewhere to send
//! particle and firework effects, and externally owned entities that a
//! [`Delegate`](crate::traits::Delegate) component can drive.

use serde::{Serialize, Deserialize};
use objsim_math::Vec3;

/// Visual particle effect requested by a particle emitter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleEffect {
    /// Host-specific effect name
    pub name: String,
    /// Particles per spawn
    pub count: u32,
    /// Random spread around the spawn point, in blocks
    pub spread: Vec3,
    /// Speed of the spawned particles
    pub speed: f64,
}

impl Default for ParticleEffect {
    fn default() -> Self {
        Self {
            name: "cloud".to_string(),
            count: 1,
            spread: Vec3::ZERO,
            speed: 0.0,
        }
    }
}

impl ParticleEffect {
    /// Effect with the given name and defaults elsewhere
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the particle count
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the spread
    pub fn with_spread(mut self, spread: Vec3) -> Self {
        self.spread = spread;
        self
    }
}

/// Shape of a firework burst
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Burst {
    #[default]
    Ball,
    LargeBall,
    Star,
    Burst,
    Creeper,
}

/// Firework effect requested by a firework emitter
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FireworkEffect {
    pub burst: Burst,
    /// RGB colors
    pub colors: Vec<[u8; 3]>,
    pub flicker: bool,
    pub trail: bool,
}

impl FireworkEffect {
    pub fn new(burst: Burst) -> Self {
        Self {
            burst,
            ..Default::default()
        }
    }

    /// Add a color
    pub fn with_color(mut self, rgb: [u8; 3]) -> Self {
        self.colors.push(rgb);
        self
    }

    pub fn with_trail(mut self, trail: bool) -> Self {
        self.trail = trail;
        self
    }

    pub fn with_flicker(mut self, flicker: bool) -> Self {
        self.flicker = flicker;
        self
    }
}

/// The world the simulation runs in
///
/// Positions passed here are absolute world coordinates. Both methods default
/// to doing nothing so hosts only implement what they can display.
pub trait Host {
    fn spawn_particle(&mut self, _effect: &ParticleEffect, _position: Vec3) {}
    fn spawn_firework(&mut self, _effect: &FireworkEffect, _position: Vec3) {}
}

/// Host that discards every effect
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHost;

impl Host for NullHost {}

/// An entity owned by the host that the simulation can move
///
/// Positions are absolute world coordinates, velocities are blocks per second.
pub trait ExternalEntity {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    /// Whether the host still knows this entity
    ///
    /// Invalid delegates are removed by the invalid-delegate renderer.
    fn is_valid(&self) -> bool;
}
