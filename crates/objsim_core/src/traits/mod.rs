//! Built-in components
//!
//! - [`Motion`] - standalone position and velocity
//! - [`Delegate`] - position and velocity backed by a host entity
//! - [`ParticleEmitter`] / [`FireworkEmitter`] - speed-dependent effect emitters
//! - [`LocalBehavior`] - a behavior that runs against its own entity
//! - [`RuleSet`] - rules that run against their own entity
//! - [`NestedSystem`] - an active system carried by an entity

mod motion;
mod emitter;
mod local;
mod nested;

pub use motion::{Motion, Delegate};
pub use emitter::{ParticleEmitter, FireworkEmitter, emission_period, should_emit};
pub use local::{LocalBehavior, RuleSet};
pub use nested::NestedSystem;
