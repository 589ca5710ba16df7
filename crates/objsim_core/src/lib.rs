//! Core types for the objsim engine
//!
//! This crate provides everything a simulation is made of:
//!
//! - [`Component`] - Typed data fragment with declared dependencies
//! - [`Entity`] - Ordered bag of components with a tick counter
//! - [`ActiveSystem`] - Container of entities anchored at an origin
//! - [`EntityKey`] - Generational key to an entity in a system
//! - [`Modifier`] / [`Applier`] / [`Rule`] - Compute a delta, then apply it
//! - [`Behavior`] / [`Source`] - Per-tick logic and entity spawning
//! - [`Host`] - Boundary to the world the simulation runs in

mod error;
mod component;
mod dependency;
mod entity;
mod system;
pub mod host;
pub mod modifier;
pub mod applier;
pub mod rule;
pub mod behavior;
pub mod source;
pub mod traits;

pub use error::SimError;
pub use component::{Component, ComponentKind, Physical, Query, AsAny};
pub use dependency::{check_attach, check_detach, resolve};
pub use entity::{Entity, DirtyFlags};
pub use system::{ActiveSystem, SystemDefinition, SystemId, EntityKey};
pub use host::{Host, NullHost, ExternalEntity, ParticleEffect, FireworkEffect};
pub use modifier::Modifier;
pub use applier::{Applier, Verdict};
pub use rule::{Rule, DynRule};
pub use behavior::{Behavior, Target};
pub use source::Source;

// Re-export geometry for convenience
pub use objsim_math::{Vec3, Shape, ForceLaw};
