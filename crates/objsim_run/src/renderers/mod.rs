//! Built-in renderers
//!
//! Default pipeline, in run order:
//!
//! | priority | renderer                      | visits              |
//! |----------|-------------------------------|---------------------|
//! | 0        | [`LifetimeRenderer`]          | every entity        |
//! | 10       | [`StandalonePhysicsRenderer`] | [`Motion`]          |
//! | 20       | [`DelegatedPhysicsRenderer`]  | [`Delegate`]        |
//! | 30       | [`ParticleRenderer`]          | [`ParticleEmitter`] |
//! | 40       | [`FireworkRenderer`]          | [`FireworkEmitter`] |
//! | 50       | [`InvalidDelegateRenderer`]   | [`Delegate`]        |
//!
//! [`LocalBehaviorRenderer`] (60) and [`RuleRenderer`] (70) are opt-in.
//!
//! [`Motion`]: objsim_core::traits::Motion
//! [`Delegate`]: objsim_core::traits::Delegate
//! [`ParticleEmitter`]: objsim_core::traits::ParticleEmitter
//! [`FireworkEmitter`]: objsim_core::traits::FireworkEmitter

mod lifetime;
mod physics;
mod emitter;
mod local;

use serde::{Serialize, Deserialize};
use crate::renderer::{Renderer, RendererPipeline};

pub use lifetime::LifetimeRenderer;
pub use physics::{StandalonePhysicsRenderer, DelegatedPhysicsRenderer, InvalidDelegateRenderer};
pub use emitter::{ParticleRenderer, FireworkRenderer};
pub use local::{LocalBehaviorRenderer, RuleRenderer};

/// Names of the built-in renderers, as used in configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Lifetime,
    StandalonePhysics,
    DelegatedPhysics,
    Particle,
    Firework,
    InvalidDelegate,
    LocalBehavior,
    Rule,
}

impl RendererKind {
    /// The renderers of [`RendererPipeline::with_defaults`]
    pub const DEFAULTS: [RendererKind; 6] = [
        RendererKind::Lifetime,
        RendererKind::StandalonePhysics,
        RendererKind::DelegatedPhysics,
        RendererKind::Particle,
        RendererKind::Firework,
        RendererKind::InvalidDelegate,
    ];

    /// Instantiate the renderer
    pub fn build(self) -> Box<dyn Renderer> {
        match self {
            RendererKind::Lifetime => Box::new(LifetimeRenderer),
            RendererKind::StandalonePhysics => Box::new(StandalonePhysicsRenderer),
            RendererKind::DelegatedPhysics => Box::new(DelegatedPhysicsRenderer),
            RendererKind::Particle => Box::new(ParticleRenderer),
            RendererKind::Firework => Box::new(FireworkRenderer),
            RendererKind::InvalidDelegate => Box::new(InvalidDelegateRenderer),
            RendererKind::LocalBehavior => Box::new(LocalBehaviorRenderer),
            RendererKind::Rule => Box::new(RuleRenderer),
        }
    }
}

impl RendererPipeline {
    /// Pipeline holding the given built-in renderers
    pub fn from_kinds(kinds: &[RendererKind]) -> Self {
        let mut pipeline = Self::new();
        for kind in kinds {
            pipeline.add(kind.build());
        }
        pipeline
    }

    /// Pipeline holding the default built-in renderers
    pub fn with_defaults() -> Self {
        Self::from_kinds(&RendererKind::DEFAULTS)
    }
}
