//! Runtime for the objsim engine
//!
//! This crate turns a static [`ActiveSystem`](objsim_core::ActiveSystem) into
//! a running simulation:
//!
//! - [`Renderer`] / [`RendererPipeline`] - Per-entity passes run every tick
//! - [`renderers`] - Built-in lifetime, physics, emitter, and cleanup passes
//! - [`Scheduler`] - Fixed-timestep driver with catch-up
//! - [`Clock`] / [`TickSource`] - Time and callback hooks into the host

pub mod renderer;
pub mod renderers;
pub mod scheduler;
pub mod clock;

pub use renderer::{Renderer, RendererPipeline, RenderContext};
pub use renderers::RendererKind;
pub use scheduler::{Scheduler, SchedulerConfig};
pub use clock::{Clock, MonotonicClock, ManualClock, TickSource};
