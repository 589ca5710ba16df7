//! objsim - entity/component simulation engine
//!
//! Re-exports the engine crates and adds layered configuration and the
//! fountain demo scenario used by the `objsim` binary.

pub mod config;
pub mod demo;

pub use objsim_math;
pub use objsim_core;
pub use objsim_run;
