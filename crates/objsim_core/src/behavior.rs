//! Behaviors
//!
//! A behavior is arbitrary per-tick logic with full access to an active
//! system. Global behaviors live in a system's
//! [`SystemDefinition`](crate::system::SystemDefinition) and run once per
//! tick; object-local ones live in a
//! [`LocalBehavior`](crate::traits::LocalBehavior) component and run once per
//! tick for their entity.

use crate::error::SimError;
use crate::host::Host;
use crate::rule::DynRule;
use crate::source::Source;
use crate::system::{ActiveSystem, EntityKey};

/// What a behavior is running for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Global behavior, run once for the system
    System,
    /// Object-local behavior, run for the entity carrying it
    Entity(EntityKey),
}

/// Per-tick logic
pub trait Behavior {
    fn behave(
        &mut self,
        host: &mut dyn Host,
        dt: f64,
        system: &mut ActiveSystem,
        target: Target,
    ) -> Result<(), SimError>;
}

/// Behavior backed by a closure
pub struct FnBehavior<F> {
    f: F,
}

impl<F> FnBehavior<F>
where
    F: FnMut(&mut dyn Host, f64, &mut ActiveSystem, Target) -> Result<(), SimError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Behavior for FnBehavior<F>
where
    F: FnMut(&mut dyn Host, f64, &mut ActiveSystem, Target) -> Result<(), SimError>,
{
    fn behave(
        &mut self,
        host: &mut dyn Host,
        dt: f64,
        system: &mut ActiveSystem,
        target: Target,
    ) -> Result<(), SimError> {
        (self.f)(host, dt, system, target)
    }
}

/// Runs the wrapped behavior only on the system's first tick
///
/// Resetting the system's lifetime re-arms it.
pub struct InitializationBehavior<B> {
    inner: B,
}

impl<B: Behavior> InitializationBehavior<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

impl<B: Behavior> Behavior for InitializationBehavior<B> {
    fn behave(
        &mut self,
        host: &mut dyn Host,
        dt: f64,
        system: &mut ActiveSystem,
        target: Target,
    ) -> Result<(), SimError> {
        if system.is_first_tick() {
            self.inner.behave(host, dt, system, target)
        } else {
            Ok(())
        }
    }
}

/// Runs a source every tick
pub struct SourceBehavior<S> {
    source: S,
}

impl<S: Source> SourceBehavior<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Source> Behavior for SourceBehavior<S> {
    fn behave(
        &mut self,
        host: &mut dyn Host,
        dt: f64,
        system: &mut ActiveSystem,
        _target: Target,
    ) -> Result<(), SimError> {
        self.source.update(host, system, dt)
    }
}

/// Runs a rule every tick
///
/// As a global behavior the rule visits every entity satisfying its kind; as
/// an object-local behavior it visits only its own entity.
pub struct RuleBehavior {
    rule: Box<dyn DynRule>,
}

impl RuleBehavior {
    pub fn new(rule: impl DynRule + 'static) -> Self {
        Self { rule: Box::new(rule) }
    }
}

impl Behavior for RuleBehavior {
    fn behave(
        &mut self,
        _host: &mut dyn Host,
        dt: f64,
        system: &mut ActiveSystem,
        target: Target,
    ) -> Result<(), SimError> {
        let keys = match target {
            Target::System => system.keys_with(self.rule.target_kind()),
            Target::Entity(key) => vec![key],
        };
        for key in keys {
            // earlier runs may have removed it
            if system.contains(key) {
                self.rule.run(dt, system, key)?;
            }
        }
        Ok(())
    }
}
