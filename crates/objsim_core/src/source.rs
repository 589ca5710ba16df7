//! Sources spawn entities into an active system
//!
//! Sources run through a [`SourceBehavior`](crate::behavior::SourceBehavior),
//! so a system decides how often they fire by how it registers them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::entity::Entity;
use crate::error::SimError;
use crate::host::Host;
use crate::system::ActiveSystem;

/// Spawns zero or more entities per run
pub trait Source {
    fn update(
        &mut self,
        host: &mut dyn Host,
        system: &mut ActiveSystem,
        dt: f64,
    ) -> Result<(), SimError>;
}

/// Source backed by a closure
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F>
where
    F: FnMut(&mut dyn Host, &mut ActiveSystem, f64) -> Result<(), SimError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Source for FnSource<F>
where
    F: FnMut(&mut dyn Host, &mut ActiveSystem, f64) -> Result<(), SimError>,
{
    fn update(
        &mut self,
        host: &mut dyn Host,
        system: &mut ActiveSystem,
        dt: f64,
    ) -> Result<(), SimError> {
        (self.f)(host, system, dt)
    }
}

/// Spawns `count` entities per run, each built by a factory
///
/// If the factory fails, no entity of that run is added.
pub struct SpawnSource<F> {
    count: usize,
    factory: F,
}

impl<F> SpawnSource<F>
where
    F: FnMut() -> Result<Entity, SimError>,
{
    pub fn new(count: usize, factory: F) -> Self {
        Self { count, factory }
    }
}

impl<F> Source for SpawnSource<F>
where
    F: FnMut() -> Result<Entity, SimError>,
{
    fn update(
        &mut self,
        _host: &mut dyn Host,
        system: &mut ActiveSystem,
        _dt: f64,
    ) -> Result<(), SimError> {
        let batch = (0..self.count)
            .map(|_| (self.factory)())
            .collect::<Result<Vec<_>, _>>()?;
        system.add_entities(batch);
        Ok(())
    }
}

/// Runs the wrapped source with a fixed probability
pub struct RandomSource<S> {
    inner: S,
    chance: f64,
    rng: StdRng,
}

impl<S: Source> RandomSource<S> {
    /// Fire with probability `chance`, which must be within `[0, 1]`
    pub fn new(inner: S, chance: f64) -> Result<Self, SimError> {
        Self::with_rng(inner, chance, StdRng::from_entropy())
    }

    /// Same as [`RandomSource::new`] with a reproducible random sequence
    pub fn seeded(inner: S, chance: f64, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(inner, chance, StdRng::seed_from_u64(seed))
    }

    fn with_rng(inner: S, chance: f64, rng: StdRng) -> Result<Self, SimError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(SimError::argument(format!("chance must be within [0, 1], got {}", chance)));
        }
        Ok(Self { inner, chance, rng })
    }

    pub fn chance(&self) -> f64 {
        self.chance
    }
}

impl<S: Source> Source for RandomSource<S> {
    fn update(
        &mut self,
        host: &mut dyn Host,
        system: &mut ActiveSystem,
        dt: f64,
    ) -> Result<(), SimError> {
        if self.rng.gen::<f64>() < self.chance {
            self.inner.update(host, system, dt)
        } else {
            Ok(())
        }
    }
}

/// Runs the wrapped source only on the system's first tick
pub struct InitializationSource<S> {
    inner: S,
}

impl<S: Source> InitializationSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Source> Source for InitializationSource<S> {
    fn update(
        &mut self,
        host: &mut dyn Host,
        system: &mut ActiveSystem,
        dt: f64,
    ) -> Result<(), SimError> {
        if system.is_first_tick() {
            self.inner.update(host, system, dt)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objsim_math::Vec3;
    use crate::host::NullHost;
    use crate::traits::{Motion, ParticleEmitter};

    fn spawner(count: usize) -> SpawnSource<impl FnMut() -> Result<Entity, SimError>> {
        SpawnSource::new(count, || Entity::new().with(Motion::default()))
    }

    #[test]
    fn test_spawn_source_adds_count_entities() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let mut source = spawner(3);
        source.update(&mut NullHost, &mut system, 50.0).unwrap();
        assert_eq!(system.len(), 3);
        assert!(system.iter().all(|(_, e)| e.system() == Some(system.id())));
    }

    #[test]
    fn test_spawn_source_failure_adds_nothing() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let mut made = 0;
        let mut source = SpawnSource::new(3, || {
            made += 1;
            if made == 3 {
                // emitter without anything physical
                Entity::new().with(ParticleEmitter::new(Default::default(), 1.0)?)
            } else {
                Ok(Entity::new())
            }
        });
        assert!(matches!(
            source.update(&mut NullHost, &mut system, 50.0),
            Err(SimError::Dependency { .. })
        ));
        assert!(system.is_empty());
    }

    #[test]
    fn test_random_source_extremes() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let mut never = RandomSource::seeded(spawner(1), 0.0, 7).unwrap();
        let mut always = RandomSource::seeded(spawner(1), 1.0, 7).unwrap();
        for _ in 0..20 {
            never.update(&mut NullHost, &mut system, 50.0).unwrap();
        }
        assert!(system.is_empty());
        for _ in 0..20 {
            always.update(&mut NullHost, &mut system, 50.0).unwrap();
        }
        assert_eq!(system.len(), 20);
    }

    #[test]
    fn test_random_source_is_reproducible() {
        let run = |seed| {
            let mut system = ActiveSystem::new(Vec3::ZERO);
            let mut source = RandomSource::seeded(spawner(1), 0.5, seed).unwrap();
            for _ in 0..50 {
                source.update(&mut NullHost, &mut system, 50.0).unwrap();
            }
            system.len()
        };
        assert_eq!(run(42), run(42));
        let spawned = run(42);
        assert!(spawned > 0 && spawned < 50);
    }

    #[test]
    fn test_random_source_rejects_bad_chance() {
        assert!(RandomSource::new(spawner(1), 1.5).is_err());
        assert!(RandomSource::new(spawner(1), -0.1).is_err());
        assert!(RandomSource::new(spawner(1), f64::NAN).is_err());
    }

    #[test]
    fn test_initialization_source() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let mut source = InitializationSource::new(spawner(2));
        system.increment_lifetime(50.0);
        source.update(&mut NullHost, &mut system, 50.0).unwrap();
        system.increment_lifetime(50.0);
        source.update(&mut NullHost, &mut system, 50.0).unwrap();
        assert_eq!(system.len(), 2);
    }

    #[test]
    fn test_fn_source() {
        let mut system = ActiveSystem::new(Vec3::ZERO);
        let mut source = FnSource::new(|_: &mut dyn Host, system: &mut ActiveSystem, dt: f64| {
            if dt > 0.0 {
                system.add_entity(Entity::new());
            }
            Ok(())
        });
        source.update(&mut NullHost, &mut system, 0.0).unwrap();
        source.update(&mut NullHost, &mut system, 50.0).unwrap();
        assert_eq!(system.len(), 1);
    }
}
