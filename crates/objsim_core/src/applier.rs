//! Appliers write modifier results back into components
//!
//! An applier is the only step of a rule that may mutate its target, and the
//! only one that can ask for the owning entity to be removed.

use objsim_math::Vec3;
use crate::component::Physical;

/// What should happen to the owning entity after an applier ran
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verdict {
    #[default]
    Keep,
    Remove,
}

/// Applies a delta of type `M` to a target of type `T`
pub trait Applier<T: ?Sized, M> {
    fn apply(&self, target: &mut T, delta: M) -> Verdict;
}

/// Applier backed by a closure
pub struct FnApplier<F> {
    f: F,
}

impl<F> FnApplier<F> {
    pub fn new<T: ?Sized, M>(f: F) -> Self
    where
        F: Fn(&mut T, M) -> Verdict,
    {
        Self { f }
    }
}

impl<T: ?Sized, M, F> Applier<T, M> for FnApplier<F>
where
    F: Fn(&mut T, M) -> Verdict,
{
    fn apply(&self, target: &mut T, delta: M) -> Verdict {
        (self.f)(target, delta)
    }
}

/// Removes the entity when the delta is `false`
#[derive(Clone, Copy, Debug, Default)]
pub struct ExistenceApplier;

impl<T: ?Sized> Applier<T, bool> for ExistenceApplier {
    fn apply(&self, _target: &mut T, keep: bool) -> Verdict {
        if keep {
            Verdict::Keep
        } else {
            Verdict::Remove
        }
    }
}

/// Adds the delta to the velocity; `None` leaves it unchanged
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityApplier;

impl<T: Physical + ?Sized> Applier<T, Option<Vec3>> for VelocityApplier {
    fn apply(&self, target: &mut T, delta: Option<Vec3>) -> Verdict {
        if let Some(delta) = delta {
            let velocity = target.velocity();
            target.set_velocity(velocity + delta);
        }
        Verdict::Keep
    }
}

/// Adds the delta to the position; `None` leaves it unchanged
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplacementApplier;

impl<T: Physical + ?Sized> Applier<T, Option<Vec3>> for DisplacementApplier {
    fn apply(&self, target: &mut T, delta: Option<Vec3>) -> Verdict {
        if let Some(delta) = delta {
            let position = target.position();
            target.set_position(position + delta);
        }
        Verdict::Keep
    }
}
