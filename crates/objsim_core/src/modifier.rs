//! Modifiers compute per-tick deltas from a read-only view of a component
//!
//! A modifier never changes its target. It only returns a value of type `M`
//! that an [`Applier`](crate::applier::Applier) later applies.
//!
//! Decorators ([`ShapedModifier`], [`VectorLengthModifier`],
//! [`WeightedVectorLengthModifier`]) wrap another modifier and alter when it
//! runs or how large its result is.

use objsim_math::force::discretize;
use objsim_math::{ForceLaw, Shape, Vec3};
use crate::component::Physical;

/// Computes a delta of type `M` for a target of type `T`
pub trait Modifier<T: ?Sized, M> {
    /// Delta for one tick of `dt` milliseconds
    fn compute(&self, dt: f64, target: &T) -> M;
}

/// Modifier backed by a closure
pub struct FnModifier<F> {
    f: F,
}

impl<F> FnModifier<F> {
    pub fn new<T: ?Sized, M>(f: F) -> Self
    where
        F: Fn(f64, &T) -> M,
    {
        Self { f }
    }
}

impl<T: ?Sized, M, F> Modifier<T, M> for FnModifier<F>
where
    F: Fn(f64, &T) -> M,
{
    fn compute(&self, dt: f64, target: &T) -> M {
        (self.f)(dt, target)
    }
}

/// Always returns the same value
#[derive(Clone, Debug)]
pub struct ConstantModifier<M>(pub M);

impl<T: ?Sized, M: Clone> Modifier<T, M> for ConstantModifier<M> {
    fn compute(&self, _dt: f64, _target: &T) -> M {
        self.0.clone()
    }
}

/// Constant acceleration (gravity, wind) as a velocity delta
#[derive(Clone, Copy, Debug)]
pub struct AccelerationModifier {
    /// Blocks per second squared
    pub acceleration: Vec3,
}

impl AccelerationModifier {
    pub fn new(acceleration: Vec3) -> Self {
        Self { acceleration }
    }

    /// Downward pull of `strength` blocks/s²
    pub fn gravity(strength: f64) -> Self {
        Self::new(Vec3::new(0.0, -strength, 0.0))
    }
}

impl<T: ?Sized> Modifier<T, Option<Vec3>> for AccelerationModifier {
    fn compute(&self, dt: f64, _target: &T) -> Option<Vec3> {
        Some(discretize(self.acceleration, dt))
    }
}

/// Pull toward (or, with negative strength, push away from) a point
///
/// The point is in the same frame as the target's position. With
/// [`ForceLaw::InverseSquare`] the result is not finite for a target sitting
/// exactly on the point.
#[derive(Clone, Copy, Debug)]
pub struct ForceModifier {
    pub point: Vec3,
    pub strength: f64,
    pub law: ForceLaw,
}

impl ForceModifier {
    pub fn new(point: Vec3, strength: f64, law: ForceLaw) -> Self {
        Self { point, strength, law }
    }
}

impl<T: Physical + ?Sized> Modifier<T, Option<Vec3>> for ForceModifier {
    fn compute(&self, dt: f64, target: &T) -> Option<Vec3> {
        let acceleration = self.law.acceleration(target.position(), self.point, self.strength);
        Some(discretize(acceleration, dt))
    }
}

/// Damping proportional to velocity
#[derive(Clone, Copy, Debug)]
pub struct DragModifier {
    /// Fraction of velocity lost per second
    pub coefficient: f64,
}

impl DragModifier {
    pub fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }
}

impl<T: Physical + ?Sized> Modifier<T, Option<Vec3>> for DragModifier {
    fn compute(&self, dt: f64, target: &T) -> Option<Vec3> {
        Some(discretize(-target.velocity() * self.coefficient, dt))
    }
}

/// Which side of a shape a [`ShapedModifier`] is active on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Containment {
    #[default]
    Inside,
    Outside,
}

/// Runs the wrapped modifier only for targets on one side of a shape
///
/// Targets elsewhere get `fallback` instead.
pub struct ShapedModifier<Mo, M> {
    inner: Mo,
    shape: Shape,
    containment: Containment,
    fallback: M,
}

impl<Mo, M> ShapedModifier<Mo, M> {
    /// Active inside `shape`
    pub fn inside(inner: Mo, shape: Shape, fallback: M) -> Self {
        Self {
            inner,
            shape,
            containment: Containment::Inside,
            fallback,
        }
    }

    /// Active outside `shape`
    pub fn outside(inner: Mo, shape: Shape, fallback: M) -> Self {
        Self {
            inner,
            shape,
            containment: Containment::Outside,
            fallback,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn containment(&self) -> Containment {
        self.containment
    }
}

impl<T, M, Mo> Modifier<T, M> for ShapedModifier<Mo, M>
where
    T: Physical + ?Sized,
    M: Clone,
    Mo: Modifier<T, M>,
{
    fn compute(&self, dt: f64, target: &T) -> M {
        let inside = self.shape.contains(target.position());
        let active = match self.containment {
            Containment::Inside => inside,
            Containment::Outside => !inside,
        };
        if active {
            self.inner.compute(dt, target)
        } else {
            self.fallback.clone()
        }
    }
}

/// Scales the vector produced by the wrapped modifier
///
/// `None` passes through unchanged.
pub struct VectorLengthModifier<Mo> {
    inner: Mo,
    factor: f64,
}

impl<Mo> VectorLengthModifier<Mo> {
    pub fn new(inner: Mo, factor: f64) -> Self {
        Self { inner, factor }
    }
}

impl<T, Mo> Modifier<T, Option<Vec3>> for VectorLengthModifier<Mo>
where
    T: ?Sized,
    Mo: Modifier<T, Option<Vec3>>,
{
    fn compute(&self, dt: f64, target: &T) -> Option<Vec3> {
        self.inner.compute(dt, target).map(|v| v * self.factor)
    }
}

/// Scales the vector produced by the wrapped modifier by a position-dependent weight
///
/// The weight is clamped to `[0, 1]`; `None` passes through unchanged.
pub struct WeightedVectorLengthModifier<Mo, W> {
    inner: Mo,
    weight: W,
}

impl<Mo, W> WeightedVectorLengthModifier<Mo, W>
where
    W: Fn(Vec3) -> f64,
{
    pub fn new(inner: Mo, weight: W) -> Self {
        Self { inner, weight }
    }
}

impl<T, Mo, W> Modifier<T, Option<Vec3>> for WeightedVectorLengthModifier<Mo, W>
where
    T: Physical + ?Sized,
    Mo: Modifier<T, Option<Vec3>>,
    W: Fn(Vec3) -> f64,
{
    fn compute(&self, dt: f64, target: &T) -> Option<Vec3> {
        let delta = self.inner.compute(dt, target)?;
        let weight = (self.weight)(target.position());
        // NaN weights count as zero
        let weight = if weight.is_nan() { 0.0 } else { weight.clamp(0.0, 1.0) };
        Some(delta * weight)
    }
}
