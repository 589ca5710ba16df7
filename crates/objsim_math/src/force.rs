//! Force laws and time discretization
//!
//! All functions here are pure. Accelerations are in blocks/s², time steps in
//! milliseconds, so [`discretize`] turns an acceleration into the velocity
//! change for one tick.

use crate::Vec3;
use serde::{Serialize, Deserialize};

/// Convert an acceleration into a velocity delta for a tick of `dt_ms` milliseconds
#[inline]
pub fn discretize(acceleration: Vec3, dt_ms: f64) -> Vec3 {
    acceleration * (dt_ms / 1000.0)
}

/// How the strength of a pull toward a point depends on distance
///
/// A negative strength pushes away from the target instead of pulling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceLaw {
    /// Same magnitude at every distance. Zero at the target itself.
    Uniform,
    /// Magnitude falls off with the squared distance.
    ///
    /// Singular at the target: the result is not finite when `from == target`
    /// and grows without bound as the distance approaches zero. Callers that
    /// can reach the target must guard against this themselves.
    InverseSquare,
    /// Magnitude grows linearly with distance (a spring). Bounded near the target.
    Proportional,
}

impl ForceLaw {
    /// Acceleration felt at `from` toward `target`
    pub fn acceleration(self, from: Vec3, target: Vec3, strength: f64) -> Vec3 {
        let offset = target - from;
        match self {
            ForceLaw::Uniform => offset.normalized() * strength,
            ForceLaw::InverseSquare => {
                offset.normalized() * (strength / offset.length_squared())
            }
            ForceLaw::Proportional => offset * strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_discretize() {
        let accel = Vec3::new(0.0, -20.0, 0.0);
        assert_eq!(discretize(accel, 50.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(discretize(accel, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_uniform_ignores_distance() {
        let near = ForceLaw::Uniform.acceleration(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 3.0);
        let far = ForceLaw::Uniform.acceleration(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO, 3.0);
        assert_eq!(near, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(far, near);
    }

    #[test]
    fn test_uniform_negative_strength_pushes() {
        let accel = ForceLaw::Uniform.acceleration(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO, -1.0);
        assert_eq!(accel, Vec3::X);
    }

    #[test]
    fn test_uniform_at_target_is_zero() {
        assert_eq!(ForceLaw::Uniform.acceleration(Vec3::ZERO, Vec3::ZERO, 5.0), Vec3::ZERO);
    }

    #[test]
    fn test_inverse_square_falls_off() {
        let at_one =
            ForceLaw::InverseSquare.acceleration(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 4.0);
        let at_two =
            ForceLaw::InverseSquare.acceleration(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, 4.0);
        assert!((at_one.y + 4.0).abs() < EPS);
        assert!((at_two.y + 1.0).abs() < EPS);
    }

    #[test]
    fn test_inverse_square_is_singular_at_target() {
        let accel = ForceLaw::InverseSquare.acceleration(Vec3::ZERO, Vec3::ZERO, 1.0);
        assert!(!accel.is_finite());
    }

    #[test]
    fn test_proportional_is_linear_and_safe() {
        let accel = ForceLaw::Proportional.acceleration(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, 2.0);
        assert_eq!(accel, Vec3::new(0.0, 0.0, -6.0));
        assert_eq!(ForceLaw::Proportional.acceleration(Vec3::ZERO, Vec3::ZERO, 2.0), Vec3::ZERO);
    }
}
