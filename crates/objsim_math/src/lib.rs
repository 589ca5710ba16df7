//! Geometry for the object simulation engine
//!
//! This crate provides the value types modifiers work with:
//!
//! - [`Vec3`] - 3D vector used for positions, velocities, and accelerations
//! - [`Shape`] - Immutable region (cuboid, sphere, cylinder) with containment tests
//! - [`ForceLaw`] - Pull/push laws toward a point, plus [`force::discretize`]

mod vec3;
pub mod shape;
pub mod force;

pub use vec3::Vec3;
pub use shape::Shape;
pub use force::ForceLaw;
