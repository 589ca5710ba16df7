//! Regions used to filter modifiers by position
//!
//! Shapes are immutable value types. All coordinates are in the same frame as
//! the positions they are tested against (system-relative in practice).

use crate::Vec3;
use serde::{Serialize, Deserialize};

/// An immutable geometric region
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned box between two corners (inclusive)
    Cuboid { min: Vec3, max: Vec3 },
    /// Ball around a center point (surface inclusive)
    Sphere { center: Vec3, radius: f64 },
    /// Upright cylinder standing on `base`, extending `height` along +Y
    Cylinder { base: Vec3, radius: f64, height: f64 },
}

impl Shape {
    /// Create a cuboid from any two opposite corners
    ///
    /// The corners are sorted per axis, so the order of the arguments does not matter.
    pub fn cuboid(a: Vec3, b: Vec3) -> Self {
        Shape::Cuboid {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    /// Create a cuboid centered at a position with given half-extents
    pub fn cuboid_centered(center: Vec3, half_extents: Vec3) -> Self {
        Self::cuboid(center - half_extents, center + half_extents)
    }

    /// Create a sphere
    pub fn sphere(center: Vec3, radius: f64) -> Self {
        Shape::Sphere { center, radius: radius.abs() }
    }

    /// Create an upright cylinder
    pub fn cylinder(base: Vec3, radius: f64, height: f64) -> Self {
        Shape::Cylinder {
            base,
            radius: radius.abs(),
            height,
        }
    }

    /// Check if a point is inside or on the boundary of the region
    pub fn contains(&self, point: Vec3) -> bool {
        match *self {
            Shape::Cuboid { min, max } => {
                point.x >= min.x
                    && point.x <= max.x
                    && point.y >= min.y
                    && point.y <= max.y
                    && point.z >= min.z
                    && point.z <= max.z
            }
            Shape::Sphere { center, radius } => {
                (point - center).length_squared() <= radius * radius
            }
            Shape::Cylinder { base, radius, height } => {
                let (low, high) = if height >= 0.0 {
                    (base.y, base.y + height)
                } else {
                    (base.y + height, base.y)
                };
                let dx = point.x - base.x;
                let dz = point.z - base.z;
                point.y >= low && point.y <= high && dx * dx + dz * dz <= radius * radius
            }
        }
    }

    /// Get the center of the region
    pub fn center(&self) -> Vec3 {
        match *self {
            Shape::Cuboid { min, max } => (min + max) * 0.5,
            Shape::Sphere { center, .. } => center,
            Shape::Cylinder { base, height, .. } => base + Vec3::Y * (height * 0.5),
        }
    }

    /// Translate the region by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        match *self {
            Shape::Cuboid { min, max } => Shape::Cuboid {
                min: min + delta,
                max: max + delta,
            },
            Shape::Sphere { center, radius } => Shape::Sphere {
                center: center + delta,
                radius,
            },
            Shape::Cylinder { base, radius, height } => Shape::Cylinder {
                base: base + delta,
                radius,
                height,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_sorts_corners() {
        let shape = Shape::cuboid(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(
            shape,
            Shape::Cuboid {
                min: Vec3::new(-1.0, 0.0, -1.0),
                max: Vec3::new(1.0, 1.0, 1.0),
            }
        );
    }

    #[test]
    fn test_cuboid_contains() {
        let shape = Shape::cuboid_centered(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(shape.contains(Vec3::ZERO));
        assert!(shape.contains(Vec3::new(1.0, 1.0, 1.0))); // corner
        assert!(!shape.contains(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_sphere_contains() {
        let shape = Shape::sphere(Vec3::new(0.0, 5.0, 0.0), 2.0);
        assert!(shape.contains(Vec3::new(0.0, 5.0, 0.0)));
        assert!(shape.contains(Vec3::new(0.0, 7.0, 0.0))); // on surface
        assert!(!shape.contains(Vec3::new(0.0, 7.1, 0.0)));
    }

    #[test]
    fn test_sphere_negative_radius_is_normalized() {
        let shape = Shape::sphere(Vec3::ZERO, -1.0);
        assert!(shape.contains(Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_cylinder_contains() {
        let shape = Shape::cylinder(Vec3::ZERO, 1.0, 3.0);
        assert!(shape.contains(Vec3::new(0.0, 0.0, 0.0)));
        assert!(shape.contains(Vec3::new(0.5, 2.9, 0.5)));
        assert!(!shape.contains(Vec3::new(0.0, 3.1, 0.0))); // above
        assert!(!shape.contains(Vec3::new(0.0, -0.1, 0.0))); // below
        assert!(!shape.contains(Vec3::new(0.8, 1.0, 0.8))); // outside radius
    }

    #[test]
    fn test_cylinder_negative_height_hangs_down() {
        let shape = Shape::cylinder(Vec3::ZERO, 1.0, -2.0);
        assert!(shape.contains(Vec3::new(0.0, -1.5, 0.0)));
        assert!(!shape.contains(Vec3::new(0.0, 0.5, 0.0)));
    }

    #[test]
    fn test_center() {
        assert_eq!(Shape::cylinder(Vec3::ZERO, 1.0, 4.0).center(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(
            Shape::cuboid(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0)).center(),
            Vec3::new(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_translated() {
        let shape = Shape::sphere(Vec3::ZERO, 1.0).translated(Vec3::new(10.0, 0.0, 0.0));
        assert!(shape.contains(Vec3::new(10.5, 0.0, 0.0)));
        assert!(!shape.contains(Vec3::ZERO));
    }
}
