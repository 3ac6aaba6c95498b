//! Sphere colliders and the narrow-phase overlap tests
//!
//! Every collidable object is approximated by a single bounding sphere. The
//! tests here are pure functions of two colliders and are symmetric in their
//! arguments.

use crate::foundation::math::{is_finite_vec3, Vec3};

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// The center position of the sphere in world space
    pub position: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Collider {
    /// Creates a new collider with the given center and radius
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }

    /// A collider is usable when its center is finite and its radius is finite and positive
    pub fn is_valid(&self) -> bool {
        is_finite_vec3(&self.position) && self.radius.is_finite() && self.radius > 0.0
    }

    /// Check if this sphere intersects with another
    ///
    /// Touching spheres (distance exactly equal to the radius sum) count as intersecting.
    pub fn intersects(&self, other: &Collider) -> bool {
        let distance_squared = (self.position - other.position).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Same result as [`Collider::intersects`], with a per-axis early reject
    ///
    /// Used inside the broad-phase loops where most candidates are far apart on
    /// at least one axis.
    pub fn fast_intersects(&self, other: &Collider) -> bool {
        let radius_sum = self.radius + other.radius;
        let delta = self.position - other.position;

        if delta.x.abs() > radius_sum || delta.y.abs() > radius_sum || delta.z.abs() > radius_sum {
            return false;
        }

        delta.magnitude_squared() <= radius_sum * radius_sum
    }

    /// Get the penetration depth if intersecting (0.0 if not intersecting)
    pub fn penetration_depth(&self, other: &Collider) -> f32 {
        let distance = (self.position - other.position).magnitude();
        let radius_sum = self.radius + other.radius;
        if distance < radius_sum {
            radius_sum - distance
        } else {
            0.0
        }
    }

    /// Minimum corner of the axis-aligned box enclosing the sphere
    pub fn aabb_min(&self) -> Vec3 {
        self.position - Vec3::repeat(self.radius)
    }

    /// Maximum corner of the axis-aligned box enclosing the sphere
    pub fn aabb_max(&self) -> Vec3 {
        self.position + Vec3::repeat(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> Collider {
        Collider::new(Vec3::new(x, y, z), radius)
    }

    #[test]
    fn test_overlapping_spheres_intersect() {
        let a = sphere(0.0, 0.0, 0.0, 1.0);
        let b = sphere(1.5, 0.0, 0.0, 1.0);

        assert!(a.intersects(&b));
        assert!(a.fast_intersects(&b));
    }

    #[test]
    fn test_separated_spheres_do_not_intersect() {
        let a = sphere(0.0, 0.0, 0.0, 1.0);
        let b = sphere(3.0, 0.0, 0.0, 1.0);

        assert!(!a.intersects(&b));
        assert!(!a.fast_intersects(&b));
    }

    #[test]
    fn test_touching_spheres_intersect() {
        let a = sphere(0.0, 0.0, 0.0, 1.0);
        let b = sphere(0.0, 2.0, 0.0, 1.0);

        assert!(a.intersects(&b));
        assert!(a.fast_intersects(&b));
    }

    #[test]
    fn test_intersects_is_commutative() {
        let samples = [
            sphere(0.0, 0.0, 0.0, 1.0),
            sphere(1.5, 0.0, 0.0, 1.0),
            sphere(-3.0, 2.0, 1.0, 0.5),
            sphere(0.7, -0.7, 0.7, 0.25),
            sphere(100.0, 100.0, 100.0, 90.0),
        ];

        for a in &samples {
            for b in &samples {
                assert_eq!(a.intersects(b), b.intersects(a));
                assert_eq!(a.fast_intersects(b), b.fast_intersects(a));
                assert_eq!(a.fast_intersects(b), a.intersects(b));
            }
        }
    }

    #[test]
    fn test_early_reject_respects_diagonal_distance() {
        // Within the radius sum on every axis, but too far along the diagonal
        let a = sphere(0.0, 0.0, 0.0, 1.0);
        let b = sphere(1.8, 1.8, 1.8, 1.0);

        assert!(!a.fast_intersects(&b));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_penetration_depth() {
        let a = sphere(0.0, 0.0, 0.0, 1.0);
        let b = sphere(1.5, 0.0, 0.0, 1.0);

        assert_relative_eq!(a.penetration_depth(&b), 0.5);
        assert_relative_eq!(a.penetration_depth(&sphere(5.0, 0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_validity() {
        assert!(sphere(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!sphere(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!sphere(0.0, 0.0, 0.0, -2.0).is_valid());
        assert!(!sphere(f32::NAN, 0.0, 0.0, 1.0).is_valid());
    }
}
