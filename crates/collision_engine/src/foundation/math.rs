//! Math utilities and types
//!
//! Provides the vector types used by colliders and debug drawing.

pub use nalgebra::{Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (RGBA colors for debug drawing)
pub type Vec4 = Vector4<f32>;

/// Returns true when every component of the vector is finite
pub fn is_finite_vec3(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Component-wise floor of `v * scale`, saturating into `i32`
///
/// Used to discretize world positions into integer grid coordinates.
pub fn floor_scaled(v: &Vec3, scale: f32) -> [i32; 3] {
    // `as` saturates for out-of-range floats, which keeps far-away objects in edge cells
    [
        (v.x * scale).floor() as i32,
        (v.y * scale).floor() as i32,
        (v.z * scale).floor() as i32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_scaled_negative() {
        let cells = floor_scaled(&Vec3::new(-0.5, 9.5, -10.5), 0.1);
        assert_eq!(cells, [-1, 0, -2]);
    }

    #[test]
    fn test_is_finite() {
        assert!(is_finite_vec3(&Vec3::new(1.0, 2.0, 3.0)));
        assert!(!is_finite_vec3(&Vec3::new(f32::NAN, 0.0, 0.0)));
        assert!(!is_finite_vec3(&Vec3::new(0.0, f32::INFINITY, 0.0)));
    }
}
