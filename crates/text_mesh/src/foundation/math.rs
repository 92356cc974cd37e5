//! Math utilities and types
//!
//! Provides the small set of `nalgebra` types used by text layout.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type (pen positions, glyph offsets)
pub type Vec2 = Vector2<f32>;

/// 3D vector type (label positions)
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Build a model matrix from a translation and a uniform scale
pub fn translation_scale(position: Vec3, scale: f32) -> Mat4 {
    Mat4::new_translation(&position) * Mat4::new_scaling(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_scale() {
        let matrix = translation_scale(Vec3::new(200.0, 500.0, 0.0), 0.125);
        let point = matrix.transform_point(&Point3::new(8.0, 16.0, 0.0));

        assert_eq!(point.x, 201.0);
        assert_eq!(point.y, 502.0);
        assert_eq!(point.z, 0.0);
    }
}
