//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the few helpers the render state needs.
//! Matrix math itself is never reimplemented here.

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type (column-major, matches the native matrix stacks)
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Extension trait for Mat4 with coordinate-convention conversions
pub trait Mat4Ext {
    /// Returns a copy with the third column negated.
    ///
    /// Applied to a view matrix this mirrors the world-space z axis before
    /// the view transform, turning the engine's world handedness into the
    /// one the fixed-function matrix stack expects. View space itself still
    /// looks down -Z. The receiver is left untouched.
    fn to_native_handedness(&self) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn to_native_handedness(&self) -> Mat4 {
        let mut converted = *self;
        for value in converted.column_mut(2).iter_mut() {
            *value = -*value;
        }
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_handedness_negates_only_third_column() {
        let view = Mat4::from_fn(|row, col| (row * 4 + col) as f32 + 1.0);
        let converted = view.to_native_handedness();

        for row in 0..4 {
            for col in 0..4 {
                let expected = if col == 2 { -view[(row, col)] } else { view[(row, col)] };
                assert_eq!(converted[(row, col)], expected);
            }
        }
    }

    #[test]
    fn test_native_handedness_is_an_involution() {
        let view = Mat4::new_translation(&Vec3::new(1.0, -2.0, 3.0));
        approx::assert_relative_eq!(view.to_native_handedness().to_native_handedness(), view);
    }

    #[test]
    fn test_deg_to_rad() {
        approx::assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI);
    }
}
