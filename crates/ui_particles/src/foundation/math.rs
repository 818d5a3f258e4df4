//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of 2D helpers the
//! projection and mesh builders share.

pub use nalgebra::{Matrix2, Rotation2, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (also used for linear RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 2x2 matrix type
pub type Mat2 = Matrix2<f32>;

/// Lengths below this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f32 = 1.0e-8;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2, NORMALIZE_EPSILON};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Normalize `v`, or return the zero vector when it is too short to have a direction.
    pub fn safe_normal(v: Vec2) -> Vec2 {
        v.try_normalize(NORMALIZE_EPSILON).unwrap_or_else(Vec2::zeros)
    }

    /// Rotate `v` counter-clockwise by `radians`.
    pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        rotate_sin_cos(v, sin, cos)
    }

    /// Rotate `v` by a precomputed sine/cosine pair.
    #[inline]
    pub fn rotate_sin_cos(v: Vec2, sin: f32, cos: f32) -> Vec2 {
        Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
    }

    /// Rotate `v` by +90 degrees.
    #[inline]
    pub fn perpendicular(v: Vec2) -> Vec2 {
        Vec2::new(-v.y, v.x)
    }

    /// `-1`, `0` or `1` depending on the sign of `value` (zero stays zero).
    #[inline]
    pub fn sign(value: f32) -> f32 {
        if value > 0.0 {
            1.0
        } else if value < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}
