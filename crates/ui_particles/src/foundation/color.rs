//! Linear RGBA helpers
//!
//! Particle colors arrive as linear `Vec4` RGBA; the paint surface wants
//! 8-bit sRGB bytes.

use super::math::Vec4;

/// Opaque white, the fallback for particles that do not write a color.
pub fn white() -> Vec4 {
    Vec4::new(1.0, 1.0, 1.0, 1.0)
}

fn linear_to_srgb_channel(value: f32) -> f32 {
    let value = value.clamp(0.0, 1.0);
    if value <= 0.003_130_8 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

fn quantize(value: f32) -> u8 {
    // Clamped to [0, 1] beforehand, so the cast cannot wrap.
    #[allow(clippy::cast_sign_loss)]
    let byte = (value * 255.0).round() as u8;
    byte
}

/// Encode a linear color as sRGB bytes. Alpha stays linear.
pub fn to_srgb_u8(color: Vec4) -> [u8; 4] {
    [
        quantize(linear_to_srgb_channel(color.x)),
        quantize(linear_to_srgb_channel(color.y)),
        quantize(linear_to_srgb_channel(color.z)),
        quantize(color.w.clamp(0.0, 1.0)),
    ]
}

/// Encode `color` modulated by `tint`.
pub fn tinted_srgb_u8(color: Vec4, tint: Vec4) -> [u8; 4] {
    to_srgb_u8(color.component_mul(&tint))
}
