//! Paint-surface vertex layout

use crate::foundation::math::{Vec2, Vec4};
use bytemuck::{Pod, Zeroable};

/// One vertex of a UI mesh batch
///
/// Layout matches what a UI paint surface uploads directly: position in
/// layout pixels, 8-bit sRGB color and four texture channels. Channels 0-1
/// are the primary UVs; 2-3 carry UV1 or a per-particle shader payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct UiVertex {
    /// Position in UI space
    pub position: [f32; 2],
    /// sRGB RGBA color
    pub color: [u8; 4],
    /// Texture channels
    pub tex_coords: [f32; 4],
}

impl UiVertex {
    /// Create a vertex from its parts
    pub fn new(position: Vec2, color: [u8; 4], uv0: Vec2, uv1: Vec2) -> Self {
        Self {
            position: [position.x, position.y],
            color,
            tex_coords: [uv0.x, uv0.y, uv1.x, uv1.y],
        }
    }

    /// Position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }

    /// Primary UVs
    pub fn uv0(&self) -> Vec2 {
        Vec2::new(self.tex_coords[0], self.tex_coords[1])
    }

    /// Secondary channels
    pub fn uv1(&self) -> Vec2 {
        Vec2::new(self.tex_coords[2], self.tex_coords[3])
    }

    /// All four texture channels
    pub fn tex_coords(&self) -> Vec4 {
        Vec4::new(self.tex_coords[0], self.tex_coords[1], self.tex_coords[2], self.tex_coords[3])
    }
}
