//! UI layout input of a paint call
//!
//! The host hands over its accumulated layout and render transforms once per
//! paint. From them the widget derives both the [`RenderTransform`] used by
//! the mesh builders and the [`ComponentTransform`] forwarded to the
//! simulation.

use crate::foundation::math::{constants, Mat2, Vec2, Vec4};
use crate::render::projection::{ComponentTransform, RenderTransform};

/// Geometry of the widget for one paint call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    /// Accumulated layout scale (layout pixels per widget unit)
    pub layout_scale: f32,
    /// Top-left corner of the paint area in absolute UI space
    pub parent_top_left: Vec2,
    /// Center of the widget in absolute UI space
    pub absolute_center: Vec2,
    /// 2x2 part of the accumulated render transform
    pub render_matrix: Mat2,
    /// Color and opacity inherited from the widget style
    pub tint: Vec4,
}

impl LayoutGeometry {
    /// Axis-aligned geometry: unit render matrix, no tint
    pub fn new(layout_scale: f32, parent_top_left: Vec2, absolute_center: Vec2) -> Self {
        Self {
            layout_scale,
            parent_top_left,
            absolute_center,
            render_matrix: Mat2::identity() * layout_scale,
            tint: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Builder pattern: set the render matrix
    pub fn with_render_matrix(mut self, matrix: Mat2) -> Self {
        self.render_matrix = matrix;
        self
    }

    /// Builder pattern: set tint
    pub fn with_tint(mut self, tint: Vec4) -> Self {
        self.tint = tint;
        self
    }

    /// Transform for the mesh builders
    pub fn render_transform(&self) -> RenderTransform {
        RenderTransform::new(self.layout_scale, self.parent_top_left).with_tint(self.tint)
    }

    /// Widget center relative to the paint area, in widget units
    pub fn local_translation(&self) -> Vec2 {
        (self.absolute_center - self.parent_top_left) / self.layout_scale
    }

    /// Render scale with the layout scale divided out
    pub fn local_scale(&self) -> Vec2 {
        matrix_scale(&self.render_matrix) / self.layout_scale
    }

    /// Transform for the simulation component
    pub fn component_transform(&self) -> ComponentTransform {
        ComponentTransform::from_ui(
            self.local_translation(),
            self.local_scale(),
            rotation_angle(&self.render_matrix),
        )
    }
}

/// Scale along each axis: the lengths of the matrix columns
pub fn matrix_scale(matrix: &Mat2) -> Vec2 {
    Vec2::new(matrix.column(0).norm(), matrix.column(1).norm())
}

/// Rotation encoded in a 2x2 transform, in radians.
///
/// `atan` alone cannot tell a rotation from its opposite, so a negative
/// `m00` adds half a turn; `m00 == 0` is the quarter-turn case.
pub fn rotation_angle(matrix: &Mat2) -> f32 {
    let m00 = matrix[(0, 0)];
    let m10 = matrix[(1, 0)];

    if m00 == 0.0 {
        if m10 >= 0.0 {
            constants::HALF_PI
        } else {
            -constants::HALF_PI
        }
    } else if m00 < 0.0 {
        (m10 / m00).atan() + constants::PI
    } else {
        (m10 / m00).atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rotation2;
    use approx::assert_relative_eq;

    fn rotation(angle: f32) -> Mat2 {
        *Rotation2::new(angle).matrix()
    }

    #[test]
    fn test_identity_has_no_rotation() {
        assert_eq!(rotation_angle(&Mat2::identity()), 0.0);
    }

    #[test]
    fn test_quarter_turns() {
        assert_relative_eq!(rotation_angle(&Mat2::new(0.0, -1.0, 1.0, 0.0)), constants::HALF_PI);
        assert_relative_eq!(rotation_angle(&Mat2::new(0.0, 1.0, -1.0, 0.0)), -constants::HALF_PI);
    }

    #[test]
    fn test_obtuse_rotation_is_disambiguated() {
        let angle = 2.5;
        assert_relative_eq!(rotation_angle(&rotation(angle)), angle, epsilon = 1.0e-5);
        assert_relative_eq!(rotation_angle(&(rotation(0.4) * 3.0)), 0.4, epsilon = 1.0e-5);
    }

    #[test]
    fn test_component_transform_from_layout() {
        let geometry = LayoutGeometry::new(2.0, Vec2::new(100.0, 50.0), Vec2::new(140.0, 90.0))
            .with_render_matrix(rotation(0.3) * 4.0);
        let transform = geometry.component_transform();

        // ((140, 90) - (100, 50)) / 2 = (20, 20), lifted to (x, 0, -y)
        assert_relative_eq!(transform.location.x, 20.0);
        assert_relative_eq!(transform.location.z, -20.0);
        assert_relative_eq!(transform.scale.x, 2.0, epsilon = 1.0e-5);
        assert_relative_eq!(transform.scale.z, 2.0, epsilon = 1.0e-5);
        assert_relative_eq!(transform.pitch, 0.3, epsilon = 1.0e-5);
    }

    #[test]
    fn test_render_transform_carries_scale_and_tint() {
        let tint = Vec4::new(1.0, 0.5, 0.5, 1.0);
        let geometry = LayoutGeometry::new(1.5, Vec2::new(3.0, 4.0), Vec2::zeros()).with_tint(tint);
        let render = geometry.render_transform();
        assert_eq!(render.scale_factor, 1.5);
        assert_eq!(render.parent_top_left, Vec2::new(3.0, 4.0));
        assert_eq!(render.tint, tint);
    }
}
