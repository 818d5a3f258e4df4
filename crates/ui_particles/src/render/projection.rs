//! Simulation-space to UI-space projection
//!
//! The simulation runs in a 3D frame where X is right, Z is up and Y is
//! depth. UI space is 2D with Y growing downwards, so a simulation point
//! `(x, y, z)` lands on `(x, -z)` and `y` becomes the fake-depth input.
//! Every position, size and direction the mesh builders emit goes through
//! this module.

use crate::foundation::math::{utils, Vec2, Vec3, Vec4};
use crate::simulation::emitter::SimulationSpace;

/// Per-paint transform from the UI layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    /// Layout pixels per simulation unit
    pub scale_factor: f32,
    /// Top-left corner of the parent paint area in UI space
    pub parent_top_left: Vec2,
    /// Linear RGBA multiplied into every particle color
    pub tint: Vec4,
}

impl RenderTransform {
    /// Transform with the given scale and origin and no tint
    pub fn new(scale_factor: f32, parent_top_left: Vec2) -> Self {
        Self {
            scale_factor,
            parent_top_left,
            tint: Vec4::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Builder pattern: set tint
    pub fn with_tint(mut self, tint: Vec4) -> Self {
        self.tint = tint;
        self
    }
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self::new(1.0, Vec2::zeros())
    }
}

/// Relative transform of the simulation component, derived from the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentTransform {
    /// Location in simulation units
    pub location: Vec3,
    /// Scale per simulation axis
    pub scale: Vec3,
    /// Rotation around the depth axis in radians
    pub pitch: f32,
}

impl ComponentTransform {
    /// No offset, unit scale, no rotation
    pub fn identity() -> Self {
        Self {
            location: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            pitch: 0.0,
        }
    }

    /// Lift a 2D UI transform into the simulation frame
    pub fn from_ui(translation: Vec2, scale: Vec2, angle: f32) -> Self {
        Self {
            location: Vec3::new(translation.x, 0.0, -translation.y),
            scale: Vec3::new(scale.x, 1.0, scale.y),
            pitch: angle,
        }
    }

    /// Scale of the two axes that survive projection
    pub fn scale_2d(&self) -> Vec2 {
        Vec2::new(self.scale.x, self.scale.z)
    }
}

impl Default for ComponentTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Drop the depth axis: `(x, y, z) -> (x, -z)`
#[inline]
pub fn flatten(sim: &Vec3) -> Vec2 {
    Vec2::new(sim.x, -sim.z)
}

/// Project a simulation position into UI space
pub fn project_position(
    sim: &Vec3,
    space: SimulationSpace,
    component: &ComponentTransform,
    scale_factor: f32,
    parent_top_left: Vec2,
) -> Vec2 {
    let position = project_vector(sim, space, component, scale_factor) + parent_top_left;

    match space {
        SimulationSpace::Local => position + flatten(&component.location) * scale_factor,
        SimulationSpace::World => position,
    }
}

/// Project a simulation direction or extent; no translation is applied
pub fn project_vector(
    sim: &Vec3,
    space: SimulationSpace,
    component: &ComponentTransform,
    scale_factor: f32,
) -> Vec2 {
    let vector = flatten(sim) * scale_factor;

    match space {
        SimulationSpace::Local => {
            let scaled = vector.component_mul(&component.scale_2d());
            utils::rotate(scaled, -component.pitch)
        }
        SimulationSpace::World => vector,
    }
}

/// Size multiplier for a particle at `sim_depth`.
///
/// 1 at depth 0, 0 at `reference`; beyond either end the sprite keeps
/// growing or flips, there is no clamp.
#[inline]
pub fn depth_scale(sim_depth: f32, reference: f32) -> f32 {
    (reference - sim_depth) / reference
}

/// Projection inputs for one renderer build
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    space: SimulationSpace,
    component: &'a ComponentTransform,
    render: &'a RenderTransform,
    fake_depth: Option<f32>,
}

impl<'a> Projector<'a> {
    /// Bundle the inputs; `fake_depth` is the reference distance when depth faking is on
    pub fn new(
        space: SimulationSpace,
        component: &'a ComponentTransform,
        render: &'a RenderTransform,
        fake_depth: Option<f32>,
    ) -> Self {
        Self {
            space,
            component,
            render,
            fake_depth,
        }
    }

    /// Whether positions are component-relative
    pub fn is_local(&self) -> bool {
        self.space == SimulationSpace::Local
    }

    /// Component pitch that applies to this emitter (0 in world space)
    pub fn local_pitch(&self) -> f32 {
        if self.is_local() {
            self.component.pitch
        } else {
            0.0
        }
    }

    /// Layout pixels per simulation unit
    pub fn scale_factor(&self) -> f32 {
        self.render.scale_factor
    }

    /// Render transform tint
    pub fn tint(&self) -> Vec4 {
        self.render.tint
    }

    /// UI position of a simulation point
    pub fn position(&self, sim: &Vec3) -> Vec2 {
        project_position(
            sim,
            self.space,
            self.component,
            self.render.scale_factor,
            self.render.parent_top_left,
        )
    }

    /// UI direction of a simulation vector
    pub fn vector(&self, sim: &Vec3) -> Vec2 {
        project_vector(sim, self.space, self.component, self.render.scale_factor)
    }

    /// UI size of a particle size, before depth faking
    pub fn size(&self, size: Vec2) -> Vec2 {
        let size = size * self.render.scale_factor;
        if self.is_local() {
            size.component_mul(&self.component.scale_2d())
        } else {
            size
        }
    }

    /// Fake-depth multiplier for a particle at `sim` (1 when disabled)
    pub fn depth_multiplier(&self, sim: &Vec3) -> f32 {
        self.fake_depth
            .map_or(1.0, |reference| depth_scale(sim.y, reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_world_origin_lands_on_parent_top_left() {
        let projected = project_position(
            &Vec3::zeros(),
            SimulationSpace::World,
            &ComponentTransform::identity(),
            1.0,
            Vec2::new(10.0, 20.0),
        );
        assert_eq!(projected, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_up_axis_is_flipped() {
        let projected = project_position(
            &Vec3::new(3.0, 99.0, 4.0),
            SimulationSpace::World,
            &ComponentTransform::identity(),
            2.0,
            Vec2::zeros(),
        );
        assert_relative_eq!(projected, Vec2::new(6.0, -8.0));
    }

    #[test]
    fn test_local_space_applies_component_transform() {
        let component = ComponentTransform::from_ui(Vec2::new(5.0, 7.0), Vec2::new(2.0, 3.0), 0.0);
        let projected = project_position(
            &Vec3::new(1.0, 0.0, -1.0),
            SimulationSpace::Local,
            &component,
            2.0,
            Vec2::new(100.0, 0.0),
        );
        // (1, 1) * 2 * (2, 3) + (100, 0) + (5, 7) * 2
        assert_relative_eq!(projected, Vec2::new(114.0, 20.0));
    }

    #[test]
    fn test_local_space_rotates_by_negative_pitch() {
        let component = ComponentTransform::from_ui(Vec2::zeros(), Vec2::new(1.0, 1.0), HALF_PI);
        let projected = project_vector(&Vec3::new(1.0, 0.0, 0.0), SimulationSpace::Local, &component, 1.0);
        assert_relative_eq!(projected, Vec2::new(0.0, -1.0), epsilon = 1.0e-6);
    }

    #[test]
    fn test_world_space_ignores_component() {
        let component = ComponentTransform::from_ui(Vec2::new(50.0, 50.0), Vec2::new(4.0, 4.0), 1.0);
        let projected = project_vector(&Vec3::new(1.0, 0.0, 1.0), SimulationSpace::World, &component, 1.0);
        assert_eq!(projected, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_depth_scale_endpoints() {
        assert_eq!(depth_scale(1000.0, 1000.0), 0.0);
        assert_eq!(depth_scale(0.0, 1000.0), 1.0);
        assert_relative_eq!(depth_scale(-500.0, 1000.0), 1.5);
        assert_relative_eq!(depth_scale(1500.0, 1000.0), -0.5);
    }

    #[test]
    fn test_projector_size_and_depth() {
        let component = ComponentTransform::from_ui(Vec2::zeros(), Vec2::new(2.0, 0.5), 0.0);
        let render = RenderTransform::new(3.0, Vec2::zeros());

        let local = Projector::new(SimulationSpace::Local, &component, &render, Some(100.0));
        assert_relative_eq!(local.size(Vec2::new(1.0, 2.0)), Vec2::new(6.0, 3.0));
        assert_relative_eq!(local.depth_multiplier(&Vec3::new(0.0, 25.0, 0.0)), 0.75);

        let world = Projector::new(SimulationSpace::World, &component, &render, None);
        assert_relative_eq!(world.size(Vec2::new(1.0, 2.0)), Vec2::new(3.0, 6.0));
        assert_eq!(world.depth_multiplier(&Vec3::new(0.0, 25.0, 0.0)), 1.0);
        assert_eq!(world.local_pitch(), 0.0);
    }
}
