//! Sprite quads
//!
//! Each particle becomes one centered quad, 4 vertices and 6 indices, in a
//! single batch per renderer.

use super::collector::RenderData;
use super::projection::Projector;
use super::vertex::UiVertex;
use super::SkipReason;
use crate::foundation::color;
use crate::foundation::math::{utils, Vec2, Vec3, Vec4};
use crate::simulation::attributes::ParticleAttributeSet;
use crate::simulation::renderer::{SpriteAlignment, SpriteRendererProperties};

/// Vertices emitted per particle
pub const VERTICES_PER_SPRITE: usize = 4;
/// Indices emitted per particle
pub const INDICES_PER_SPRITE: usize = 6;

const QUAD_INDICES: [u32; INDICES_PER_SPRITE] = [0, 1, 2, 2, 1, 3];

fn unit_uvs() -> [Vec2; VERTICES_PER_SPRITE] {
    [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
    ]
}

/// Texture coordinates of the quad corners for a flipbook cell.
///
/// Corner order matches the quad: top-left, top-right, bottom-left,
/// bottom-right. A `(1, 1)` grid yields the unit square.
pub fn sub_image_uvs(sub_image_size: Vec2, sub_image_index: f32) -> [Vec2; VERTICES_PER_SPRITE] {
    if sub_image_size == Vec2::new(1.0, 1.0) {
        return unit_uvs();
    }

    let columns = sub_image_size.x as i32;
    let rows = sub_image_size.y as i32;
    if columns <= 0 || rows <= 0 {
        return unit_uvs();
    }

    let row = (sub_image_index / sub_image_size.x).floor() as i32 % rows;
    let column = sub_image_index as i32 % columns;
    let delta = Vec2::new(1.0 / sub_image_size.x, 1.0 / sub_image_size.y);

    let left = delta.x * column as f32;
    let right = delta.x * (column + 1) as f32;
    let top = delta.y * row as f32;
    let bottom = delta.y * (row + 1) as f32;

    [
        Vec2::new(left, top),
        Vec2::new(right, top),
        Vec2::new(left, bottom),
        Vec2::new(right, bottom),
    ]
}

/// Sine and cosine of a sprite's screen rotation when aligned to `velocity`.
///
/// The cosine comes from the angle to UI up and the sine takes the sign of
/// the velocity's x component. In local space the angle is rebuilt from the
/// cosine so the component pitch can be taken off; the angle keeps the
/// sine's sign, so local and world space agree at zero pitch. A zero
/// velocity leaves the sprite unrotated.
pub fn velocity_rotation(velocity: &Vec3, local_pitch: f32, local_space: bool) -> (f32, f32) {
    let direction = Vec2::new(velocity.x, velocity.z);
    let normal = utils::safe_normal(direction);
    if normal == Vec2::zeros() {
        return (0.0, 1.0);
    }

    let cos = normal.dot(&Vec2::new(0.0, 1.0));
    let sin_sign = utils::sign(direction.x);

    if local_space {
        // Straight up or down has no x component; the unsigned angle is exact there
        let side = if sin_sign == 0.0 { 1.0 } else { sin_sign };
        let angle = side * cos.clamp(-1.0, 1.0).acos() - local_pitch;
        angle.sin_cos()
    } else {
        let sin = (1.0 - cos * cos).max(0.0).sqrt() * sin_sign;
        (sin, cos)
    }
}

/// Emit one quad per particle into a new batch.
///
/// Returns the number of batches added (always 1 on success).
pub fn build(
    attributes: &ParticleAttributeSet,
    renderer: &SpriteRendererProperties,
    projector: &Projector<'_>,
    data: &mut RenderData,
) -> Result<usize, SkipReason> {
    let count = attributes.num_particles();
    if count == 0 {
        return Err(SkipReason::NoParticles);
    }
    if !attributes.is_valid() {
        return Err(SkipReason::StaleAttributes);
    }

    let bindings = &renderer.bindings;
    let positions = attributes.reader::<Vec3>(&bindings.position);
    let colors = attributes.reader::<Vec4>(&bindings.color);
    let velocities = attributes.reader::<Vec3>(&bindings.velocity);
    let sizes = attributes.reader::<Vec2>(&bindings.size);
    let rotations = attributes.reader::<f32>(&bindings.rotation);
    let sub_images = attributes.reader::<f32>(&bindings.sub_image_index);
    let dynamic_material = attributes.reader::<Vec4>(&bindings.dynamic_material);

    let tint = projector.tint();
    let local_space = projector.is_local();
    let local_pitch = projector.local_pitch();
    let velocity_aligned = renderer.alignment == SpriteAlignment::VelocityAligned;

    let Some(region) = data.add_batch(
        renderer.common.material,
        count * VERTICES_PER_SPRITE,
        count * INDICES_PER_SPRITE,
    ) else {
        return Err(SkipReason::NoParticles);
    };

    let quads = region.vertices.chunks_exact_mut(VERTICES_PER_SPRITE);
    let quad_indices = region.indices.chunks_exact_mut(INDICES_PER_SPRITE);

    for (particle, (quad, indices)) in quads.zip(quad_indices).enumerate() {
        let sim_position = positions.get_or(particle, Vec3::zeros());
        let center = projector.position(&sim_position);
        let size = projector.size(sizes.get_or(particle, Vec2::new(1.0, 1.0)))
            * projector.depth_multiplier(&sim_position);
        let half = size * 0.5;

        let particle_color = colors.get_or(particle, color::white());
        let srgb = color::tinted_srgb_u8(particle_color, tint);

        let (sin, cos) = if velocity_aligned {
            velocity_rotation(&velocities.get_or(particle, Vec3::zeros()), local_pitch, local_space)
        } else {
            let degrees = rotations.get_or(particle, 0.0);
            (utils::deg_to_rad(degrees) - local_pitch).sin_cos()
        };

        let uvs = sub_image_uvs(renderer.sub_image_size, sub_images.get_or(particle, 0.0));
        let payload = dynamic_material.get_or(particle, Vec4::zeros());
        let uv1 = Vec2::new(payload.x, payload.y);

        // Opposite corners are negations, so the quad stays centered under rotation
        let c0 = utils::rotate_sin_cos(Vec2::new(-half.x, -half.y), sin, cos);
        let c1 = utils::rotate_sin_cos(Vec2::new(half.x, -half.y), sin, cos);
        let corners = [c0, c1, -c1, -c0];

        for ((vertex, corner), uv) in quad.iter_mut().zip(corners).zip(uvs) {
            *vertex = UiVertex::new(center + corner, srgb, uv, uv1);
        }

        let base = (particle * VERTICES_PER_SPRITE) as u32;
        for (index, offset) in indices.iter_mut().zip(QUAD_INDICES) {
            *index = base + offset;
        }
    }

    log::trace!("Sprite renderer '{}' emitted {} quads", renderer.common.name, count);
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::brush::BrushCache;
    use crate::render::projection::{ComponentTransform, RenderTransform};
    use crate::simulation::attributes::{AttributeColumn, AttributeName};
    use crate::simulation::emitter::SimulationSpace;
    use approx::assert_relative_eq;

    fn world_projector<'a>(component: &'a ComponentTransform, render: &'a RenderTransform) -> Projector<'a> {
        Projector::new(SimulationSpace::World, component, render, None)
    }

    #[test]
    fn test_sub_image_cell_uvs() {
        let uvs = sub_image_uvs(Vec2::new(4.0, 2.0), 5.0);
        assert_relative_eq!(uvs[0], Vec2::new(0.25, 0.5));
        assert_relative_eq!(uvs[1], Vec2::new(0.5, 0.5));
        assert_relative_eq!(uvs[2], Vec2::new(0.25, 1.0));
        assert_relative_eq!(uvs[3], Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_sub_image_index_wraps_rows() {
        let uvs = sub_image_uvs(Vec2::new(2.0, 2.0), 6.0);
        // row floor(6 / 2) % 2 = 1, column 6 % 2 = 0
        assert_relative_eq!(uvs[0], Vec2::new(0.0, 0.5));
        assert_relative_eq!(uvs[3], Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_unit_grid_uses_unit_square() {
        assert_eq!(sub_image_uvs(Vec2::new(1.0, 1.0), 3.0), unit_uvs());
    }

    #[test]
    fn test_velocity_rotation_world_space() {
        // Moving along +Z points the sprite up; cos = 1
        let (sin, cos) = velocity_rotation(&Vec3::new(0.0, 0.0, 5.0), 0.0, false);
        assert_relative_eq!(sin, 0.0);
        assert_relative_eq!(cos, 1.0);

        let (sin, cos) = velocity_rotation(&Vec3::new(3.0, 0.0, 0.0), 0.0, false);
        assert_relative_eq!(sin, 1.0);
        assert_relative_eq!(cos, 0.0, epsilon = 1.0e-6);

        let (sin, _) = velocity_rotation(&Vec3::new(-3.0, 0.0, 0.0), 0.0, false);
        assert_relative_eq!(sin, -1.0);
    }

    #[test]
    fn test_velocity_rotation_local_matches_world_without_pitch() {
        for velocity in [Vec3::new(1.0, 0.0, 2.0), Vec3::new(-4.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -3.0)] {
            let (world_sin, world_cos) = velocity_rotation(&velocity, 0.0, false);
            let (local_sin, local_cos) = velocity_rotation(&velocity, 0.0, true);
            assert_relative_eq!(local_sin, world_sin, epsilon = 1.0e-5);
            assert_relative_eq!(local_cos, world_cos, epsilon = 1.0e-5);
        }
    }

    #[test]
    fn test_leftward_velocity_keeps_negative_sine_in_local_space() {
        let (sin, cos) = velocity_rotation(&Vec3::new(-1.0, 0.0, 1.0), 0.0, true);
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(sin, -half_sqrt2, epsilon = 1.0e-5);
        assert_relative_eq!(cos, half_sqrt2, epsilon = 1.0e-5);
    }

    #[test]
    fn test_velocity_rotation_local_subtracts_pitch() {
        let (sin, cos) = velocity_rotation(&Vec3::new(1.0, 0.0, 0.0), 0.5, true);
        let expected = crate::foundation::math::constants::HALF_PI - 0.5;
        assert_relative_eq!(sin, expected.sin(), epsilon = 1.0e-5);
        assert_relative_eq!(cos, expected.cos(), epsilon = 1.0e-5);
    }

    #[test]
    fn test_zero_velocity_leaves_sprite_unrotated() {
        assert_eq!(velocity_rotation(&Vec3::zeros(), 0.3, true), (0.0, 1.0));
        assert_eq!(velocity_rotation(&Vec3::zeros(), 0.0, false), (0.0, 1.0));
    }

    #[test]
    fn test_counts_and_index_range() {
        let set = ParticleAttributeSet::new(5).with_column(
            AttributeName::POSITION,
            AttributeColumn::Vec3((0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()),
        );
        let component = ComponentTransform::identity();
        let render = RenderTransform::default();
        let mut data = RenderData::new(BrushCache::shared());

        let batches = build(&set, &SpriteRendererProperties::new("sprites"), &world_projector(&component, &render), &mut data);
        assert_eq!(batches, Ok(1));

        let batch = &data.batches()[0];
        assert_eq!(batch.vertices.len(), 20);
        assert_eq!(batch.indices.len(), 30);
        assert!(batch.indices.iter().all(|&index| index < 20));
    }

    #[test]
    fn test_empty_and_stale_sets_are_skipped() {
        let component = ComponentTransform::identity();
        let render = RenderTransform::default();
        let projector = world_projector(&component, &render);
        let renderer = SpriteRendererProperties::new("sprites");
        let mut data = RenderData::new(BrushCache::shared());

        let empty = ParticleAttributeSet::new(0);
        assert_eq!(build(&empty, &renderer, &projector, &mut data), Err(SkipReason::NoParticles));

        let mut stale = ParticleAttributeSet::new(2);
        stale.mark_stale();
        assert_eq!(build(&stale, &renderer, &projector, &mut data), Err(SkipReason::StaleAttributes));
        assert!(data.batches().is_empty());
    }

    #[test]
    fn test_explicit_rotation_turns_corners() {
        let set = ParticleAttributeSet::new(1)
            .with_column(AttributeName::SPRITE_SIZE, AttributeColumn::Vec2(vec![Vec2::new(2.0, 2.0)]))
            .with_column(AttributeName::SPRITE_ROTATION, AttributeColumn::Float(vec![90.0]));
        let component = ComponentTransform::identity();
        let render = RenderTransform::default();
        let mut data = RenderData::new(BrushCache::shared());

        build(&set, &SpriteRendererProperties::new("sprites"), &world_projector(&component, &render), &mut data)
            .expect("built");

        let vertices = &data.batches()[0].vertices;
        // (-1, -1) rotated by 90 degrees is (1, -1)
        assert_relative_eq!(vertices[0].position(), Vec2::new(1.0, -1.0), epsilon = 1.0e-6);
        assert_relative_eq!(vertices[3].position(), Vec2::new(-1.0, 1.0), epsilon = 1.0e-6);
    }

    #[test]
    fn test_dynamic_material_fills_upper_channels() {
        let set = ParticleAttributeSet::new(1).with_column(
            AttributeName::DYNAMIC_MATERIAL_PARAMETER,
            AttributeColumn::Vec4(vec![Vec4::new(0.3, 0.7, 9.0, 9.0)]),
        );
        let component = ComponentTransform::identity();
        let render = RenderTransform::default();
        let mut data = RenderData::new(BrushCache::shared());

        build(&set, &SpriteRendererProperties::new("sprites"), &world_projector(&component, &render), &mut data)
            .expect("built");

        for vertex in &data.batches()[0].vertices {
            assert_eq!(vertex.uv1(), Vec2::new(0.3, 0.7));
        }
    }

    #[test]
    fn test_fake_depth_shrinks_quad() {
        let set = ParticleAttributeSet::new(1)
            .with_column(AttributeName::POSITION, AttributeColumn::Vec3(vec![Vec3::new(0.0, 50.0, 0.0)]))
            .with_column(AttributeName::SPRITE_SIZE, AttributeColumn::Vec2(vec![Vec2::new(4.0, 4.0)]));
        let component = ComponentTransform::identity();
        let render = RenderTransform::default();
        let projector = Projector::new(SimulationSpace::World, &component, &render, Some(100.0));
        let mut data = RenderData::new(BrushCache::shared());

        build(&set, &SpriteRendererProperties::new("sprites"), &projector, &mut data).expect("built");

        let vertices = &data.batches()[0].vertices;
        assert_relative_eq!(vertices[0].position(), Vec2::new(-1.0, -1.0));
        assert_relative_eq!(vertices[3].position(), Vec2::new(1.0, 1.0));
    }
}
