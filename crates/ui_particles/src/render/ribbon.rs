//! Ribbon strips
//!
//! Particles sharing a ribbon id are ordered by their link-order key and
//! joined into a quad strip: two vertices per particle, offset to either
//! side of the strip's tangent, and two triangles per segment.

use super::collector::RenderData;
use super::projection::{flatten, Projector};
use super::vertex::UiVertex;
use super::SkipReason;
use crate::foundation::color;
use crate::foundation::math::{utils, Vec2, Vec3, Vec4};
use crate::simulation::attributes::{AttributeName, ParticleAttributeSet, ParticleId};
use crate::simulation::reader::LinkOrderReader;
use crate::simulation::renderer::{RibbonRendererProperties, RibbonUvDistribution, RibbonUvSettings};
use std::collections::BTreeMap;

/// Fewest particles that form a strip
pub const MIN_RIBBON_PARTICLES: usize = 2;

/// Width used when the emitter writes none
pub const DEFAULT_RIBBON_WIDTH: f32 = 1.0;

/// Partition particle rows by ribbon id, ids ascending, rows in input order.
///
/// Without an id column every particle belongs to one ribbon.
pub fn group_particles(attributes: &ParticleAttributeSet, id_name: &AttributeName) -> Vec<Vec<usize>> {
    let count = attributes.num_particles();
    let ids = attributes.reader::<ParticleId>(id_name);
    if !ids.is_bound() {
        return vec![(0..count).collect()];
    }

    let mut groups: BTreeMap<ParticleId, Vec<usize>> = BTreeMap::new();
    for particle in 0..count {
        let id = ids.get_or(particle, ParticleId::default());
        groups.entry(id).or_default().push(particle);
    }
    groups.into_values().collect()
}

/// Unit directions between consecutive points.
///
/// A zero-length segment takes the direction of the segment before it (or
/// the first real one after it at the start of the strip).
fn segment_directions(points: &[Vec2]) -> Vec<Vec2> {
    let mut directions: Vec<Vec2> = points
        .windows(2)
        .map(|pair| utils::safe_normal(pair[1] - pair[0]))
        .collect();

    let first_real = directions
        .iter()
        .copied()
        .find(|direction| *direction != Vec2::zeros())
        .unwrap_or_else(Vec2::x);

    let mut previous = first_real;
    for direction in &mut directions {
        if *direction == Vec2::zeros() {
            *direction = previous;
        }
        previous = *direction;
    }
    directions
}

/// Tangent at every point of the strip.
///
/// The ends use their only segment; interior points average the incoming
/// and outgoing directions so joints do not kink.
fn tangents(directions: &[Vec2]) -> Vec<Vec2> {
    let Some((&first, rest)) = directions.split_first() else {
        return Vec::new();
    };

    let mut tangents = Vec::with_capacity(directions.len() + 1);
    tangents.push(first);
    for pair in directions.windows(2) {
        let averaged = utils::safe_normal(pair[0] + pair[1]);
        // A full reversal cancels out; keep the incoming direction
        tangents.push(if averaged == Vec2::zeros() { pair[0] } else { averaged });
    }
    tangents.push(rest.last().copied().unwrap_or(first));
    tangents
}

/// U coordinate of every step for one UV channel
fn u_coordinates(settings: &RibbonUvSettings, distances: &[f32]) -> Vec<f32> {
    let last_step = distances.len().saturating_sub(1).max(1) as f32;
    let tiled = settings.distribution == RibbonUvDistribution::TiledOverRibbonLength
        && settings.tiling_length > 0.0;

    distances
        .iter()
        .enumerate()
        .map(|(step, distance)| {
            if tiled {
                distance / settings.tiling_length
            } else {
                step as f32 / last_step
            }
        })
        .collect()
}

struct StripInputs<'a, 'p> {
    attributes: &'a ParticleAttributeSet,
    renderer: &'a RibbonRendererProperties,
    projector: &'a Projector<'p>,
    dynamic_params_as_uv1: bool,
}

fn emit_strip(inputs: &StripInputs<'_, '_>, order: &[usize], data: &mut RenderData) -> bool {
    let steps = order.len();
    let bindings = &inputs.renderer.bindings;
    let attributes = inputs.attributes;
    let projector = inputs.projector;

    let positions = attributes.reader::<Vec3>(&bindings.position);
    let colors = attributes.reader::<Vec4>(&bindings.color);
    let widths = attributes.reader::<f32>(&bindings.width);
    let dynamic_material = attributes.reader::<Vec4>(&bindings.dynamic_material);

    let sim_positions: Vec<Vec3> = order
        .iter()
        .map(|&particle| positions.get_or(particle, Vec3::zeros()))
        .collect();
    let ui_positions: Vec<Vec2> = sim_positions.iter().map(|sim| projector.position(sim)).collect();
    let tangents = tangents(&segment_directions(&ui_positions));

    // Arc length is measured in simulation units so tiling ignores UI scale
    let mut distances = Vec::with_capacity(steps);
    let mut travelled = 0.0;
    for (step, sim) in sim_positions.iter().enumerate() {
        if step > 0 {
            travelled += (flatten(sim) - flatten(&sim_positions[step - 1])).norm();
        }
        distances.push(travelled);
    }
    let u0 = u_coordinates(&inputs.renderer.uv0, &distances);
    let u1 = u_coordinates(&inputs.renderer.uv1, &distances);

    let tint = projector.tint();
    let scale_factor = projector.scale_factor();

    let Some(region) = data.add_batch(
        inputs.renderer.common.material,
        steps * 2,
        (steps - 1) * 6,
    ) else {
        return false;
    };

    for (step, &particle) in order.iter().enumerate() {
        let half_width = widths.get_or(particle, DEFAULT_RIBBON_WIDTH) * scale_factor * 0.5;
        let offset = utils::perpendicular(tangents[step]) * half_width;
        let center = ui_positions[step];
        let srgb = color::tinted_srgb_u8(colors.get_or(particle, color::white()), tint);

        let (uv1_left, uv1_right) = if inputs.dynamic_params_as_uv1 {
            let payload = dynamic_material.get_or(particle, Vec4::zeros());
            let packed = Vec2::new(payload.x, payload.y);
            (packed, packed)
        } else {
            (Vec2::new(u1[step], 1.0), Vec2::new(u1[step], 0.0))
        };

        let vertex = step * 2;
        region.vertices[vertex] = UiVertex::new(center + offset, srgb, Vec2::new(u0[step], 1.0), uv1_left);
        region.vertices[vertex + 1] = UiVertex::new(center - offset, srgb, Vec2::new(u0[step], 0.0), uv1_right);

        if step > 0 {
            let current = vertex as u32;
            let indices = &mut region.indices[(step - 1) * 6..step * 6];
            indices.copy_from_slice(&[current - 2, current - 1, current, current - 1, current, current + 1]);
        }
    }

    true
}

/// Emit one strip per ribbon of the emitter.
///
/// Returns the number of batches added; groups with fewer than
/// [`MIN_RIBBON_PARTICLES`] particles are skipped without error.
pub fn build(
    attributes: &ParticleAttributeSet,
    renderer: &RibbonRendererProperties,
    projector: &Projector<'_>,
    dynamic_params_as_uv1: bool,
    data: &mut RenderData,
) -> Result<usize, SkipReason> {
    let count = attributes.num_particles();
    if count == 0 {
        return Err(SkipReason::NoParticles);
    }
    if count < MIN_RIBBON_PARTICLES {
        return Err(SkipReason::TooFewParticles {
            count,
            required: MIN_RIBBON_PARTICLES,
        });
    }
    if !attributes.is_valid() {
        return Err(SkipReason::StaleAttributes);
    }

    let link_order = LinkOrderReader::new(attributes, &renderer.bindings.link_order)
        .ok_or_else(|| SkipReason::MissingBinding(renderer.bindings.link_order.clone()))?;

    let inputs = StripInputs {
        attributes,
        renderer,
        projector,
        dynamic_params_as_uv1,
    };

    let mut batches = 0;
    for mut group in group_particles(attributes, &renderer.bindings.ribbon_id) {
        if group.len() < MIN_RIBBON_PARTICLES {
            log::trace!("Ribbon group of {} particle(s) skipped", group.len());
            continue;
        }
        link_order.sort(&mut group);
        if emit_strip(&inputs, &group, data) {
            batches += 1;
        }
    }

    log::trace!("Ribbon renderer '{}' emitted {} strips", renderer.common.name, batches);
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::brush::BrushCache;
    use crate::render::projection::{ComponentTransform, RenderTransform};
    use crate::simulation::attributes::AttributeColumn;
    use crate::simulation::emitter::SimulationSpace;
    use approx::assert_relative_eq;

    fn line_set(count: usize) -> ParticleAttributeSet {
        ParticleAttributeSet::new(count)
            .with_column(
                AttributeName::POSITION,
                AttributeColumn::Vec3((0..count).map(|i| Vec3::new(i as f32 * 10.0, 0.0, 0.0)).collect()),
            )
            .with_column(
                AttributeName::RIBBON_LINK_ORDER,
                AttributeColumn::Float((0..count).map(|i| i as f32).collect()),
            )
    }

    fn build_world(set: &ParticleAttributeSet, renderer: &RibbonRendererProperties) -> (Result<usize, SkipReason>, RenderData) {
        let component = ComponentTransform::identity();
        let render = RenderTransform::default();
        let projector = Projector::new(SimulationSpace::World, &component, &render, None);
        let mut data = RenderData::new(BrushCache::shared());
        let result = build(set, renderer, &projector, false, &mut data);
        (result, data)
    }

    #[test]
    fn test_strip_counts() {
        for count in 2..6 {
            let (result, data) = build_world(&line_set(count), &RibbonRendererProperties::new("ribbon"));
            assert_eq!(result, Ok(1));
            let batch = &data.batches()[0];
            assert_eq!(batch.vertices.len(), 2 * count);
            assert_eq!(batch.indices.len(), 6 * (count - 1));
            assert!(batch.indices.iter().all(|&index| (index as usize) < 2 * count));
        }
    }

    #[test]
    fn test_single_particle_is_skipped() {
        let (result, data) = build_world(&line_set(1), &RibbonRendererProperties::new("ribbon"));
        assert_eq!(result, Err(SkipReason::TooFewParticles { count: 1, required: 2 }));
        assert!(data.batches().is_empty());
    }

    #[test]
    fn test_missing_link_order_skips_renderer() {
        let set = ParticleAttributeSet::new(3).with_column(
            AttributeName::POSITION,
            AttributeColumn::Vec3(vec![Vec3::zeros(); 3]),
        );
        let (result, _) = build_world(&set, &RibbonRendererProperties::new("ribbon"));
        assert_eq!(result, Err(SkipReason::MissingBinding(AttributeName::RIBBON_LINK_ORDER)));
    }

    #[test]
    fn test_straight_strip_geometry() {
        let set = line_set(3).with_column(AttributeName::RIBBON_WIDTH, AttributeColumn::Float(vec![2.0; 3]));
        let (_, data) = build_world(&set, &RibbonRendererProperties::new("ribbon"));
        let batch = &data.batches()[0];

        // Tangent +X, perpendicular +Y, half width 1
        assert_relative_eq!(batch.vertices[0].position(), Vec2::new(0.0, 1.0));
        assert_relative_eq!(batch.vertices[1].position(), Vec2::new(0.0, -1.0));
        assert_relative_eq!(batch.vertices[4].position(), Vec2::new(20.0, 1.0));
        assert_eq!(&batch.indices[..6], &[0, 1, 2, 1, 2, 3]);
        assert_eq!(&batch.indices[6..], &[2, 3, 4, 3, 4, 5]);
    }

    #[test]
    fn test_stretched_and_tiled_uvs() {
        let renderer = RibbonRendererProperties::new("ribbon").with_uv0(RibbonUvSettings {
            distribution: RibbonUvDistribution::TiledOverRibbonLength,
            tiling_length: 5.0,
        });
        let (_, data) = build_world(&line_set(3), &renderer);
        let vertices = &data.batches()[0].vertices;

        let u0: Vec<f32> = vertices.iter().step_by(2).map(|vertex| vertex.uv0().x).collect();
        assert_eq!(u0, vec![0.0, 2.0, 4.0]);
        let u1: Vec<f32> = vertices.iter().step_by(2).map(|vertex| vertex.uv1().x).collect();
        assert_eq!(u1, vec![0.0, 0.5, 1.0]);

        assert_eq!(vertices[2].uv0().y, 1.0);
        assert_eq!(vertices[3].uv0().y, 0.0);
    }

    #[test]
    fn test_dynamic_params_replace_uv1() {
        let set = line_set(2).with_column(
            AttributeName::DYNAMIC_MATERIAL_PARAMETER,
            AttributeColumn::Vec4(vec![Vec4::new(0.1, 0.2, 0.0, 0.0), Vec4::new(0.3, 0.4, 0.0, 0.0)]),
        );
        let component = ComponentTransform::identity();
        let render = RenderTransform::default();
        let projector = Projector::new(SimulationSpace::World, &component, &render, None);
        let mut data = RenderData::new(BrushCache::shared());
        build(&set, &RibbonRendererProperties::new("ribbon"), &projector, true, &mut data).expect("built");

        let vertices = &data.batches()[0].vertices;
        assert_eq!(vertices[0].uv1(), Vec2::new(0.1, 0.2));
        assert_eq!(vertices[1].uv1(), Vec2::new(0.1, 0.2));
        assert_eq!(vertices[3].uv1(), Vec2::new(0.3, 0.4));
    }

    #[test]
    fn test_interior_tangent_averages_segments() {
        let directions = [Vec2::x(), Vec2::y()];
        let tangents = tangents(&directions);
        assert_eq!(tangents.len(), 3);
        assert_eq!(tangents[0], Vec2::x());
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(tangents[1], Vec2::new(half, half), epsilon = 1.0e-6);
        assert_eq!(tangents[2], Vec2::y());
    }

    #[test]
    fn test_degenerate_segments_reuse_neighbouring_direction() {
        let points = [Vec2::zeros(), Vec2::zeros(), Vec2::new(0.0, 3.0), Vec2::new(0.0, 3.0)];
        assert_eq!(segment_directions(&points), vec![Vec2::y(), Vec2::y(), Vec2::y()]);
    }

    #[test]
    fn test_groups_follow_id_order() {
        let set = ParticleAttributeSet::new(4).with_column(
            AttributeName::RIBBON_ID,
            AttributeColumn::Id(vec![
                ParticleId::new(2, 0),
                ParticleId::new(1, 0),
                ParticleId::new(2, 0),
                ParticleId::new(1, 0),
            ]),
        );
        assert_eq!(group_particles(&set, &AttributeName::RIBBON_ID), vec![vec![1, 3], vec![0, 2]]);
    }

    #[test]
    fn test_lone_particle_group_is_skipped_beside_full_ribbon() {
        let set = ParticleAttributeSet::new(4)
            .with_column(
                AttributeName::POSITION,
                AttributeColumn::Vec3(vec![Vec3::zeros(), Vec3::x(), Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)]),
            )
            .with_column(
                AttributeName::RIBBON_ID,
                AttributeColumn::Id(vec![
                    ParticleId::new(1, 0),
                    ParticleId::new(1, 0),
                    ParticleId::new(1, 0),
                    ParticleId::new(0, 0),
                ]),
            )
            .with_column(AttributeName::RIBBON_LINK_ORDER, AttributeColumn::Float(vec![2.0, 1.0, 0.0, 0.0]));

        let (result, data) = build_world(&set, &RibbonRendererProperties::new("ribbon"));
        assert_eq!(result, Ok(1));
        assert_eq!(data.batches().len(), 1);

        let batch = &data.batches()[0];
        assert_eq!(batch.vertices.len(), 6);
        assert_eq!(batch.indices.len(), 12);

        // Lowest link key first: particle 2, then 1, then 0
        let xs: Vec<f32> = batch.vertices.iter().map(|vertex| vertex.position().x).collect();
        for (found, expected) in xs.iter().zip([2.0, 2.0, 1.0, 1.0, 0.0, 0.0]) {
            assert_relative_eq!(*found, expected, epsilon = 1.0e-5);
        }
    }
}
