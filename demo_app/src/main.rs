//! Particle widget demo
//!
//! Paints a synthetic particle system into a UI widget for a few seconds of
//! simulated time and logs the batches it produces.
//!
//! Usage: `particle_widget_demo [options.toml|options.ron] [frames]`

mod simulation;

use simulation::{DemoSpawner, HostClock, SPARK_MATERIAL, TRAIL_MATERIAL, UI_SPARK_MATERIAL};
use std::rc::Rc;
use std::sync::Arc;
use ui_particles::diagnostics;
use ui_particles::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 180;
const REPORT_EVERY: u32 = 30;

fn material_library() -> MaterialLibrary {
    MaterialLibrary::new()
        .with(Material::new(SPARK_MATERIAL, "M_Spark", MaterialDomain::Surface))
        .with(Material::new(TRAIL_MATERIAL, "M_CometTrail", MaterialDomain::Surface))
        .with(Material::new(UI_SPARK_MATERIAL, "MI_UiSpark", MaterialDomain::UserInterface))
}

fn demo_options() -> WidgetRenderOptions {
    WidgetRenderOptions::default()
        .with_fake_depth(800.0)
        .with_material_remap(MaterialRemap::new().with(SPARK_MATERIAL, UI_SPARK_MATERIAL))
}

/// Add placeholder remap entries for every non-UI material still unmapped
fn adopt_remap_suggestions(widget: &mut ParticleWidget, library: &MaterialLibrary) {
    let suggestions = match widget.simulation() {
        Some(simulation) => diagnostics::suggest_remap_entries(simulation.emitters(), widget.options(), library),
        None => return,
    };
    if suggestions.is_empty() {
        return;
    }

    let mut options = widget.options().clone();
    let added = diagnostics::apply_suggestions(&mut options.material_remap, &suggestions);
    log::info!("Added {} placeholder remap entries: {:?}", added, suggestions);
    widget.set_options(options);
}

fn paint_frame(widget: &mut ParticleWidget, geometry: &LayoutGeometry, frame: u32) {
    let batches = widget.paint(geometry);
    if frame % REPORT_EVERY != 0 {
        return;
    }

    let triangles: usize = batches.iter().map(RenderBatch::triangle_count).sum();
    let batch_count = batches.len();
    for batch in batches {
        log::debug!(
            "  material {:?}: {} vertices, {} indices",
            batch.material,
            batch.vertices.len(),
            batch.indices.len()
        );
    }
    log::info!(
        "Frame {}: {} batches, {} triangles, widget {}",
        frame,
        batch_count,
        triangles,
        widget.state()
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ui_particles::foundation::logging::init();
    log::info!("Starting particle widget demo");

    let mut args = std::env::args().skip(1);
    let options = match args.next() {
        Some(path) => {
            log::info!("Loading widget options from {}", path);
            WidgetRenderOptions::load_from_file(&path)?
        }
        None => demo_options(),
    };
    let frames = args.next().map(|count| count.parse::<u32>()).transpose()?.unwrap_or(DEFAULT_FRAMES);

    let library = material_library();
    let clock = HostClock::default();
    let brushes = BrushCache::shared();
    let mut widget = ParticleWidget::new(
        SystemAsset::new("NS_Fountain"),
        Box::new(DemoSpawner::new(Rc::clone(&clock))),
        Arc::clone(&brushes),
        options,
    );

    let geometry = LayoutGeometry::new(1.5, Vec2::new(40.0, 40.0), Vec2::new(280.0, 220.0))
        .with_tint(Vec4::new(1.0, 1.0, 1.0, 0.9));

    for frame in 0..frames {
        clock.set(frame as f32 * FRAME_TIME);
        paint_frame(&mut widget, &geometry, frame);

        if frame == 1 {
            for advisory in widget.diagnose(&library) {
                log::warn!("{}", advisory);
            }
            adopt_remap_suggestions(&mut widget, &library);
        }
    }

    log::info!("Pausing simulation");
    widget.deactivate()?;
    log::info!("Batches while inactive: {}", widget.paint(&geometry).len());
    widget.activate(true)?;

    widget.release();
    log::info!(
        "Demo finished: widget {}, {} cached brushes, {} purged",
        widget.state(),
        brushes.len(),
        brushes.purge_unreferenced()
    );
    Ok(())
}
