//! # UI Particles
//!
//! Draws particle simulations inside a retained-mode UI. Every paint, the
//! sprite and ribbon renderers of each CPU emitter are projected from
//! simulation space into UI space and emitted as triangle-list batches,
//! one per material.
//!
//! ## Features
//!
//! - **Sprites**: centered quads with explicit or velocity-aligned rotation,
//!   flipbook slicing and fake depth scaling
//! - **Ribbons**: quad strips grouped by ribbon id, ordered by link key,
//!   with smooth joints and tiled or stretched UVs
//! - **Materials**: per-widget remap table and a brush cache shared between
//!   widgets
//! - **Lifecycle**: lazy spawning with retry, auto activation, release
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ui_particles::prelude::*;
//!
//! fn paint_frame(widget: &mut ParticleWidget) {
//!     let geometry = LayoutGeometry::new(1.0, Vec2::zeros(), Vec2::new(64.0, 64.0));
//!     for batch in widget.paint(&geometry) {
//!         println!("{} triangles with {:?}", batch.triangle_count(), batch.material);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod foundation;
pub mod render;
pub mod simulation;
pub mod widget;

#[cfg(test)]
mod tests;

/// Common imports for widget hosts
pub mod prelude {
    pub use crate::{
        core::{Config, ConfigError, MaterialRemap, WidgetRenderOptions},
        diagnostics::Advisory,
        foundation::math::{Mat2, Vec2, Vec3, Vec4},
        render::{BrushCache, ComponentTransform, RenderBatch, UiVertex},
        simulation::{
            AttributeColumn, AttributeName, EmitterInstance, Material, MaterialDomain, MaterialId,
            MaterialLibrary, ParticleAttributeSet, ParticleId, ParticleSimulation, RendererProperties,
            RibbonRendererProperties, SimTarget, SimulationSpace, SimulationSpawner, SpawnError,
            SpawnSettings, SpriteAlignment, SpriteRendererProperties, SystemAsset,
        },
        widget::{LayoutGeometry, ParticleWidget, WidgetError, WidgetState},
    };
}
