//! # UI Mesh Rendering
//!
//! Turns emitter particle data into batches of UI vertices and indices.
//!
//! ## Organization
//!
//! - **projection**: simulation space to UI space, shared by all builders
//! - **sprite** / **ribbon**: per-renderer mesh builders
//! - **collector**: the frame's batches plus remap and brush resolution
//! - **brush**: the brush cache shared between widgets

pub mod brush;
pub mod collector;
pub mod projection;
pub mod ribbon;
pub mod sprite;
pub mod vertex;

pub use brush::{BrushCache, MaterialBrush};
pub use collector::{BatchRegion, RenderBatch, RenderData};
pub use projection::{depth_scale, project_position, project_vector, ComponentTransform, Projector, RenderTransform};
pub use vertex::UiVertex;

use crate::simulation::attributes::AttributeName;
use crate::simulation::emitter::SimTarget;

/// Why a renderer produced no geometry this frame.
///
/// Never fatal: the widget logs it and moves on to the next renderer.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The emitter has no live particles
    #[error("no particles")]
    NoParticles,

    /// Not enough particles to build the primitive
    #[error("{count} particle(s), at least {required} required")]
    TooFewParticles {
        /// Particles available
        count: usize,
        /// Particles needed
        required: usize,
    },

    /// The attribute buffer does not match the simulation
    #[error("attribute data is stale")]
    StaleAttributes,

    /// A required attribute is not written by the emitter
    #[error("attribute '{0}' is not bound")]
    MissingBinding(AttributeName),

    /// The renderer cannot read this emitter's simulation
    #[error("sim target {0:?} is not supported")]
    UnsupportedSimTarget(SimTarget),
}
