//! # Particle Widget
//!
//! The UI-facing side: layout input, lifecycle and the per-frame orchestrator.

pub mod layout;
pub mod lifecycle;
pub mod particle_widget;

pub use layout::{matrix_scale, rotation_angle, LayoutGeometry};
pub use lifecycle::{WidgetLifecycle, WidgetState};
pub use particle_widget::{ParticleWidget, WidgetError, BRUSH_PURGE_INTERVAL};
