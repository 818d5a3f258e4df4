//! Emitter instances as seen by the UI renderer

use super::attributes::ParticleAttributeSet;
use super::renderer::RendererProperties;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where an emitter is simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimTarget {
    /// CPU simulation; attribute buffers are readable
    #[default]
    Cpu,
    /// GPU compute simulation; buffers are opaque to this crate
    Gpu,
}

/// Whether particle positions are relative to the owning component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationSpace {
    /// Relative to the component transform
    Local,
    /// Absolute
    #[default]
    World,
}

/// One emitter of a running system: configuration plus its latest tick
#[derive(Debug, Clone)]
pub struct EmitterInstance {
    /// Emitter name
    pub name: String,
    /// Disabled emitters are not rendered
    pub enabled: bool,
    /// Simulation target
    pub sim_target: SimTarget,
    /// Position space
    pub space: SimulationSpace,
    /// Renderer configurations, in authoring order
    pub renderers: Vec<RendererProperties>,
    /// Particle data of the current tick, shared with the simulation
    pub attributes: Arc<ParticleAttributeSet>,
}

impl EmitterInstance {
    /// Enabled CPU emitter in world space without renderers or particles
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            sim_target: SimTarget::Cpu,
            space: SimulationSpace::World,
            renderers: Vec::new(),
            attributes: Arc::new(ParticleAttributeSet::new(0)),
        }
    }

    /// Builder pattern: set simulation target
    pub fn with_sim_target(mut self, target: SimTarget) -> Self {
        self.sim_target = target;
        self
    }

    /// Builder pattern: set position space
    pub fn with_space(mut self, space: SimulationSpace) -> Self {
        self.space = space;
        self
    }

    /// Builder pattern: append a renderer
    pub fn with_renderer(mut self, renderer: impl Into<RendererProperties>) -> Self {
        self.renderers.push(renderer.into());
        self
    }

    /// Builder pattern: set particle data
    pub fn with_attributes(mut self, attributes: ParticleAttributeSet) -> Self {
        self.attributes = Arc::new(attributes);
        self
    }

    /// Whether positions are component-relative
    pub fn is_local_space(&self) -> bool {
        self.space == SimulationSpace::Local
    }

    /// Replace the particle data with a new tick
    pub fn set_attributes(&mut self, attributes: Arc<ParticleAttributeSet>) {
        self.attributes = attributes;
    }
}
