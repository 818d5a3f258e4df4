//! Particle simulation data as consumed by the UI renderer

pub mod attributes;
pub mod emitter;
pub mod host;
pub mod material;
pub mod reader;
pub mod renderer;

pub use attributes::{AttributeColumn, AttributeName, ParticleAttributeSet, ParticleId};
pub use emitter::{EmitterInstance, SimTarget, SimulationSpace};
pub use host::{ParticleSimulation, SimulationSpawner, SpawnError, SpawnSettings, SystemAsset};
pub use material::{Material, MaterialDomain, MaterialId, MaterialLibrary};
pub use reader::{AttributeReader, AttributeType, LinkOrderReader};
pub use renderer::{
    OtherRendererProperties, RendererCommon, RendererProperties, RibbonBindings,
    RibbonRendererProperties, RibbonUvDistribution, RibbonUvSettings, SpriteAlignment,
    SpriteBindings, SpriteRendererProperties,
};
