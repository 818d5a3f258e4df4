//! Contracts with the external particle simulation
//!
//! The widget never simulates particles itself. It asks a
//! [`SimulationSpawner`] for a [`ParticleSimulation`] once, forwards its
//! transform and flags every paint, and reads the emitters back.

use super::emitter::EmitterInstance;
use crate::render::projection::ComponentTransform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a particle system asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemAsset(pub String);

impl SystemAsset {
    /// Create a handle from the asset name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Asset name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settings passed to the spawner when a widget initializes
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSettings {
    /// Activation is driven by the widget; spawners must honor `false`
    pub auto_activate: bool,
    /// Keep simulating while the host is paused
    pub tick_when_paused: bool,
    /// Hide the simulation's own world-space rendering
    pub hidden_in_world: bool,
    /// Initial component transform
    pub transform: ComponentTransform,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            auto_activate: false,
            tick_when_paused: false,
            hidden_in_world: true,
            transform: ComponentTransform::identity(),
        }
    }
}

/// Spawner failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// The asset is unknown to the spawner
    #[error("Particle system not found: {0}")]
    AssetNotFound(String),

    /// The host cannot create simulations right now (no world, shutting down)
    #[error("Simulation host unavailable: {0}")]
    Unavailable(String),
}

/// A running particle simulation owned by one widget
pub trait ParticleSimulation {
    /// Emitters with their latest particle data
    fn emitters(&self) -> &[EmitterInstance];

    /// Start simulating; `reset` restarts from the first frame
    fn activate(&mut self, reset: bool);

    /// Stop spawning new particles
    fn deactivate(&mut self);

    /// Whether the simulation is running
    fn is_active(&self) -> bool;

    /// Forward the UI-derived transform
    fn set_component_transform(&mut self, transform: &ComponentTransform);

    /// Swap the simulated asset
    fn set_asset(&mut self, system: &SystemAsset);

    /// Restart from the first frame
    fn reset(&mut self);

    /// Keep simulating while the host is paused
    fn set_tick_when_paused(&mut self, tick: bool);

    /// Hide or show the simulation's own world-space rendering
    fn set_hidden_in_world(&mut self, hidden: bool);
}

/// Factory for simulations, provided by the host
pub trait SimulationSpawner {
    /// Create a simulation of `system`
    fn spawn(
        &mut self,
        system: &SystemAsset,
        settings: &SpawnSettings,
    ) -> Result<Box<dyn ParticleSimulation>, SpawnError>;
}
