//! # Particle Widget
//!
//! Frame orchestrator between a UI paint pass and an external particle
//! simulation. Each paint it lazily spawns the simulation, forwards the
//! layout-derived transform, then walks every emitter's renderers in sort
//! order and rebuilds the frame's batches from scratch.

use super::layout::LayoutGeometry;
use super::lifecycle::{WidgetLifecycle, WidgetState};
use crate::config::Config;
use crate::core::options::WidgetRenderOptions;
use crate::diagnostics::{self, Advisory};
use crate::render::brush::BrushCache;
use crate::render::collector::{RenderBatch, RenderData};
use crate::render::projection::Projector;
use crate::render::{ribbon, sprite, SkipReason};
use crate::simulation::emitter::{EmitterInstance, SimTarget};
use crate::simulation::host::{ParticleSimulation, SimulationSpawner, SpawnError, SpawnSettings, SystemAsset};
use crate::simulation::material::MaterialLibrary;
use crate::simulation::renderer::RendererProperties;
use std::collections::HashSet;
use std::sync::Arc;

/// Paints between brush cache maintenance passes
pub const BRUSH_PURGE_INTERVAL: u64 = 120;

/// Errors from widget lifecycle calls
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// The spawner could not create the simulation
    #[error("Failed to spawn simulation: {0}")]
    Spawn(#[from] SpawnError),

    /// The widget has been released
    #[error("Widget has been released")]
    Released,

    /// The call needs a simulation and none exists yet
    #[error("Widget has no simulation yet")]
    NotInitialized,
}

/// A UI element that draws a particle system
pub struct ParticleWidget {
    system: SystemAsset,
    options: WidgetRenderOptions,
    spawner: Box<dyn SimulationSpawner>,
    simulation: Option<Box<dyn ParticleSimulation>>,
    lifecycle: WidgetLifecycle,
    render_data: RenderData,
    warned_gpu_emitters: HashSet<String>,
    paints: u64,
}

impl ParticleWidget {
    /// Create a widget; the simulation is spawned on first paint
    pub fn new(
        system: SystemAsset,
        spawner: Box<dyn SimulationSpawner>,
        brushes: Arc<BrushCache>,
        options: WidgetRenderOptions,
    ) -> Self {
        let mut render_data = RenderData::new(brushes);
        render_data.set_remap(options.material_remap.clone());

        Self {
            system,
            options,
            spawner,
            simulation: None,
            lifecycle: WidgetLifecycle::new(),
            render_data,
            warned_gpu_emitters: HashSet::new(),
            paints: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> WidgetState {
        self.lifecycle.state()
    }

    /// Current options
    pub fn options(&self) -> &WidgetRenderOptions {
        &self.options
    }

    /// Simulated asset
    pub fn system(&self) -> &SystemAsset {
        &self.system
    }

    /// The live simulation, once initialized
    pub fn simulation(&self) -> Option<&dyn ParticleSimulation> {
        self.simulation.as_deref()
    }

    /// Batches of the last paint
    pub fn batches(&self) -> &[RenderBatch] {
        self.render_data.batches()
    }

    /// Collector of the last paint
    pub fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    /// Spawn the simulation if it does not exist yet.
    ///
    /// On failure the widget stays `Uninitialized` and the next paint tries again.
    pub fn initialize(&mut self) -> Result<(), WidgetError> {
        if self.lifecycle.is_released() {
            return Err(WidgetError::Released);
        }
        if self.simulation.is_some() {
            return Ok(());
        }

        let settings = SpawnSettings {
            auto_activate: false,
            tick_when_paused: self.options.tick_when_paused,
            hidden_in_world: !self.options.show_debug_in_world,
            ..SpawnSettings::default()
        };

        match self.spawner.spawn(&self.system, &settings) {
            Ok(simulation) => {
                log::debug!("Spawned simulation for '{}'", self.system);
                self.simulation = Some(simulation);
                self.lifecycle.initialized(self.options.auto_activate);
                Ok(())
            }
            Err(error) => {
                let attempts = self.lifecycle.spawn_failed();
                log::warn!(
                    "Could not spawn '{}' (attempt {}): {}; retrying on next paint",
                    self.system,
                    attempts,
                    error
                );
                Err(error.into())
            }
        }
    }

    /// Start the simulation; `reset` restarts it from the first frame
    pub fn activate(&mut self, reset: bool) -> Result<(), WidgetError> {
        let simulation = self.live_simulation()?;
        simulation.activate(reset);
        self.lifecycle.activate();
        Ok(())
    }

    /// Stop the simulation; nothing is drawn until it is activated again
    pub fn deactivate(&mut self) -> Result<(), WidgetError> {
        let simulation = self.live_simulation()?;
        simulation.deactivate();
        self.lifecycle.deactivate();
        self.render_data.clear();
        Ok(())
    }

    /// Drop the simulation and all batches. Terminal.
    pub fn release(&mut self) {
        if self.lifecycle.is_released() {
            return;
        }
        self.simulation = None;
        self.render_data.clear();
        self.warned_gpu_emitters.clear();
        self.lifecycle.release();
        log::debug!("Released widget for '{}'", self.system);
    }

    /// Swap the simulated asset; a live simulation is reset
    pub fn set_system(&mut self, system: SystemAsset) -> Result<(), WidgetError> {
        if self.lifecycle.is_released() {
            return Err(WidgetError::Released);
        }

        self.system = system;
        self.warned_gpu_emitters.clear();
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_asset(&self.system);
            simulation.reset();
        }
        Ok(())
    }

    /// Keep simulating while the host is paused; a live simulation is reset
    pub fn set_tick_when_paused(&mut self, tick: bool) -> Result<(), WidgetError> {
        if self.lifecycle.is_released() {
            return Err(WidgetError::Released);
        }

        self.options.tick_when_paused = tick;
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_tick_when_paused(tick);
            simulation.reset();
        }
        Ok(())
    }

    /// Replace the options. The simulation is kept; changed flags are forwarded.
    ///
    /// Options that fail validation are still applied; an invalid depth
    /// distance turns depth faking off.
    pub fn set_options(&mut self, options: WidgetRenderOptions) {
        if let Err(error) = options.validate() {
            log::warn!("Widget options for '{}' are invalid: {}; depth faking disabled", self.system, error);
        }

        if let Some(simulation) = self.simulation.as_mut() {
            if options.show_debug_in_world != self.options.show_debug_in_world {
                simulation.set_hidden_in_world(!options.show_debug_in_world);
            }
            if options.tick_when_paused != self.options.tick_when_paused {
                simulation.set_tick_when_paused(options.tick_when_paused);
            }
        }
        if options.auto_activate != self.options.auto_activate {
            self.lifecycle.set_auto_activation(options.auto_activate);
        }

        self.render_data.set_remap(options.material_remap.clone());
        self.options = options;
    }

    /// Advisories for the current simulation's emitters
    pub fn diagnose(&self, library: &MaterialLibrary) -> Vec<Advisory> {
        self.simulation.as_deref().map_or_else(Vec::new, |simulation| {
            diagnostics::check_widget(simulation.emitters(), &self.options, library)
        })
    }

    /// Rebuild the frame's batches for `geometry`
    pub fn paint(&mut self, geometry: &LayoutGeometry) -> &[RenderBatch] {
        self.render_data.clear();
        if self.lifecycle.is_released() {
            return self.render_data.batches();
        }

        if self.simulation.is_none() && self.initialize().is_err() {
            return self.render_data.batches();
        }

        self.paints += 1;
        self.lifecycle.paint();

        let component = geometry.component_transform();
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.set_component_transform(&component);
            if self.lifecycle.take_auto_activation() {
                log::debug!("Auto-activating '{}'", self.system);
                simulation.activate(false);
                self.lifecycle.activate();
            }
        }

        self.build_batches(geometry);

        if self.paints % BRUSH_PURGE_INTERVAL == 0 {
            self.render_data.purge_unreferenced_brushes();
        }

        self.render_data.batches()
    }

    fn live_simulation(&mut self) -> Result<&mut Box<dyn ParticleSimulation>, WidgetError> {
        if self.lifecycle.is_released() {
            return Err(WidgetError::Released);
        }
        self.simulation.as_mut().ok_or(WidgetError::NotInitialized)
    }

    fn build_batches(&mut self, geometry: &LayoutGeometry) {
        let Some(simulation) = self.simulation.as_deref() else {
            return;
        };
        if !self.lifecycle.is_active() || !simulation.is_active() {
            return;
        }

        let emitters = simulation.emitters();
        let mut entries: Vec<(&EmitterInstance, &RendererProperties)> = Vec::new();

        for emitter in emitters.iter().filter(|emitter| emitter.enabled) {
            if emitter.sim_target == SimTarget::Gpu {
                if !self.options.disable_warnings && self.warned_gpu_emitters.insert(emitter.name.clone()) {
                    log::warn!(
                        "Emitter '{}' simulates on the GPU and cannot be drawn in UI; use a CPU emitter",
                        emitter.name
                    );
                }
                continue;
            }

            for renderer in emitter.renderers.iter().filter(|renderer| renderer.is_enabled()) {
                if !renderer.is_sim_target_supported(emitter.sim_target) {
                    log::trace!(
                        "Skipped renderer '{}' of emitter '{}': {}",
                        renderer.name(),
                        emitter.name,
                        SkipReason::UnsupportedSimTarget(emitter.sim_target)
                    );
                    continue;
                }
                if let RendererProperties::Other(other) = renderer {
                    log::trace!("Renderer '{}' of kind {} is not drawn in UI", other.common.name, other.kind);
                    continue;
                }
                entries.push((emitter, renderer));
            }
        }

        // Stable, so equal hints keep authoring order
        entries.sort_by_key(|(_, renderer)| renderer.sort_order_hint());

        let render = geometry.render_transform();
        let component = geometry.component_transform();
        let fake_depth = self.options.fake_depth_reference();

        for (emitter, renderer) in entries {
            let projector = Projector::new(emitter.space, &component, &render, fake_depth);
            let result = match renderer {
                RendererProperties::Sprite(props) => {
                    sprite::build(&emitter.attributes, props, &projector, &mut self.render_data)
                }
                RendererProperties::Ribbon(props) => ribbon::build(
                    &emitter.attributes,
                    props,
                    &projector,
                    self.options.pass_ribbon_dynamic_params_as_uv1,
                    &mut self.render_data,
                ),
                RendererProperties::Other(_) => continue,
            };

            if let Err(reason) = result {
                log::trace!(
                    "Skipped {} renderer '{}' of emitter '{}': {}",
                    renderer.kind_name(),
                    renderer.name(),
                    emitter.name,
                    reason
                );
            }
        }
    }
}

impl std::fmt::Debug for ParticleWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleWidget")
            .field("system", &self.system)
            .field("state", &self.lifecycle.state())
            .field("batches", &self.render_data.batches().len())
            .finish_non_exhaustive()
    }
}
