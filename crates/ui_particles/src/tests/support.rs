//! Scripted simulation host for widget tests

use crate::foundation::math::{Vec2, Vec3};
use crate::render::projection::ComponentTransform;
use crate::simulation::attributes::{AttributeColumn, AttributeName, ParticleAttributeSet};
use crate::simulation::emitter::{EmitterInstance, SimulationSpace};
use crate::simulation::host::{ParticleSimulation, SimulationSpawner, SpawnError, SpawnSettings, SystemAsset};
use crate::simulation::renderer::SpriteRendererProperties;
use std::cell::RefCell;
use std::rc::Rc;

/// Everything the widget told the simulation
#[derive(Debug, Default)]
pub struct SimulationLog {
    pub spawns: Vec<SpawnSettings>,
    pub activations: Vec<bool>,
    pub deactivations: usize,
    pub resets: usize,
    pub transforms: Vec<ComponentTransform>,
    pub assets: Vec<SystemAsset>,
    pub tick_when_paused: Vec<bool>,
    pub hidden_in_world: Vec<bool>,
}

pub type SharedLog = Rc<RefCell<SimulationLog>>;

pub struct ScriptedSimulation {
    emitters: Vec<EmitterInstance>,
    active: bool,
    log: SharedLog,
}

impl ParticleSimulation for ScriptedSimulation {
    fn emitters(&self) -> &[EmitterInstance] {
        &self.emitters
    }

    fn activate(&mut self, reset: bool) {
        self.active = true;
        self.log.borrow_mut().activations.push(reset);
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.log.borrow_mut().deactivations += 1;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_component_transform(&mut self, transform: &ComponentTransform) {
        self.log.borrow_mut().transforms.push(*transform);
    }

    fn set_asset(&mut self, system: &SystemAsset) {
        self.log.borrow_mut().assets.push(system.clone());
    }

    fn reset(&mut self) {
        self.log.borrow_mut().resets += 1;
    }

    fn set_tick_when_paused(&mut self, tick: bool) {
        self.log.borrow_mut().tick_when_paused.push(tick);
    }

    fn set_hidden_in_world(&mut self, hidden: bool) {
        self.log.borrow_mut().hidden_in_world.push(hidden);
    }
}

pub struct ScriptedSpawner {
    emitters: Vec<EmitterInstance>,
    failures_left: u32,
    log: SharedLog,
}

impl ScriptedSpawner {
    pub fn new(emitters: Vec<EmitterInstance>) -> (Box<Self>, SharedLog) {
        Self::failing(emitters, 0)
    }

    pub fn failing(emitters: Vec<EmitterInstance>, failures: u32) -> (Box<Self>, SharedLog) {
        let log = SharedLog::default();
        let spawner = Box::new(Self {
            emitters,
            failures_left: failures,
            log: Rc::clone(&log),
        });
        (spawner, log)
    }
}

impl SimulationSpawner for ScriptedSpawner {
    fn spawn(
        &mut self,
        system: &SystemAsset,
        settings: &SpawnSettings,
    ) -> Result<Box<dyn ParticleSimulation>, SpawnError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(SpawnError::Unavailable(format!("no world for {}", system)));
        }

        self.log.borrow_mut().spawns.push(settings.clone());
        Ok(Box::new(ScriptedSimulation {
            emitters: self.emitters.clone(),
            active: false,
            log: Rc::clone(&self.log),
        }))
    }
}

/// Particle rows with positions only
pub fn positions_set(positions: &[Vec3]) -> ParticleAttributeSet {
    ParticleAttributeSet::new(positions.len())
        .with_column(AttributeName::POSITION, AttributeColumn::Vec3(positions.to_vec()))
}

/// CPU emitter with one sprite renderer
pub fn sprite_emitter(name: &str, space: SimulationSpace, positions: &[Vec3]) -> EmitterInstance {
    EmitterInstance::new(name)
        .with_space(space)
        .with_renderer(SpriteRendererProperties::new(format!("{}_sprite", name)))
        .with_attributes(positions_set(positions))
}

/// Centroid of a quad's four vertices
pub fn quad_center(vertices: &[crate::render::vertex::UiVertex]) -> Vec2 {
    vertices.iter().map(|vertex| vertex.position()).sum::<Vec2>() / vertices.len() as f32
}
