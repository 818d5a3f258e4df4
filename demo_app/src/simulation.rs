//! Synthetic CPU particle simulation for the demo
//!
//! Advances whenever the widget forwards a new component transform, up to
//! the host clock shared with `main`.

use rand::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use ui_particles::foundation::math::{Vec2, Vec3, Vec4};
use ui_particles::render::ComponentTransform;
use ui_particles::simulation::{
    AttributeColumn, AttributeName, EmitterInstance, MaterialId, ParticleAttributeSet, ParticleId,
    ParticleSimulation, RibbonRendererProperties, RibbonUvDistribution, RibbonUvSettings, SimTarget,
    SimulationSpace, SimulationSpawner, SpawnError, SpawnSettings, SpriteAlignment, SpriteRendererProperties,
    SystemAsset,
};

/// Material of the spark sprites, authored for 3D surfaces
pub const SPARK_MATERIAL: MaterialId = MaterialId(1);
/// Material of the comet trail
pub const TRAIL_MATERIAL: MaterialId = MaterialId(2);
/// UI replacement for [`SPARK_MATERIAL`]
pub const UI_SPARK_MATERIAL: MaterialId = MaterialId(100);

const GRAVITY: f32 = -30.0;
const SPARKS_PER_SECOND: f32 = 40.0;
const TRAIL_LENGTH: usize = 24;

/// Shared host clock in seconds
pub type HostClock = Rc<Cell<f32>>;

#[derive(Debug, Clone)]
struct Spark {
    position: Vec3,
    velocity: Vec3,
    age: f32,
    lifetime: f32,
    size: f32,
}

/// Sparks fountain plus a comet trail; one GPU emitter to exercise the warning path
pub struct DemoSimulation {
    emitters: Vec<EmitterInstance>,
    asset: SystemAsset,
    clock: HostClock,
    simulated_until: f32,
    active: bool,
    tick_when_paused: bool,
    sparks: Vec<Spark>,
    spawn_debt: f32,
    trail: Vec<Vec3>,
    rng: StdRng,
}

impl DemoSimulation {
    fn new(asset: SystemAsset, clock: HostClock, settings: &SpawnSettings) -> Self {
        let emitters = vec![
            EmitterInstance::new("sparks").with_space(SimulationSpace::Local).with_renderer(
                SpriteRendererProperties::new("sparks")
                    .with_material(SPARK_MATERIAL)
                    .with_sub_image_size(4.0, 2.0)
                    .with_alignment(SpriteAlignment::VelocityAligned)
                    .with_sort_order_hint(1),
            ),
            EmitterInstance::new("comet").with_space(SimulationSpace::Local).with_renderer(
                RibbonRendererProperties::new("comet")
                    .with_material(TRAIL_MATERIAL)
                    .with_uv0(RibbonUvSettings {
                        distribution: RibbonUvDistribution::TiledOverRibbonLength,
                        tiling_length: 40.0,
                    }),
            ),
            EmitterInstance::new("smoke").with_sim_target(SimTarget::Gpu).with_renderer(
                SpriteRendererProperties::new("smoke"),
            ),
        ];

        let start = clock.get();
        Self {
            emitters,
            asset,
            clock,
            simulated_until: start,
            active: settings.auto_activate,
            tick_when_paused: settings.tick_when_paused,
            sparks: Vec::new(),
            spawn_debt: 0.0,
            trail: Vec::new(),
            rng: StdRng::seed_from_u64(7),
        }
    }

    fn advance(&mut self, dt: f32) {
        let time = self.simulated_until;

        self.spawn_debt += dt * SPARKS_PER_SECOND;
        while self.spawn_debt >= 1.0 {
            self.spawn_debt -= 1.0;
            let spark = Spark {
                position: Vec3::zeros(),
                velocity: Vec3::new(
                    self.rng.gen_range(-20.0..20.0),
                    self.rng.gen_range(-50.0..50.0),
                    self.rng.gen_range(30.0..60.0),
                ),
                age: 0.0,
                lifetime: self.rng.gen_range(0.8..1.6),
                size: self.rng.gen_range(3.0..8.0),
            };
            self.sparks.push(spark);
        }

        for spark in &mut self.sparks {
            spark.velocity.z += GRAVITY * dt;
            spark.position += spark.velocity * dt;
            spark.age += dt;
        }
        self.sparks.retain(|spark| spark.age < spark.lifetime);

        let head = Vec3::new((time * 1.3).sin() * 60.0, 0.0, (time * 2.1).cos() * 30.0);
        self.trail.insert(0, head);
        self.trail.truncate(TRAIL_LENGTH);

        self.publish();
    }

    fn publish(&mut self) {
        let sparks = &self.sparks;
        let spark_set = ParticleAttributeSet::new(sparks.len())
            .with_column(
                AttributeName::POSITION,
                AttributeColumn::Vec3(sparks.iter().map(|spark| spark.position).collect()),
            )
            .with_column(
                AttributeName::VELOCITY,
                AttributeColumn::Vec3(sparks.iter().map(|spark| spark.velocity).collect()),
            )
            .with_column(
                AttributeName::COLOR,
                AttributeColumn::Vec4(
                    sparks
                        .iter()
                        .map(|spark| Vec4::new(1.0, 0.6, 0.2, 1.0 - spark.age / spark.lifetime))
                        .collect(),
                ),
            )
            .with_column(
                AttributeName::SPRITE_SIZE,
                AttributeColumn::Vec2(sparks.iter().map(|spark| Vec2::new(spark.size, spark.size * 2.0)).collect()),
            )
            .with_column(
                AttributeName::SUB_IMAGE_INDEX,
                AttributeColumn::Float(sparks.iter().map(|spark| (spark.age * 10.0).floor()).collect()),
            );

        let trail = &self.trail;
        let newest = i32::try_from(trail.len()).unwrap_or(i32::MAX);
        let trail_set = ParticleAttributeSet::new(trail.len())
            .with_column(AttributeName::POSITION, AttributeColumn::Vec3(trail.clone()))
            .with_column(
                AttributeName::RIBBON_ID,
                AttributeColumn::Id(vec![ParticleId::new(0, 0); trail.len()]),
            )
            // Spawn counter; the newest particle leads the ribbon
            .with_column(
                AttributeName::RIBBON_LINK_ORDER,
                AttributeColumn::Int((0..newest).map(|age| newest - age).collect()),
            )
            .with_column(
                AttributeName::RIBBON_WIDTH,
                AttributeColumn::Float(
                    (0..trail.len())
                        .map(|age| 12.0 * (1.0 - age as f32 / TRAIL_LENGTH as f32))
                        .collect(),
                ),
            );

        self.emitters[0].set_attributes(spark_set.into());
        self.emitters[1].set_attributes(trail_set.into());
    }

    fn clear(&mut self) {
        self.sparks.clear();
        self.trail.clear();
        self.spawn_debt = 0.0;
        self.simulated_until = self.clock.get();
        self.publish();
    }
}

impl ParticleSimulation for DemoSimulation {
    fn emitters(&self) -> &[EmitterInstance] {
        &self.emitters
    }

    fn activate(&mut self, reset: bool) {
        if reset {
            self.clear();
        }
        self.simulated_until = self.clock.get();
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_component_transform(&mut self, _transform: &ComponentTransform) {
        let now = self.clock.get();
        let dt = now - self.simulated_until;
        if self.active && dt > 0.0 {
            self.advance(dt);
        }
        self.simulated_until = now;
    }

    fn set_asset(&mut self, system: &SystemAsset) {
        log::info!("Demo simulation switched from '{}' to '{}'", self.asset, system);
        self.asset = system.clone();
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn set_tick_when_paused(&mut self, tick: bool) {
        self.tick_when_paused = tick;
    }

    fn set_hidden_in_world(&mut self, hidden: bool) {
        log::debug!("Demo simulation hidden in world: {}", hidden);
    }
}

/// Spawns [`DemoSimulation`]s; fails the first attempt to show the retry path
pub struct DemoSpawner {
    clock: HostClock,
    fail_first: bool,
}

impl DemoSpawner {
    /// Create a spawner reading `clock`
    pub fn new(clock: HostClock) -> Self {
        Self { clock, fail_first: true }
    }
}

impl SimulationSpawner for DemoSpawner {
    fn spawn(
        &mut self,
        system: &SystemAsset,
        settings: &SpawnSettings,
    ) -> Result<Box<dyn ParticleSimulation>, SpawnError> {
        if std::mem::take(&mut self.fail_first) {
            return Err(SpawnError::Unavailable("world is still loading".to_string()));
        }
        if system.name().is_empty() {
            return Err(SpawnError::AssetNotFound(system.to_string()));
        }
        Ok(Box::new(DemoSimulation::new(system.clone(), Rc::clone(&self.clock), settings)))
    }
}
