//! # Widget Render Options
//!
//! Per-widget settings that can change at any time. Changing them re-binds
//! the collector and forwards simulation flags; the simulation itself is
//! never re-created.
//!
//! Options load from TOML or RON through the [`Config`] trait:
//!
//! ```toml
//! auto_activate = true
//! fake_depth_scale = true
//! fake_depth_distance = 800.0
//!
//! [[material_remap]]
//! from = 3
//! to = 7
//! ```

use crate::config::{Config, ConfigError};
use crate::simulation::material::MaterialId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default reference distance for depth faking
pub const DEFAULT_FAKE_DEPTH_DISTANCE: f32 = 1000.0;

/// One row of the remap table as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRemapEntry {
    /// Material referenced by a renderer
    pub from: MaterialId,
    /// Replacement; an empty entry is a placeholder and is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<MaterialId>,
}

/// Material substitution table
///
/// Lets a widget draw emitters authored with non-UI materials by swapping
/// in UI-compatible ones. Entries mapping to `None` are placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MaterialRemapEntry>", into = "Vec<MaterialRemapEntry>")]
pub struct MaterialRemap {
    entries: BTreeMap<MaterialId, Option<MaterialId>>,
}

impl MaterialRemap {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: add a substitution
    pub fn with(mut self, from: MaterialId, to: MaterialId) -> Self {
        self.insert(from, Some(to));
        self
    }

    /// Add or replace an entry
    pub fn insert(&mut self, from: MaterialId, to: Option<MaterialId>) {
        self.entries.insert(from, to);
    }

    /// Remove an entry
    pub fn remove(&mut self, from: MaterialId) -> Option<Option<MaterialId>> {
        self.entries.remove(&from)
    }

    /// Whether `material` has an entry, placeholder or not
    pub fn contains(&self, material: MaterialId) -> bool {
        self.entries.contains_key(&material)
    }

    /// The replacement for `material`, if one is set
    pub fn get(&self, material: MaterialId) -> Option<MaterialId> {
        self.entries.get(&material).copied().flatten()
    }

    /// Apply the table; unmapped and placeholder entries pass through
    pub fn resolve(&self, material: MaterialId) -> MaterialId {
        self.get(material).unwrap_or(material)
    }

    /// Number of entries, placeholders included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending source order
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, Option<MaterialId>)> + '_ {
        self.entries.iter().map(|(&from, &to)| (from, to))
    }
}

impl From<Vec<MaterialRemapEntry>> for MaterialRemap {
    fn from(entries: Vec<MaterialRemapEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|entry| (entry.from, entry.to)).collect(),
        }
    }
}

impl From<MaterialRemap> for Vec<MaterialRemapEntry> {
    fn from(remap: MaterialRemap) -> Self {
        remap
            .entries
            .into_iter()
            .map(|(from, to)| MaterialRemapEntry { from, to })
            .collect()
    }
}

/// # Widget Render Options
///
/// Everything a host can tune on a particle widget without re-spawning
/// its simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetRenderOptions {
    /// Activate the simulation on the first transform update
    pub auto_activate: bool,
    /// Let the simulation also draw itself in the world
    pub show_debug_in_world: bool,
    /// Keep simulating while the host is paused
    pub tick_when_paused: bool,
    /// Ribbon UV1 carries the dynamic material X/Y instead of generated UVs
    pub pass_ribbon_dynamic_params_as_uv1: bool,
    /// Shrink sprites with simulation depth
    pub fake_depth_scale: bool,
    /// Depth at which sprites shrink to a point
    pub fake_depth_distance: f32,
    /// Suppress advisories
    pub disable_warnings: bool,
    /// Material substitutions
    pub material_remap: MaterialRemap,
}

impl WidgetRenderOptions {
    /// Options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set auto activation
    pub fn with_auto_activate(mut self, auto_activate: bool) -> Self {
        self.auto_activate = auto_activate;
        self
    }

    /// Builder pattern: enable depth faking at `distance`
    pub fn with_fake_depth(mut self, distance: f32) -> Self {
        self.fake_depth_scale = true;
        self.fake_depth_distance = distance;
        self
    }

    /// Builder pattern: set the remap table
    pub fn with_material_remap(mut self, remap: MaterialRemap) -> Self {
        self.material_remap = remap;
        self
    }

    /// Builder pattern: route ribbon dynamic parameters to UV1
    pub fn with_ribbon_dynamic_params_as_uv1(mut self, enabled: bool) -> Self {
        self.pass_ribbon_dynamic_params_as_uv1 = enabled;
        self
    }

    /// Reference distance when depth faking is on and the distance is a
    /// positive number; `None` otherwise
    pub fn fake_depth_reference(&self) -> Option<f32> {
        let distance = self.fake_depth_distance;
        (self.fake_depth_scale && distance.is_finite() && distance > 0.0).then_some(distance)
    }
}

impl Default for WidgetRenderOptions {
    fn default() -> Self {
        Self {
            auto_activate: true,
            show_debug_in_world: false,
            tick_when_paused: false,
            pass_ribbon_dynamic_params_as_uv1: false,
            fake_depth_scale: false,
            fake_depth_distance: DEFAULT_FAKE_DEPTH_DISTANCE,
            disable_warnings: false,
            material_remap: MaterialRemap::default(),
        }
    }
}

impl Config for WidgetRenderOptions {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.fake_depth_distance.is_finite() || self.fake_depth_distance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fake_depth_distance must be a positive number, got {}",
                self.fake_depth_distance
            )));
        }
        Ok(())
    }
}
