//! Columnar particle attribute buffers
//!
//! One [`ParticleAttributeSet`] holds a single simulation tick of one
//! emitter: a row per live particle and a column per attribute the emitter
//! writes. Columns are optional; readers fall back to defaults for missing
//! ones (see [`super::reader`]).

use crate::foundation::math::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Name of a particle attribute column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeName(Cow<'static, str>);

impl AttributeName {
    /// Particle position, `Vec3`
    pub const POSITION: Self = Self::from_static("Position");
    /// Linear RGBA color, `Vec4`
    pub const COLOR: Self = Self::from_static("Color");
    /// Velocity, `Vec3`
    pub const VELOCITY: Self = Self::from_static("Velocity");
    /// Sprite size, `Vec2`
    pub const SPRITE_SIZE: Self = Self::from_static("SpriteSize");
    /// Sprite rotation in degrees, `f32`
    pub const SPRITE_ROTATION: Self = Self::from_static("SpriteRotation");
    /// Flipbook cell index, `f32`
    pub const SUB_IMAGE_INDEX: Self = Self::from_static("SubImageIndex");
    /// Per-particle shader payload, `Vec4`
    pub const DYNAMIC_MATERIAL_PARAMETER: Self = Self::from_static("DynamicMaterialParameter");
    /// Ribbon width, `f32`
    pub const RIBBON_WIDTH: Self = Self::from_static("RibbonWidth");
    /// Ribbon grouping id, [`ParticleId`]
    pub const RIBBON_ID: Self = Self::from_static("RibbonID");
    /// Ordering key along a ribbon, `f32` or `i32`
    pub const RIBBON_LINK_ORDER: Self = Self::from_static("RibbonLinkOrder");

    /// Name backed by a static string
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Name backed by an owned string
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The column name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for AttributeName {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

/// Persistent particle identity, used as the ribbon grouping key.
///
/// Ordered by `index` then `acquire_tag`, so grouping by it is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ParticleId {
    /// Slot index in the id table
    pub index: i32,
    /// Reuse counter of the slot
    pub acquire_tag: i32,
}

impl ParticleId {
    /// Create a new particle id
    pub const fn new(index: i32, acquire_tag: i32) -> Self {
        Self { index, acquire_tag }
    }
}

/// Storage of one attribute column
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeColumn {
    /// Scalar floats
    Float(Vec<f32>),
    /// Scalar integers
    Int(Vec<i32>),
    /// 2D vectors
    Vec2(Vec<Vec2>),
    /// 3D vectors
    Vec3(Vec<Vec3>),
    /// 4D vectors and linear RGBA colors
    Vec4(Vec<Vec4>),
    /// Particle ids
    Id(Vec<ParticleId>),
}

impl AttributeColumn {
    /// Number of rows stored in the column
    pub fn len(&self) -> usize {
        match self {
            Self::Float(values) => values.len(),
            Self::Int(values) => values.len(),
            Self::Vec2(values) => values.len(),
            Self::Vec3(values) => values.len(),
            Self::Vec4(values) => values.len(),
            Self::Id(values) => values.len(),
        }
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name for logs
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Vec2(_) => "vec2",
            Self::Vec3(_) => "vec3",
            Self::Vec4(_) => "vec4",
            Self::Id(_) => "id",
        }
    }
}

/// One tick of particle data for one emitter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleAttributeSet {
    num_particles: usize,
    columns: HashMap<AttributeName, AttributeColumn>,
    stale: bool,
}

impl ParticleAttributeSet {
    /// Create an empty set with `num_particles` rows and no columns
    pub fn new(num_particles: usize) -> Self {
        Self {
            num_particles,
            columns: HashMap::new(),
            stale: false,
        }
    }

    /// Builder pattern: add a column
    pub fn with_column(mut self, name: AttributeName, column: AttributeColumn) -> Self {
        self.insert_column(name, column);
        self
    }

    /// Add or replace a column
    pub fn insert_column(&mut self, name: AttributeName, column: AttributeColumn) {
        if column.len() != self.num_particles {
            log::warn!(
                "Attribute '{}' has {} rows but the set holds {} particles",
                name,
                column.len(),
                self.num_particles
            );
        }
        self.columns.insert(name, column);
    }

    /// Number of live particles
    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    /// Look up a column by name
    pub fn column(&self, name: &AttributeName) -> Option<&AttributeColumn> {
        self.columns.get(name)
    }

    /// Whether the emitter writes this attribute
    pub fn has_column(&self, name: &AttributeName) -> bool {
        self.columns.contains_key(name)
    }

    /// Producer-side flag: the buffer no longer reflects the simulation
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Whether the set can be read this frame: not stale and every column
    /// has exactly one row per particle.
    pub fn is_valid(&self) -> bool {
        !self.stale && self.columns.values().all(|column| column.len() == self.num_particles)
    }
}
