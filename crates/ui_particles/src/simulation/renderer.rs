//! Renderer configurations attached to emitters
//!
//! A renderer describes how one emitter's particles become geometry. Only
//! sprites and ribbons can be drawn in UI space; every other kind is carried
//! as [`RendererProperties::Other`] so sort hints and diagnostics still see it.

use super::attributes::AttributeName;
use super::emitter::SimTarget;
use super::material::MaterialId;
use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Settings shared by every renderer kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererCommon {
    /// Name for logs and advisories
    pub name: String,
    /// Disabled renderers are skipped
    pub enabled: bool,
    /// Draw order across renderers, ascending
    pub sort_order_hint: i32,
    /// Material used for the batch
    pub material: Option<MaterialId>,
}

impl RendererCommon {
    /// Enabled renderer with sort hint 0 and no material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            sort_order_hint: 0,
            material: None,
        }
    }
}

/// How sprites pick their rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpriteAlignment {
    /// Use the particle's rotation attribute
    #[default]
    Unaligned,
    /// Point the sprite's up axis along the particle velocity
    VelocityAligned,
}

/// Attribute bindings read by the sprite renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteBindings {
    /// `Vec3` position
    pub position: AttributeName,
    /// `Vec4` color
    pub color: AttributeName,
    /// `Vec3` velocity
    pub velocity: AttributeName,
    /// `Vec2` size
    pub size: AttributeName,
    /// `f32` rotation in degrees
    pub rotation: AttributeName,
    /// `f32` flipbook index
    pub sub_image_index: AttributeName,
    /// `Vec4` shader payload
    pub dynamic_material: AttributeName,
}

impl Default for SpriteBindings {
    fn default() -> Self {
        Self {
            position: AttributeName::POSITION,
            color: AttributeName::COLOR,
            velocity: AttributeName::VELOCITY,
            size: AttributeName::SPRITE_SIZE,
            rotation: AttributeName::SPRITE_ROTATION,
            sub_image_index: AttributeName::SUB_IMAGE_INDEX,
            dynamic_material: AttributeName::DYNAMIC_MATERIAL_PARAMETER,
        }
    }
}

/// Sprite renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteRendererProperties {
    /// Shared renderer settings
    pub common: RendererCommon,
    /// Flipbook grid (columns, rows); `(1, 1)` disables slicing
    pub sub_image_size: Vec2,
    /// Rotation mode
    pub alignment: SpriteAlignment,
    /// Attribute bindings
    pub bindings: SpriteBindings,
}

impl SpriteRendererProperties {
    /// Sprite renderer with default bindings and no flipbook
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            common: RendererCommon::new(name),
            sub_image_size: Vec2::new(1.0, 1.0),
            alignment: SpriteAlignment::Unaligned,
            bindings: SpriteBindings::default(),
        }
    }

    /// Builder pattern: set material
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.common.material = Some(material);
        self
    }

    /// Builder pattern: set flipbook grid
    pub fn with_sub_image_size(mut self, columns: f32, rows: f32) -> Self {
        self.sub_image_size = Vec2::new(columns, rows);
        self
    }

    /// Builder pattern: set alignment
    pub fn with_alignment(mut self, alignment: SpriteAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Builder pattern: set sort hint
    pub fn with_sort_order_hint(mut self, hint: i32) -> Self {
        self.common.sort_order_hint = hint;
        self
    }
}

/// How texture U runs along a ribbon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RibbonUvDistribution {
    /// `0..1` spread evenly over the particles of the ribbon
    #[default]
    ScaledUniformly,
    /// Repeats every `tiling_length` simulation units
    TiledOverRibbonLength,
}

/// Settings of one ribbon UV channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RibbonUvSettings {
    /// Distribution mode
    pub distribution: RibbonUvDistribution,
    /// Repeat length for [`RibbonUvDistribution::TiledOverRibbonLength`]
    pub tiling_length: f32,
}

impl Default for RibbonUvSettings {
    fn default() -> Self {
        Self {
            distribution: RibbonUvDistribution::ScaledUniformly,
            tiling_length: 100.0,
        }
    }
}

/// Attribute bindings read by the ribbon renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RibbonBindings {
    /// `Vec3` position
    pub position: AttributeName,
    /// `Vec4` color
    pub color: AttributeName,
    /// `f32` width
    pub width: AttributeName,
    /// `ParticleId` grouping id
    pub ribbon_id: AttributeName,
    /// `f32` (ascending) or `i32` (descending) order key
    pub link_order: AttributeName,
    /// `Vec4` shader payload
    pub dynamic_material: AttributeName,
}

impl Default for RibbonBindings {
    fn default() -> Self {
        Self {
            position: AttributeName::POSITION,
            color: AttributeName::COLOR,
            width: AttributeName::RIBBON_WIDTH,
            ribbon_id: AttributeName::RIBBON_ID,
            link_order: AttributeName::RIBBON_LINK_ORDER,
            dynamic_material: AttributeName::DYNAMIC_MATERIAL_PARAMETER,
        }
    }
}

/// Ribbon renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RibbonRendererProperties {
    /// Shared renderer settings
    pub common: RendererCommon,
    /// First UV channel (tex coords 0-1)
    pub uv0: RibbonUvSettings,
    /// Second UV channel (tex coords 2-3)
    pub uv1: RibbonUvSettings,
    /// Attribute bindings
    pub bindings: RibbonBindings,
}

impl RibbonRendererProperties {
    /// Ribbon renderer with default bindings and stretched UVs
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            common: RendererCommon::new(name),
            uv0: RibbonUvSettings::default(),
            uv1: RibbonUvSettings::default(),
            bindings: RibbonBindings::default(),
        }
    }

    /// Builder pattern: set material
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.common.material = Some(material);
        self
    }

    /// Builder pattern: set UV channel 0
    pub fn with_uv0(mut self, settings: RibbonUvSettings) -> Self {
        self.uv0 = settings;
        self
    }

    /// Builder pattern: set sort hint
    pub fn with_sort_order_hint(mut self, hint: i32) -> Self {
        self.common.sort_order_hint = hint;
        self
    }
}

/// Renderer kinds this crate cannot draw (meshes, lights, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherRendererProperties {
    /// Shared renderer settings
    pub common: RendererCommon,
    /// Kind name for logs
    pub kind: String,
}

/// Renderer configuration, dispatched by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RendererProperties {
    /// Camera-facing quads
    Sprite(SpriteRendererProperties),
    /// Connected strips
    Ribbon(RibbonRendererProperties),
    /// Anything else; never drawn
    Other(OtherRendererProperties),
}

impl RendererProperties {
    /// Shared settings of any kind
    pub fn common(&self) -> &RendererCommon {
        match self {
            Self::Sprite(sprite) => &sprite.common,
            Self::Ribbon(ribbon) => &ribbon.common,
            Self::Other(other) => &other.common,
        }
    }

    /// Renderer name
    pub fn name(&self) -> &str {
        &self.common().name
    }

    /// Whether the renderer is enabled
    pub fn is_enabled(&self) -> bool {
        self.common().enabled
    }

    /// Draw order hint
    pub fn sort_order_hint(&self) -> i32 {
        self.common().sort_order_hint
    }

    /// Material referenced by the renderer
    pub fn material(&self) -> Option<MaterialId> {
        self.common().material
    }

    /// Whether the renderer kind can consume this simulation target at all
    pub fn is_sim_target_supported(&self, target: SimTarget) -> bool {
        match self {
            Self::Sprite(_) | Self::Other(_) => true,
            Self::Ribbon(_) => target == SimTarget::Cpu,
        }
    }

    /// Short kind name for logs
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Sprite(_) => "sprite",
            Self::Ribbon(_) => "ribbon",
            Self::Other(other) => &other.kind,
        }
    }
}

impl From<SpriteRendererProperties> for RendererProperties {
    fn from(props: SpriteRendererProperties) -> Self {
        Self::Sprite(props)
    }
}

impl From<RibbonRendererProperties> for RendererProperties {
    fn from(props: RibbonRendererProperties) -> Self {
        Self::Ribbon(props)
    }
}
