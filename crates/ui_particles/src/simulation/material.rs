//! Material references
//!
//! Materials are owned by the asset layer. Renderers and the remap table
//! only carry ids; the [`MaterialLibrary`] resolves them when the domain
//! matters (diagnostics).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Unique identifier for materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material#{}", self.0)
    }
}

/// Where a material is meant to be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialDomain {
    /// Usable by UI paint surfaces
    UserInterface,
    /// Regular 3D surface material
    Surface,
    /// Post-process material
    PostProcess,
    /// Anything else (decals, volumes, ...)
    Other,
}

/// Material resource description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Unique identifier for this material
    pub id: MaterialId,
    /// Name for logs and advisories
    pub name: String,
    /// Rendering domain
    pub domain: MaterialDomain,
}

impl Material {
    /// Create a new material description
    pub fn new(id: MaterialId, name: impl Into<String>, domain: MaterialDomain) -> Self {
        Self {
            id,
            name: name.into(),
            domain,
        }
    }

    /// Whether a UI paint surface can draw with this material
    pub fn is_ui_compatible(&self) -> bool {
        self.domain == MaterialDomain::UserInterface
    }
}

/// Lookup of known materials by id
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: HashMap<MaterialId, Arc<Material>>,
}

impl MaterialLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material, replacing any previous entry with the same id
    pub fn insert(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials.insert(material.id, Arc::clone(&material));
        material
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, material: Material) -> Self {
        self.insert(material);
        self
    }

    /// Get a material by id
    pub fn get(&self, id: MaterialId) -> Option<&Arc<Material>> {
        self.materials.get(&id)
    }

    /// Number of registered materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether no material is registered
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
