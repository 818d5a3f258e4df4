//! Shared cache of paintable material brushes
//!
//! A brush is the paint surface's handle for drawing with a material. Every
//! widget resolving the same (post-remap) material gets the same
//! `Arc<MaterialBrush>`, so the cache can tell which entries are still held
//! by a batch somewhere.

use crate::simulation::material::MaterialId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Paintable handle for one material
#[derive(Debug, PartialEq, Eq)]
pub struct MaterialBrush {
    material: MaterialId,
}

impl MaterialBrush {
    /// Create a brush for `material`
    pub fn new(material: MaterialId) -> Self {
        Self { material }
    }

    /// Material drawn by this brush
    pub fn material(&self) -> MaterialId {
        self.material
    }
}

/// Thread-safe brush cache shared by all widgets of a paint context
#[derive(Debug, Default)]
pub struct BrushCache {
    brushes: RwLock<HashMap<MaterialId, Arc<MaterialBrush>>>,
}

impl BrushCache {
    /// Create a new empty brush cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache ready to be shared
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<MaterialId, Arc<MaterialBrush>>> {
        self.brushes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<MaterialId, Arc<MaterialBrush>>> {
        self.brushes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Brush for `material`, created and inserted on first use
    pub fn get_or_create(&self, material: MaterialId) -> Arc<MaterialBrush> {
        if let Some(brush) = self.read().get(&material) {
            return Arc::clone(brush);
        }

        // Another widget may have inserted it between the two locks
        let mut brushes = self.write();
        let brush = brushes.entry(material).or_insert_with(|| {
            log::trace!("Creating brush for {}", material);
            Arc::new(MaterialBrush::new(material))
        });
        Arc::clone(brush)
    }

    /// Get a cached brush without creating one
    pub fn get(&self, material: MaterialId) -> Option<Arc<MaterialBrush>> {
        self.read().get(&material).map(Arc::clone)
    }

    /// Check if a brush is cached
    pub fn contains(&self, material: MaterialId) -> bool {
        self.read().contains_key(&material)
    }

    /// Drop brushes that only the cache still holds; returns how many went
    pub fn purge_unreferenced(&self) -> usize {
        let mut brushes = self.write();
        let before = brushes.len();
        brushes.retain(|_, brush| Arc::strong_count(brush) > 1);
        let removed = before - brushes.len();
        if removed > 0 {
            log::debug!("Purged {} unreferenced brushes, {} remain", removed, brushes.len());
        }
        removed
    }

    /// Get the number of cached brushes
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
