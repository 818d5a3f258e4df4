//! Per-frame render data collected from all renderers of a widget
//!
//! Builders reserve a batch, fill the returned vertex and index slices in
//! place, and move on. Everything is rebuilt from scratch every frame;
//! only the brush cache survives [`RenderData::clear`].

use super::brush::{BrushCache, MaterialBrush};
use super::vertex::UiVertex;
use crate::core::options::MaterialRemap;
use crate::simulation::material::MaterialId;
use std::sync::Arc;

/// One draw call for the paint surface
#[derive(Debug, Clone, Default)]
pub struct RenderBatch {
    /// Material drawn, after remapping
    pub material: Option<MaterialId>,
    /// Brush for `material`
    pub brush: Option<Arc<MaterialBrush>>,
    /// Vertices in UI space
    pub vertices: Vec<UiVertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl RenderBatch {
    /// Number of triangles in the batch
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Writable storage of a freshly added batch
#[derive(Debug)]
pub struct BatchRegion<'a> {
    /// Zeroed vertices to fill
    pub vertices: &'a mut [UiVertex],
    /// Zeroed indices to fill
    pub indices: &'a mut [u32],
}

/// Frame accumulator of render batches
#[derive(Debug)]
pub struct RenderData {
    batches: Vec<RenderBatch>,
    brushes: Arc<BrushCache>,
    remap: MaterialRemap,
}

impl RenderData {
    /// Create an empty collector drawing through `brushes`
    pub fn new(brushes: Arc<BrushCache>) -> Self {
        Self {
            batches: Vec::new(),
            brushes,
            remap: MaterialRemap::default(),
        }
    }

    /// Replace the remap table
    pub fn set_remap(&mut self, remap: MaterialRemap) {
        self.remap = remap;
    }

    /// Current remap table
    pub fn remap(&self) -> &MaterialRemap {
        &self.remap
    }

    /// Shared brush cache
    pub fn brush_cache(&self) -> &Arc<BrushCache> {
        &self.brushes
    }

    /// Reserve a batch for `material` and return its storage.
    ///
    /// Returns `None`, and adds nothing, when either count is zero.
    pub fn add_batch(
        &mut self,
        material: Option<MaterialId>,
        vertex_count: usize,
        index_count: usize,
    ) -> Option<BatchRegion<'_>> {
        if vertex_count == 0 || index_count == 0 {
            return None;
        }

        let material = material.map(|material| self.remap.resolve(material));
        let brush = material.map(|material| self.brushes.get_or_create(material));

        log::trace!(
            "Adding batch: {} vertices, {} indices, material {:?}",
            vertex_count,
            index_count,
            material
        );

        self.batches.push(RenderBatch {
            material,
            brush,
            vertices: vec![UiVertex::default(); vertex_count],
            indices: vec![0; index_count],
        });

        self.batches.last_mut().map(|batch| BatchRegion {
            vertices: &mut batch.vertices,
            indices: &mut batch.indices,
        })
    }

    /// Brush for `material`, remap applied first
    pub fn resolve_brush(&self, material: MaterialId) -> Arc<MaterialBrush> {
        self.brushes.get_or_create(self.remap.resolve(material))
    }

    /// Discard this frame's batches; the brush cache is kept
    pub fn clear(&mut self) {
        self.batches.clear();
    }

    /// Batches in draw order
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Move the batches out, leaving the collector empty
    pub fn take_batches(&mut self) -> Vec<RenderBatch> {
        std::mem::take(&mut self.batches)
    }

    /// Total vertices over all batches
    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.vertices.len()).sum()
    }

    /// Total indices over all batches
    pub fn index_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.indices.len()).sum()
    }

    /// Run brush cache maintenance
    pub fn purge_unreferenced_brushes(&self) -> usize {
        self.brushes.purge_unreferenced()
    }
}
