//! Baseline capture and restore
//!
//! The baseline is the authored ground truth: one full-grid snapshot per
//! surface, taken at session start before any painting. Decay blends
//! toward it; restore writes it back verbatim. Nothing else ever mutates
//! a captured snapshot.

use std::collections::HashMap;

use crate::field::{HeightField, HeightWindow, SurfaceId, TerrainStore};
use crate::math::GridRect;

/// Owns the per-surface baseline snapshots
pub struct BaselineManager {
    baselines: HashMap<SurfaceId, HeightField>,
}

impl BaselineManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            baselines: HashMap::new(),
        }
    }

    /// Snapshot every registered surface's full height grid.
    ///
    /// Replaces any previous capture; the session calls this exactly once
    /// at start, before painting.
    pub fn capture_all(&mut self, store: &TerrainStore) {
        self.baselines.clear();
        for id in store.surface_ids() {
            if let Some(field) = store.field(id) {
                self.baselines.insert(id, field.clone());
            }
        }
        log::info!("captured baselines for {} surface(s)", self.baselines.len());
    }

    /// Write every captured baseline back verbatim. Idempotent.
    ///
    /// A surface whose resolution changed since capture is skipped with a
    /// warning; the rest still restore.
    pub fn restore_all(&self, store: &mut TerrainStore) {
        for (&id, baseline) in &self.baselines {
            let Some(field) = store.field_mut(id) else {
                log::warn!("baseline restore: surface {} no longer registered", id.raw());
                continue;
            };
            if field.resolution() != baseline.resolution() {
                log::warn!(
                    "baseline restore: surface {} resolution changed ({} -> {}), skipping",
                    id.raw(),
                    baseline.resolution(),
                    field.resolution()
                );
                continue;
            }
            field.samples_mut().copy_from_slice(baseline.samples());
        }
    }

    /// Whether a surface has a captured baseline
    pub fn has(&self, surface: SurfaceId) -> bool {
        self.baselines.contains_key(&surface)
    }

    /// Number of captured surfaces
    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    /// True when nothing has been captured yet
    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    /// Copy a window out of a surface's baseline snapshot
    pub fn window(&self, surface: SurfaceId, rect: GridRect) -> Option<HeightWindow> {
        self.baselines.get(&surface).map(|b| b.read_window(rect))
    }
}

impl Default for BaselineManager {
    fn default() -> Self {
        Self::new()
    }
}
