//! Surface registry and height-field queries
//!
//! [`TerrainStore`] owns every surface's height grid and answers the
//! queries the sculpting systems need: windowed reads/writes, bilinear
//! height sampling, and pointer-ray casts against the height fields.

use std::collections::HashMap;

use crate::core::types::Vec3;
use crate::math::{GridRect, Ray};
use super::height_field::{HeightField, HeightWindow};
use super::surface::{SurfaceExtent, SurfaceId};

/// Result of a successful ray cast
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// World-space point on the height field
    pub point: Vec3,
    /// Surface that was hit
    pub surface: SurfaceId,
}

struct SurfaceSlot {
    extent: SurfaceExtent,
    field: HeightField,
    paintable: bool,
}

/// Owns all registered surfaces and their height grids
pub struct TerrainStore {
    surfaces: HashMap<SurfaceId, SurfaceSlot>,
    next_id: u32,
}

impl TerrainStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a surface. The field's resolution must match the extent.
    pub fn add_surface(
        &mut self,
        extent: SurfaceExtent,
        field: HeightField,
        paintable: bool,
    ) -> crate::core::Result<SurfaceId> {
        if field.resolution() != extent.resolution {
            return Err(crate::core::Error::Surface(format!(
                "field resolution {} does not match extent resolution {}",
                field.resolution(),
                extent.resolution
            )));
        }
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.surfaces.insert(id, SurfaceSlot { extent, field, paintable });
        Ok(id)
    }

    /// All registered surface ids, in registration order
    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<_> = self.surfaces.keys().copied().collect();
        ids.sort();
        ids
    }

    /// World extent of a surface
    pub fn extent(&self, id: SurfaceId) -> Option<SurfaceExtent> {
        self.surfaces.get(&id).map(|s| s.extent)
    }

    /// Whether the surface accepts brush strokes
    pub fn is_paintable(&self, id: SurfaceId) -> bool {
        self.surfaces.get(&id).map(|s| s.paintable).unwrap_or(false)
    }

    /// Height grid of a surface
    pub fn field(&self, id: SurfaceId) -> Option<&HeightField> {
        self.surfaces.get(&id).map(|s| &s.field)
    }

    /// Mutable height grid of a surface
    pub fn field_mut(&mut self, id: SurfaceId) -> Option<&mut HeightField> {
        self.surfaces.get_mut(&id).map(|s| &mut s.field)
    }

    /// Copy a window of samples out of a surface
    pub fn read_window(&self, id: SurfaceId, rect: GridRect) -> Option<HeightWindow> {
        self.surfaces.get(&id).map(|s| s.field.read_window(rect))
    }

    /// Write a window of samples back to a surface.
    /// Returns false for an unknown surface.
    pub fn write_window(&mut self, id: SurfaceId, window: &HeightWindow) -> bool {
        match self.surfaces.get_mut(&id) {
            Some(slot) => {
                slot.field.write_window(window);
                true
            }
            None => false,
        }
    }

    /// Bilinearly interpolated terrain height (world meters) at an XZ
    /// position. Positions outside the grid clamp to the border.
    pub fn height_at_world(&self, id: SurfaceId, wx: f32, wz: f32) -> Option<f32> {
        self.surfaces.get(&id).map(|s| Self::sample_height(s, wx, wz))
    }

    /// Cast a ray against every surface's height field.
    /// Returns the nearest hit within `max_distance`, or None.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<(f32, RayHit)> = None;
        for (&id, slot) in &self.surfaces {
            if let Some((t, point)) = Self::march(ray, slot, max_distance) {
                if best.as_ref().is_none_or(|(bt, _)| t < *bt) {
                    best = Some((t, RayHit { point, surface: id }));
                }
            }
        }
        best.map(|(_, hit)| hit)
    }

    fn sample_height(slot: &SurfaceSlot, wx: f32, wz: f32) -> f32 {
        let res = slot.extent.resolution;
        let g = slot.extent.grid_from_world(Vec3::new(wx, 0.0, wz));
        let gx = g.x.clamp(0.0, (res - 1) as f32);
        let gy = g.y.clamp(0.0, (res - 1) as f32);

        let x0 = gx.floor() as u32;
        let y0 = gy.floor() as u32;
        let x1 = (x0 + 1).min(res - 1);
        let y1 = (y0 + 1).min(res - 1);
        let fx = gx - x0 as f32;
        let fy = gy - y0 as f32;

        let h00 = slot.field.get(x0, y0);
        let h10 = slot.field.get(x1, y0);
        let h01 = slot.field.get(x0, y1);
        let h11 = slot.field.get(x1, y1);

        let h0 = h00 + (h10 - h00) * fx;
        let h1 = h01 + (h11 - h01) * fx;
        slot.extent.world_height(h0 + (h1 - h0) * fy)
    }

    /// Fixed-step march along the ray inside the surface bounds, with a
    /// bisection refine on the first above-to-below transition.
    fn march(ray: &Ray, slot: &SurfaceSlot, max_distance: f32) -> Option<(f32, Vec3)> {
        let (t0, t1) = ray.clip_aabb(&slot.extent.bounds())?;
        if t0 > max_distance {
            return None;
        }
        let t1 = t1.min(max_distance);

        let above = |t: f32| {
            let p = ray.at(t);
            p.y > Self::sample_height(slot, p.x, p.z)
        };
        let hit_at = |t: f32| {
            let p = ray.at(t);
            Vec3::new(p.x, Self::sample_height(slot, p.x, p.z), p.z)
        };

        if !above(t0) {
            // Entered the bounds already below the surface
            return Some((t0, hit_at(t0)));
        }

        let mpc = slot.extent.meters_per_cell();
        let step = (mpc.x.min(mpc.y) * 0.5).max(1e-3);

        let mut t_prev = t0;
        let mut t = t0 + step;
        loop {
            let t_probe = t.min(t1);
            if !above(t_probe) {
                let (mut lo, mut hi) = (t_prev, t_probe);
                for _ in 0..8 {
                    let mid = (lo + hi) * 0.5;
                    if above(mid) {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                return Some((hi, hit_at(hi)));
            }
            if t >= t1 {
                return None;
            }
            t_prev = t_probe;
            t += step;
        }
    }
}

impl Default for TerrainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_store(height: f32) -> (TerrainStore, SurfaceId) {
        let extent = SurfaceExtent {
            origin: Vec3::ZERO,
            size: Vec3::new(100.0, 50.0, 100.0),
            resolution: 201,
        };
        let mut store = TerrainStore::new();
        let id = store
            .add_surface(extent, HeightField::new(201, height), true)
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_add_surface_rejects_mismatch() {
        let extent = SurfaceExtent {
            origin: Vec3::ZERO,
            size: Vec3::new(10.0, 5.0, 10.0),
            resolution: 33,
        };
        let mut store = TerrainStore::new();
        assert!(store.add_surface(extent, HeightField::new(64, 0.0), true).is_err());
    }

    #[test]
    fn test_height_at_world_flat() {
        let (store, id) = flat_store(0.5);
        let h = store.height_at_world(id, 50.0, 50.0).unwrap();
        assert!((h - 25.0).abs() < 1e-4);

        // Outside the grid clamps to the border
        let h = store.height_at_world(id, -10.0, 500.0).unwrap();
        assert!((h - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_straight_down() {
        let (store, id) = flat_store(0.5);
        let ray = Ray::new(Vec3::new(50.0, 45.0, 50.0), Vec3::NEG_Y);
        let hit = store.raycast(&ray, 100.0).unwrap();
        assert_eq!(hit.surface, id);
        assert!((hit.point.y - 25.0).abs() < 0.05);
        assert!((hit.point.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_miss_outside_bounds() {
        let (store, _) = flat_store(0.5);
        let ray = Ray::new(Vec3::new(500.0, 45.0, 500.0), Vec3::NEG_Y);
        assert!(store.raycast(&ray, 100.0).is_none());

        // In bounds but farther than max_distance
        let ray = Ray::new(Vec3::new(50.0, 45.0, 50.0), Vec3::NEG_Y);
        assert!(store.raycast(&ray, 5.0).is_none());
    }

    #[test]
    fn test_raycast_oblique_hits_slope() {
        let (mut store, id) = flat_store(0.2);
        // Raise a ridge across the middle of the field
        let field = store.field_mut(id).unwrap();
        for x in 0..201 {
            field.set(x, 100, 0.8);
        }

        let ray = Ray::between(Vec3::new(50.0, 45.0, 10.0), Vec3::new(50.0, 35.0, 50.0));
        let hit = store.raycast(&ray, 200.0).unwrap();
        assert_eq!(hit.surface, id);
        // The hit must land on terrain, not pass through the ridge
        let terrain = store.height_at_world(id, hit.point.x, hit.point.z).unwrap();
        assert!((hit.point.y - terrain).abs() < 0.1);
    }

    #[test]
    fn test_paintable_flag() {
        let extent = SurfaceExtent {
            origin: Vec3::ZERO,
            size: Vec3::new(10.0, 5.0, 10.0),
            resolution: 33,
        };
        let mut store = TerrainStore::new();
        let a = store.add_surface(extent, HeightField::new(33, 0.0), true).unwrap();
        let b = store.add_surface(extent, HeightField::new(33, 0.0), false).unwrap();
        assert!(store.is_paintable(a));
        assert!(!store.is_paintable(b));
    }
}
