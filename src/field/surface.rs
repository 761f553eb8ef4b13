//! Surface identity and world-space extent

use serde::{Deserialize, Serialize};

use crate::core::types::{Vec2, Vec3};
use crate::math::Aabb;

/// Stable opaque handle for a deformable surface.
///
/// Every per-surface map in the engine is keyed by this id, never by any
/// host-object identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub(crate) u32);

impl SurfaceId {
    /// Raw id value, for logs and the inspection protocol
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// World-space placement of a surface's height grid.
///
/// The grid covers `size.x` by `size.z` meters starting at `origin`, with
/// `size.y` meters of vertical scale. Sample `(0, 0)` sits at the origin
/// corner and sample `(resolution-1, resolution-1)` at the far corner.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceExtent {
    /// World-space min corner
    pub origin: Vec3,
    /// Horizontal extent (x, z) and vertical scale (y), in meters
    pub size: Vec3,
    /// Samples per axis; fixed for a session
    pub resolution: u32,
}

impl SurfaceExtent {
    /// Meters covered by one cell, per horizontal axis
    pub fn meters_per_cell(&self) -> Vec2 {
        let cells = (self.resolution.max(2) - 1) as f32;
        Vec2::new(self.size.x / cells, self.size.z / cells)
    }

    /// Fractional grid coordinates of a world point (x → grid x, z → grid y)
    pub fn grid_from_world(&self, point: Vec3) -> Vec2 {
        let mpc = self.meters_per_cell();
        Vec2::new(
            (point.x - self.origin.x) / mpc.x,
            (point.z - self.origin.z) / mpc.y,
        )
    }

    /// World position of a grid cell at the given normalized height
    pub fn world_from_grid(&self, x: u32, y: u32, height: f32) -> Vec3 {
        let mpc = self.meters_per_cell();
        Vec3::new(
            self.origin.x + x as f32 * mpc.x,
            self.origin.y + height * self.size.y,
            self.origin.z + y as f32 * mpc.y,
        )
    }

    /// World height in meters for a normalized sample value
    pub fn world_height(&self, normalized: f32) -> f32 {
        self.origin.y + normalized * self.size.y
    }

    /// World-space bounding box of the surface volume
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.origin, self.origin + self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> SurfaceExtent {
        SurfaceExtent {
            origin: Vec3::ZERO,
            size: Vec3::new(100.0, 50.0, 100.0),
            resolution: 201,
        }
    }

    #[test]
    fn test_meters_per_cell() {
        let mpc = extent().meters_per_cell();
        assert!((mpc.x - 0.5).abs() < 1e-6);
        assert!((mpc.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_world_grid_roundtrip() {
        let e = extent();
        let g = e.grid_from_world(Vec3::new(25.0, 0.0, 75.0));
        assert!((g.x - 50.0).abs() < 1e-4);
        assert!((g.y - 150.0).abs() < 1e-4);

        let w = e.world_from_grid(50, 150, 0.5);
        assert!((w.x - 25.0).abs() < 1e-4);
        assert!((w.z - 75.0).abs() < 1e-4);
        assert!((w.y - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounds() {
        let e = extent();
        assert!(e.bounds().contains_point(Vec3::new(50.0, 25.0, 50.0)));
        assert!(!e.bounds().contains_point(Vec3::new(50.0, 60.0, 50.0)));
    }
}
