//! Local peak search
//!
//! Stationary painting biases toward the tallest cell near the pointer so
//! a held brush grows a tip instead of a plateau. The finder never fails
//! on ordinary terrain; callers decide via a minimum-delta threshold
//! whether the peak is pronounced enough to use.

use crate::core::types::Vec3;
use crate::field::{SurfaceId, TerrainStore};
use crate::math::GridRect;

/// A local height maximum near a queried point
#[derive(Clone, Copy, Debug)]
pub struct Peak {
    /// World position of the peak cell, on the surface
    pub point: Vec3,
    /// Height difference to the query's center cell, in world meters
    pub delta: f32,
}

/// Find the highest cell within `search_radius` meters of a world point.
///
/// The search window is elliptical with the same per-axis cell scaling as
/// the brush. Returns `None` only when the window is degenerate (one cell
/// or less on either axis).
pub fn find_local_peak(
    store: &TerrainStore,
    surface: SurfaceId,
    around: Vec3,
    search_radius: f32,
) -> Option<Peak> {
    let extent = store.extent(surface)?;
    let field = store.field(surface)?;

    let resolution = extent.resolution;
    let center = extent.grid_from_world(around);
    let mpc = extent.meters_per_cell();
    let rx = search_radius / mpc.x;
    let ry = search_radius / mpc.y;

    let edge = (resolution - 1) as f32;
    let cx = center.x.round().clamp(0.0, edge) as u32;
    let cy = center.y.round().clamp(0.0, edge) as u32;

    // Whole-cell half extents: a sub-cell radius collapses the window
    let hx = rx.floor() as i64;
    let hy = ry.floor() as i64;
    let rect = GridRect::from_min_max(
        cx as i64 - hx,
        cy as i64 - hy,
        cx as i64 + hx,
        cy as i64 + hy,
    )
    .clamped(resolution);
    if rect.w <= 1 || rect.h <= 1 {
        return None;
    }

    let center_height = field.get(cx, cy);

    let mut best = (cx, cy, center_height);
    for (x, y) in rect.cells() {
        let dx = (x as f32 - center.x) / rx;
        let dy = (y as f32 - center.y) / ry;
        if (dx * dx + dy * dy).sqrt() > 1.0 {
            continue;
        }
        let h = field.get(x, y);
        if h > best.2 {
            best = (x, y, h);
        }
    }

    Some(Peak {
        point: extent.world_from_grid(best.0, best.1, best.2),
        delta: (best.2 - center_height) * extent.size.y,
    })
}
