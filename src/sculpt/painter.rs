//! Falloff-weighted height painting
//!
//! A paint invocation touches one axis-aligned window of cells around the
//! brush center, modifies it in place, and reports the exact rectangle it
//! touched so the stroke tracker can account for the change. Writes go
//! back to the height field immediately; there is no stroke-level buffer.

use crate::core::types::{Vec2, Vec3};
use crate::field::{SurfaceId, TerrainStore};
use crate::math::GridRect;
use super::brush::{Brush, BrushMode};

/// Fixed smoothing kernel radius in cells
const SMOOTH_KERNEL_RADIUS: i64 = 5;

/// Apply one brush invocation at a world point.
///
/// `dt` makes strength rate-based: holding the brush for twice as long
/// moves the terrain twice as far. Returns the touched window (some cells
/// inside it may be unchanged no-ops), or an empty rect when the point
/// cannot reach the grid.
pub fn paint(
    store: &mut TerrainStore,
    surface: SurfaceId,
    world_point: Vec3,
    brush: &Brush,
    lower: bool,
    dt: f32,
) -> GridRect {
    let Some(extent) = store.extent(surface) else {
        return GridRect::EMPTY;
    };

    let resolution = extent.resolution;
    let center = extent.grid_from_world(world_point);
    let mpc = extent.meters_per_cell();

    // Brush radius in cells, per axis; anisotropic grids get an
    // elliptical footprint
    let rx = brush.radius / mpc.x;
    let ry = brush.radius / mpc.y;
    if rx <= 0.0 || ry <= 0.0 {
        return GridRect::EMPTY;
    }

    let edge = (resolution - 1) as f32;
    if center.x < -rx || center.y < -ry || center.x > edge + rx || center.y > edge + ry {
        return GridRect::EMPTY;
    }

    let rect = GridRect::from_min_max(
        (center.x - rx).floor() as i64,
        (center.y - ry).floor() as i64,
        (center.x + rx).ceil() as i64,
        (center.y + ry).ceil() as i64,
    )
    .clamped(resolution);
    if rect.is_empty() {
        return GridRect::EMPTY;
    }

    match brush.mode {
        BrushMode::RaiseLower => {
            raise_lower(store, surface, rect, center, Vec2::new(rx, ry), extent.size.y, brush, lower, dt)
        }
        BrushMode::Smooth => {
            smooth(store, surface, rect, center, Vec2::new(rx, ry), brush, dt)
        }
    }

    rect
}

/// Normalized elliptical distance of a cell from the brush center
fn radial(x: u32, y: u32, center: Vec2, radius_cells: Vec2) -> f32 {
    let dx = (x as f32 - center.x) / radius_cells.x;
    let dy = (y as f32 - center.y) / radius_cells.y;
    (dx * dx + dy * dy).sqrt()
}

#[allow(clippy::too_many_arguments)]
fn raise_lower(
    store: &mut TerrainStore,
    surface: SurfaceId,
    rect: GridRect,
    center: Vec2,
    radius_cells: Vec2,
    vertical_scale: f32,
    brush: &Brush,
    lower: bool,
    dt: f32,
) {
    let Some(mut window) = store.read_window(surface, rect) else {
        return;
    };

    let sign = if lower { -1.0 } else { 1.0 };
    let rate = brush.raise_strength * dt * sign / vertical_scale * 10.0;

    for (x, y) in rect.cells() {
        let r = radial(x, y, center, radius_cells);
        if r > 1.0 {
            continue;
        }
        let h = window.get_grid(x, y);
        window.set_grid(x, y, (h + rate * brush.falloff(r)).clamp(0.0, 1.0));
    }

    store.write_window(surface, &window);
}

fn smooth(
    store: &mut TerrainStore,
    surface: SurfaceId,
    rect: GridRect,
    center: Vec2,
    radius_cells: Vec2,
    brush: &Brush,
    dt: f32,
) {
    let resolution = match store.extent(surface) {
        Some(e) => e.resolution,
        None => return,
    };

    // The neighborhood average reads past the painted window; snapshot a
    // wider rect so every average uses pre-paint values
    let expanded = GridRect::from_min_max(
        rect.x as i64 - SMOOTH_KERNEL_RADIUS,
        rect.y as i64 - SMOOTH_KERNEL_RADIUS,
        rect.right() as i64 - 1 + SMOOTH_KERNEL_RADIUS,
        rect.bottom() as i64 - 1 + SMOOTH_KERNEL_RADIUS,
    )
    .clamped(resolution);

    let (Some(snapshot), Some(mut window)) = (
        store.read_window(surface, expanded),
        store.read_window(surface, rect),
    ) else {
        return;
    };

    let blend = (brush.smooth_strength * dt).clamp(0.0, 1.0);

    for (x, y) in rect.cells() {
        let r = radial(x, y, center, radius_cells);
        if r > 1.0 {
            continue;
        }

        // Weighted neighborhood average; weight is a squared linear
        // falloff from the kernel center. Border cells just use fewer
        // neighbors.
        let mut sum = 0.0;
        let mut weight_sum = 0.0;
        for ky in -SMOOTH_KERNEL_RADIUS..=SMOOTH_KERNEL_RADIUS {
            for kx in -SMOOTH_KERNEL_RADIUS..=SMOOTH_KERNEL_RADIUS {
                let sx = x as i64 + kx;
                let sy = y as i64 + ky;
                if sx < snapshot.rect.x as i64
                    || sy < snapshot.rect.y as i64
                    || sx >= snapshot.rect.right() as i64
                    || sy >= snapshot.rect.bottom() as i64
                {
                    continue;
                }
                let d = ((kx * kx + ky * ky) as f32).sqrt()
                    / (SMOOTH_KERNEL_RADIUS as f32 + 1.0);
                let w = (1.0 - d).max(0.0).powi(2);
                sum += snapshot.get_grid(sx as u32, sy as u32) * w;
                weight_sum += w;
            }
        }

        let average = sum / weight_sum;
        let h = window.get_grid(x, y);
        window.set_grid(x, y, h + (average - h) * blend * brush.falloff(r));
    }

    store.write_window(surface, &window);
}
