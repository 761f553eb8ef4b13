//! Height grid storage and windowed access

use crate::math::GridRect;

/// A square grid of normalized height samples (0..1).
///
/// All coordinate access is clamped to `[0, resolution-1]`; reads and
/// writes outside the grid land on the border cell instead of failing.
#[derive(Clone, Debug)]
pub struct HeightField {
    resolution: u32,
    samples: Vec<f32>,
}

impl HeightField {
    /// Create a flat field at the given normalized height
    pub fn new(resolution: u32, initial: f32) -> Self {
        let resolution = resolution.max(2);
        Self {
            resolution,
            samples: vec![initial; (resolution * resolution) as usize],
        }
    }

    /// Samples per axis
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Get a sample, clamping coordinates to the grid
    pub fn get(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.resolution - 1);
        let y = y.min(self.resolution - 1);
        self.samples[(y * self.resolution + x) as usize]
    }

    /// Set a sample, clamping coordinates to the grid
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let x = x.min(self.resolution - 1);
        let y = y.min(self.resolution - 1);
        self.samples[(y * self.resolution + x) as usize] = value;
    }

    /// Copy a rectangular window out of the grid.
    /// The rect is clamped to the grid bounds first.
    pub fn read_window(&self, rect: GridRect) -> HeightWindow {
        let rect = rect.clamped(self.resolution);
        let mut samples = Vec::with_capacity(rect.area() as usize);
        for y in rect.y..rect.bottom() {
            let row = (y * self.resolution + rect.x) as usize;
            samples.extend_from_slice(&self.samples[row..row + rect.w as usize]);
        }
        HeightWindow { rect, samples }
    }

    /// Write a window back into the grid. Cells outside the grid bounds
    /// are dropped rather than wrapped.
    pub fn write_window(&mut self, window: &HeightWindow) {
        let rect = window.rect.clamped(self.resolution);
        for y in rect.y..rect.bottom() {
            let dst = (y * self.resolution + rect.x) as usize;
            let src_row = ((y - window.rect.y) * window.rect.w) as usize;
            let src = &window.samples[src_row..src_row + rect.w as usize];
            self.samples[dst..dst + rect.w as usize].copy_from_slice(src);
        }
    }

    /// All samples in row-major order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Mutable access to all samples, for bulk generation
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }
}

/// A rectangular copy of height samples, the unit of read/modify/write
/// traffic between the sculpting systems and the grid.
#[derive(Clone, Debug)]
pub struct HeightWindow {
    pub rect: GridRect,
    samples: Vec<f32>,
}

impl HeightWindow {
    /// Create a window filled with a constant value
    pub fn filled(rect: GridRect, value: f32) -> Self {
        Self {
            rect,
            samples: vec![value; rect.area() as usize],
        }
    }

    /// Get a sample by window-local coordinates
    pub fn get(&self, lx: u32, ly: u32) -> f32 {
        self.samples[(ly * self.rect.w + lx) as usize]
    }

    /// Set a sample by window-local coordinates
    pub fn set(&mut self, lx: u32, ly: u32, value: f32) {
        self.samples[(ly * self.rect.w + lx) as usize] = value;
    }

    /// Get a sample by grid coordinates; panics if outside the rect
    pub fn get_grid(&self, x: u32, y: u32) -> f32 {
        self.get(x - self.rect.x, y - self.rect.y)
    }

    /// Set a sample by grid coordinates; panics if outside the rect
    pub fn set_grid(&mut self, x: u32, y: u32, value: f32) {
        self.set(x - self.rect.x, y - self.rect.y, value);
    }

    /// All samples in row-major order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_clamped() {
        let mut field = HeightField::new(4, 0.0);
        field.set(1, 2, 0.75);
        assert_eq!(field.get(1, 2), 0.75);

        // Out-of-range coordinates clamp to the border cell
        field.set(100, 100, 0.25);
        assert_eq!(field.get(3, 3), 0.25);
        assert_eq!(field.get(100, 3), field.get(3, 3));
    }

    #[test]
    fn test_window_roundtrip() {
        let mut field = HeightField::new(8, 0.5);
        let rect = GridRect::new(2, 3, 3, 2);

        let mut window = field.read_window(rect);
        assert_eq!(window.rect, rect);
        assert!(window.samples().iter().all(|&s| s == 0.5));

        window.set(0, 0, 0.9);
        window.set_grid(4, 4, 0.1);
        field.write_window(&window);

        assert_eq!(field.get(2, 3), 0.9);
        assert_eq!(field.get(4, 4), 0.1);
        assert_eq!(field.get(0, 0), 0.5);
    }

    #[test]
    fn test_read_window_clamps_rect() {
        let field = HeightField::new(4, 0.0);
        let window = field.read_window(GridRect::new(2, 2, 10, 10));
        assert_eq!(window.rect, GridRect::new(2, 2, 2, 2));
    }
}
