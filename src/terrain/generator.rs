//! Noise-based baseline terrain generation
//!
//! Fills a height field with fractal Brownian motion noise. This is how a
//! session authors its baseline: generate, register with the store, then
//! capture. Painting deforms the grid away from this and decay blends back.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;

use crate::field::{HeightField, SurfaceExtent};

/// Parameters controlling baseline generation
#[derive(Clone, Debug)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f32,       // Horizontal scale in meters (larger = smoother)
    pub base: f32,        // Mean normalized height (0..1)
    pub relief: f32,      // Noise amplitude around the base (0..1)
    pub octaves: u32,     // FBM octaves (detail levels)
    pub persistence: f32, // FBM persistence (0.5 typical)
    pub lacunarity: f32,  // FBM lacunarity (2.0 typical)
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 60.0,
            base: 0.35,
            relief: 0.2,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Baseline terrain generator using fractal Brownian motion (FBM)
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a new generator with the given parameters
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    /// Get generator parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Normalized height (0..1) at a world XZ position
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Noise value in [-1, 1]
        let value = self.noise.get([nx, nz]) as f32;

        (self.params.base + value * self.params.relief).clamp(0.0, 1.0)
    }

    /// Fill a height field for the given extent, one row per rayon task
    pub fn fill(&self, field: &mut HeightField, extent: &SurfaceExtent) {
        let resolution = field.resolution();
        let mpc = extent.meters_per_cell();
        let origin = extent.origin;

        field
            .samples_mut()
            .par_chunks_mut(resolution as usize)
            .enumerate()
            .for_each(|(row, samples)| {
                let z = origin.z + row as f32 * mpc.y;
                for (col, sample) in samples.iter_mut().enumerate() {
                    let x = origin.x + col as f32 * mpc.x;
                    *sample = self.height_at(x, z);
                }
            });
    }
}
