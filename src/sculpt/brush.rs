//! Brush settings and falloff curve

use serde::{Deserialize, Serialize};

use super::config::SculptConfig;

/// How a brush modifies the height grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushMode {
    /// Raise the terrain (or lower it with the modifier held)
    #[default]
    RaiseLower,
    /// Blend each cell toward its neighborhood average
    Smooth,
}

/// One brush invocation's settings, read fresh from config each paint
#[derive(Clone, Copy, Debug)]
pub struct Brush {
    /// Radius in world meters
    pub radius: f32,
    /// Raise/lower rate (normalized height per second)
    pub raise_strength: f32,
    /// Smoothing rate (blend fraction per second)
    pub smooth_strength: f32,
    /// Edge sharpness, 0..1
    pub hardness: f32,
    pub mode: BrushMode,
}

impl Brush {
    /// Build a brush from the session config for the given mode
    pub fn from_config(config: &SculptConfig, mode: BrushMode) -> Self {
        Self {
            radius: config.brush_radius,
            raise_strength: config.raise_strength,
            smooth_strength: config.smooth_strength,
            hardness: config.hardness,
            mode,
        }
    }

    /// Falloff weight at normalized radial distance `r` (0 = center,
    /// 1 = brush edge). Cells beyond the edge get zero.
    ///
    /// Smoothstep-shaped; hardness raises the inner exponent so a hard
    /// brush holds full strength almost to the edge.
    pub fn falloff(&self, r: f32) -> f32 {
        falloff(r, self.hardness)
    }
}

/// Hardness-shaped smoothstep falloff
pub fn falloff(r: f32, hardness: f32) -> f32 {
    let t = 1.0 - r.clamp(0.0, 1.0);
    let a = 0.75 + (4.0 - 0.75) * hardness.clamp(0.0, 1.0);
    t.powf(a) * (3.0 - 2.0 * t)
}
