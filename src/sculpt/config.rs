//! Sculpting configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Tunable parameters for the sculpting session.
///
/// Everything here is a knob, not a command; systems re-read the config
/// every invocation so hosts can edit values live.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SculptConfig {
    /// Brush radius in world meters
    pub brush_radius: f32,
    /// Raise/lower rate (normalized height per second at full falloff)
    pub raise_strength: f32,
    /// Smoothing rate (blend fraction per second)
    pub smooth_strength: f32,
    /// Brush edge sharpness (0 = soft, 1 = hard)
    pub hardness: f32,
    /// Repaint rate while the pointer is stationary (Hz)
    pub stationary_paint_hz: f32,
    /// Pointer movement below this distance counts as stationary (meters)
    pub stationary_threshold: f32,
    /// Spacing of interpolated samples along a drag (meters)
    pub drag_step: f32,
    /// Seconds a region holds its shape after a stroke before decaying
    pub decay_delay: f32,
    /// Seconds a decay blend takes to reach the baseline
    pub decay_duration: f32,
    /// Restart overlapping decays on repaint instead of only widening them
    pub restart_on_repaint: bool,
    /// Search radius for the stationary peak bias (meters)
    pub peak_search_radius: f32,
    /// Minimum peak height difference to bias toward (meters)
    pub peak_min_delta: f32,
    /// Samples closer than this to the protected actor are skipped (meters)
    pub protected_radius: f32,
    /// Maximum pointer ray distance (meters)
    pub max_interact_distance: f32,
}

impl Default for SculptConfig {
    fn default() -> Self {
        Self {
            brush_radius: 4.0,
            raise_strength: 1.0,
            smooth_strength: 4.0,
            hardness: 0.3,
            stationary_paint_hz: 15.0,
            stationary_threshold: 0.05,
            drag_step: 0.5,
            decay_delay: 2.0,
            decay_duration: 3.0,
            restart_on_repaint: true,
            peak_search_radius: 2.0,
            peak_min_delta: 0.15,
            protected_radius: 1.5,
            max_interact_distance: 60.0,
        }
    }
}

impl SculptConfig {
    /// Load config from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| crate::core::Error::Config(format!("invalid config JSON: {}", e)))
    }
}
