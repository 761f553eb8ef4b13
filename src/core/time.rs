//! Tick timing utilities

use std::time::{Duration, Instant};

/// Tracks wall-clock time between ticks for hosts that drive the
/// engine from real time. Headless hosts can pass a fixed `dt`
/// instead and skip this entirely.
pub struct TickTimer {
    last_tick: Instant,
    delta: Duration,
    tick_count: u64,
    /// Exponential moving average of the tick rate (Hz)
    smoothed_rate: f32,
}

impl TickTimer {
    /// Create a new tick timer
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta: Duration::ZERO,
            tick_count: 0,
            smoothed_rate: 0.0,
        }
    }

    /// Call once per tick to update timing
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_tick;
        self.last_tick = now;
        self.tick_count += 1;

        let secs = self.delta.as_secs_f32();
        if secs > 0.0 {
            let rate = 1.0 / secs;
            if self.smoothed_rate == 0.0 {
                self.smoothed_rate = rate;
            } else {
                self.smoothed_rate = self.smoothed_rate * 0.95 + rate * 0.05;
            }
        }
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get delta time as Duration
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Smoothed tick rate in Hz (0 until the second tick)
    pub fn rate(&self) -> f32 {
        self.smoothed_rate
    }

    /// Get total tick count
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}
