//! Host-side animation and VFX hooks
//!
//! The engine fires triggers and spawns effects through these traits and
//! never reads anything back; hosts without a presentation layer plug in
//! the null implementations.

use crate::core::types::{Quat, Vec3};

/// Handle to a spawned effect instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VfxHandle(pub u64);

/// Trigger-based animation playback, fire-and-forget
pub trait AnimationDriver {
    /// Fire a named animation trigger
    fn fire_trigger(&mut self, name: &str);
}

/// Particle/VFX spawning
pub trait VfxSpawner {
    /// Spawn an effect. `lifetime` is the expected seconds until the
    /// effect cleans itself up; the engine does not track it further.
    fn spawn(&mut self, effect: &str, position: Vec3, rotation: Quat, lifetime: f32) -> VfxHandle;
}

/// Animation driver that drops every trigger
#[derive(Default)]
pub struct NullAnimation;

impl AnimationDriver for NullAnimation {
    fn fire_trigger(&mut self, _name: &str) {}
}

/// VFX spawner that spawns nothing
#[derive(Default)]
pub struct NullVfx {
    next: u64,
}

impl VfxSpawner for NullVfx {
    fn spawn(&mut self, _effect: &str, _position: Vec3, _rotation: Quat, _lifetime: f32) -> VfxHandle {
        self.next += 1;
        VfxHandle(self.next)
    }
}
