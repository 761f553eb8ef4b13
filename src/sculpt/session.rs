//! Sculpting session lifecycle
//!
//! Hosts own the tick loop; the session owns everything else. `start`
//! captures the baselines, `tick` advances the stroke tracker and then
//! the decay scheduler (paints land before any decay-restart check in
//! the same tick), and `stop` parks the session while keeping queued
//! decay requests for the next activation.

use crate::core::input::InputState;
use crate::field::TerrainStore;
use crate::scene::SceneActors;
use super::baseline::BaselineManager;
use super::config::SculptConfig;
use super::decay::DecayScheduler;
use super::stroke::StrokeTracker;

/// Owns the sculpting subsystems and their shared lifecycle
pub struct SculptSession {
    config: SculptConfig,
    tracker: StrokeTracker,
    decay: DecayScheduler,
    baselines: BaselineManager,
    active: bool,
    warned_no_pointer: bool,
}

impl SculptSession {
    /// Create an inactive session
    pub fn new(config: SculptConfig) -> Self {
        Self {
            config,
            tracker: StrokeTracker::new(),
            decay: DecayScheduler::new(),
            baselines: BaselineManager::new(),
            active: false,
            warned_no_pointer: false,
        }
    }

    /// Activate the session, capturing every surface's baseline.
    ///
    /// Runs the capture exactly once per activation, before any painting
    /// can occur. Calling `start` on an active session is a no-op.
    pub fn start(&mut self, store: &TerrainStore) {
        if self.active {
            log::warn!("sculpt session already active, ignoring start");
            return;
        }
        self.baselines.capture_all(store);
        self.active = true;
        log::info!("sculpt session started");
    }

    /// Deactivate the session. Queued decay requests are kept and resume
    /// when the session starts again.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        log::info!("sculpt session stopped");
    }

    /// Whether the session is currently active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance painting and decay by one tick
    pub fn tick(
        &mut self,
        store: &mut TerrainStore,
        input: &InputState,
        actors: &SceneActors,
        dt: f32,
    ) {
        if !self.active {
            return;
        }

        // A missing pointer ray disables painting until it reappears;
        // logged once, never fatal
        match input.pointer_ray() {
            None => {
                if !self.warned_no_pointer {
                    log::warn!("no pointer ray supplied; painting disabled until one arrives");
                    self.warned_no_pointer = true;
                }
            }
            Some(_) => self.warned_no_pointer = false,
        }

        self.tracker
            .tick(store, input, actors, &mut self.decay, &self.config, dt);
        self.decay.tick(store, &self.baselines, dt, self.active);
    }

    /// Force-restore every captured baseline and drop all active decays
    pub fn restore(&mut self, store: &mut TerrainStore) {
        self.baselines.restore_all(store);
        self.decay.clear();
        log::info!("restored baselines, cleared active decays");
    }

    /// Session configuration
    pub fn config(&self) -> &SculptConfig {
        &self.config
    }

    /// Mutable configuration for live tuning
    pub fn config_mut(&mut self) -> &mut SculptConfig {
        &mut self.config
    }

    /// The stroke tracker, for host queries
    pub fn tracker(&self) -> &StrokeTracker {
        &self.tracker
    }

    /// The decay scheduler, for host queries
    pub fn decay(&self) -> &DecayScheduler {
        &self.decay
    }

    /// The baseline manager, for host queries
    pub fn baselines(&self) -> &BaselineManager {
        &self.baselines
    }
}
