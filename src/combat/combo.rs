//! Combo and ultimate attack state machine
//!
//! A linear sequence of attack steps. Each step plays its animation
//! trigger, opens a normalized hit window during which nearby targets are
//! collected (each target hit at most once per step), and advances to the
//! next step only if a fresh attack input landed inside the trailing
//! queue window. The ultimate is mutually exclusive with the combo and
//! blocks attack input for its whole duration.

use std::collections::HashSet;

use crate::core::input::{Action, InputState};
use crate::core::types::{Quat, Vec3};
use crate::scene::{ActorId, AnimationDriver, SceneActors, VfxSpawner};

/// One step of the combo sequence
#[derive(Clone, Debug)]
pub struct ComboStep {
    /// Animation trigger fired when the step starts
    pub trigger: String,
    /// Step length in seconds
    pub duration: f32,
    /// Normalized time the hit window opens
    pub hit_start: f32,
    /// Normalized time the hit window closes
    pub hit_end: f32,
    /// Seconds before the step ends during which the next attack queues
    pub queue_window: f32,
    /// Overlap query radius in meters
    pub range: f32,
}

/// Combo and ultimate tuning
#[derive(Clone, Debug)]
pub struct ComboConfig {
    pub steps: Vec<ComboStep>,
    /// Seconds of time dilation after a step's first contact
    pub hitstop_duration: f32,
    /// Time scale while hit-stop is active
    pub hitstop_scale: f32,
    /// Seconds the ultimate lasts
    pub ultimate_duration: f32,
    /// Animation trigger for the ultimate
    pub ultimate_trigger: String,
    /// Effect spawned when the ultimate starts
    pub ultimate_effect: String,
    /// Expected lifetime of the ultimate effect
    pub ultimate_effect_lifetime: f32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        let step = |trigger: &str, duration: f32| ComboStep {
            trigger: trigger.to_string(),
            duration,
            hit_start: 0.2,
            hit_end: 0.55,
            queue_window: 0.25,
            range: 2.2,
        };
        Self {
            steps: vec![
                step("attack_1", 0.5),
                step("attack_2", 0.5),
                step("attack_3", 0.7),
            ],
            hitstop_duration: 0.08,
            hitstop_scale: 0.05,
            ultimate_duration: 4.0,
            ultimate_trigger: "ultimate".to_string(),
            ultimate_effect: "ultimate_blast".to_string(),
            ultimate_effect_lifetime: 3.0,
        }
    }
}

enum CombatState {
    Idle,
    Step {
        index: usize,
        elapsed: f32,
        /// Targets already hit this step
        hit: HashSet<ActorId>,
        queued: bool,
    },
    Ultimate {
        remaining: f32,
    },
}

/// Drives the combo sequence and the ultimate
pub struct ComboController {
    config: ComboConfig,
    state: CombatState,
    hitstop: f32,
    /// Targets struck on the most recent tick, for the host to damage
    last_hits: Vec<ActorId>,
}

impl ComboController {
    /// Create an idle controller
    pub fn new(config: ComboConfig) -> Self {
        Self {
            config,
            state: CombatState::Idle,
            hitstop: 0.0,
            last_hits: Vec::new(),
        }
    }

    /// Advance by one tick. `origin` is the attacker's position for
    /// overlap queries and effect placement.
    pub fn tick(
        &mut self,
        input: &InputState,
        actors: &SceneActors,
        anim: &mut dyn AnimationDriver,
        vfx: &mut dyn VfxSpawner,
        origin: Vec3,
        dt: f32,
    ) {
        self.last_hits.clear();
        self.hitstop = (self.hitstop - dt).max(0.0);

        // The ultimate preempts everything, including a running combo
        if input.just_activated(Action::Ultimate)
            && !matches!(self.state, CombatState::Ultimate { .. })
        {
            anim.fire_trigger(&self.config.ultimate_trigger);
            vfx.spawn(
                &self.config.ultimate_effect,
                origin,
                Quat::IDENTITY,
                self.config.ultimate_effect_lifetime,
            );
            self.state = CombatState::Ultimate {
                remaining: self.config.ultimate_duration,
            };
            return;
        }

        match &mut self.state {
            CombatState::Idle => {
                if input.just_activated(Action::Attack) && !self.config.steps.is_empty() {
                    anim.fire_trigger(&self.config.steps[0].trigger);
                    self.state = CombatState::Step {
                        index: 0,
                        elapsed: 0.0,
                        hit: HashSet::new(),
                        queued: false,
                    };
                }
            }
            CombatState::Step { index, elapsed, hit, queued } => {
                let step = &self.config.steps[*index];

                if input.just_activated(Action::Attack)
                    && *elapsed >= step.duration - step.queue_window
                {
                    *queued = true;
                }

                *elapsed += dt;

                // Hit window: collect overlapping targets, each at most
                // once per step; dilate time on the step's first contact
                let t = (*elapsed / step.duration).min(1.0);
                if t >= step.hit_start && t <= step.hit_end {
                    let mut first_contact = hit.is_empty();
                    for actor in actors.within(origin, step.range) {
                        if hit.insert(actor.id) {
                            self.last_hits.push(actor.id);
                        }
                    }
                    first_contact &= !hit.is_empty();
                    if first_contact {
                        self.hitstop = self.config.hitstop_duration;
                    }
                }

                if *elapsed >= step.duration {
                    let next = *index + 1;
                    if *queued && next < self.config.steps.len() {
                        anim.fire_trigger(&self.config.steps[next].trigger);
                        self.state = CombatState::Step {
                            index: next,
                            elapsed: 0.0,
                            hit: HashSet::new(),
                            queued: false,
                        };
                    } else {
                        self.state = CombatState::Idle;
                    }
                }
            }
            CombatState::Ultimate { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.state = CombatState::Idle;
                }
            }
        }
    }

    /// Time scale the host should apply while hit-stop is active
    pub fn time_scale(&self) -> f32 {
        if self.hitstop > 0.0 {
            self.config.hitstop_scale
        } else {
            1.0
        }
    }

    /// True while movement and attack input should be blocked
    pub fn blocks_input(&self) -> bool {
        matches!(self.state, CombatState::Ultimate { .. })
    }

    /// Index of the current combo step, if one is running
    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            CombatState::Step { index, .. } => Some(index),
            _ => None,
        }
    }

    /// True while the ultimate is running
    pub fn in_ultimate(&self) -> bool {
        matches!(self.state, CombatState::Ultimate { .. })
    }

    /// Targets struck on the most recent tick
    pub fn last_hits(&self) -> &[ActorId] {
        &self.last_hits
    }
}
