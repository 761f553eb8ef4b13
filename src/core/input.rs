//! Input state tracking
//!
//! Raw device events are folded into logical actions so the sculpting and
//! combat systems never see keycodes or buttons. Hosts with a window feed
//! winit events through [`InputState::process_event`]; headless hosts and
//! tests drive the same state with [`InputState::set_action`].

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::math::Ray;

/// Logical input actions the engine reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Primary paint trigger (raise/lower brush)
    PaintPrimary,
    /// Secondary paint trigger (smooth brush)
    PaintSecondary,
    /// Invert the primary brush (lower instead of raise)
    LowerModifier,
    /// Melee attack
    Attack,
    /// Ultimate attack
    Ultimate,
}

/// Device-to-action bindings
#[derive(Clone, Debug)]
pub struct Bindings {
    pub paint_primary: MouseButton,
    pub paint_secondary: MouseButton,
    pub lower_modifier: KeyCode,
    pub attack: KeyCode,
    pub ultimate: KeyCode,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            paint_primary: MouseButton::Left,
            paint_secondary: MouseButton::Right,
            lower_modifier: KeyCode::ShiftLeft,
            attack: KeyCode::KeyF,
            ultimate: KeyCode::KeyR,
        }
    }
}

/// Tracks logical action state and the pointer ray
pub struct InputState {
    bindings: Bindings,
    /// Currently active actions
    active: HashSet<Action>,
    /// Actions activated this frame
    just_activated: HashSet<Action>,
    /// Actions released this frame
    just_released: HashSet<Action>,
    /// World-space ray under the pointer, supplied by the host camera
    pointer_ray: Option<Ray>,
}

impl InputState {
    /// Create new input state with default bindings
    pub fn new() -> Self {
        Self::with_bindings(Bindings::default())
    }

    /// Create new input state with custom bindings
    pub fn with_bindings(bindings: Bindings) -> Self {
        Self {
            bindings,
            active: HashSet::new(),
            just_activated: HashSet::new(),
            just_released: HashSet::new(),
            pointer_ray: None,
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => {
                if let Some(action) = self.key_action(*key_code) {
                    self.apply(action, *state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(action) = self.button_action(*button) {
                    self.apply(action, *state == ElementState::Pressed);
                }
            }
            _ => {}
        }
    }

    /// Directly set an action's state (headless hosts, tests, replays)
    pub fn set_action(&mut self, action: Action, active: bool) {
        self.apply(action, active);
    }

    /// Set the world-space pointer ray for this frame
    pub fn set_pointer_ray(&mut self, ray: Ray) {
        self.pointer_ray = Some(ray);
    }

    /// Clear the pointer ray (e.g. pointer left the window)
    pub fn clear_pointer_ray(&mut self) {
        self.pointer_ray = None;
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.just_activated.clear();
        self.just_released.clear();
    }

    /// Check if an action is currently active
    pub fn is_active(&self, action: Action) -> bool {
        self.active.contains(&action)
    }

    /// Check if an action was activated this frame
    pub fn just_activated(&self, action: Action) -> bool {
        self.just_activated.contains(&action)
    }

    /// Check if an action was released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Current pointer ray, if the host supplied one
    pub fn pointer_ray(&self) -> Option<Ray> {
        self.pointer_ray
    }

    fn apply(&mut self, action: Action, pressed: bool) {
        if pressed {
            if !self.active.contains(&action) {
                self.just_activated.insert(action);
            }
            self.active.insert(action);
        } else if self.active.remove(&action) {
            self.just_released.insert(action);
        }
    }

    fn key_action(&self, key: KeyCode) -> Option<Action> {
        if key == self.bindings.lower_modifier {
            Some(Action::LowerModifier)
        } else if key == self.bindings.attack {
            Some(Action::Attack)
        } else if key == self.bindings.ultimate {
            Some(Action::Ultimate)
        } else {
            None
        }
    }

    fn button_action(&self, button: MouseButton) -> Option<Action> {
        if button == self.bindings.paint_primary {
            Some(Action::PaintPrimary)
        } else if button == self.bindings.paint_secondary {
            Some(Action::PaintSecondary)
        } else {
            None
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_edges() {
        let mut input = InputState::new();

        assert!(!input.is_active(Action::PaintPrimary));

        input.set_action(Action::PaintPrimary, true);
        assert!(input.is_active(Action::PaintPrimary));
        assert!(input.just_activated(Action::PaintPrimary));

        input.end_frame();
        assert!(input.is_active(Action::PaintPrimary));
        assert!(!input.just_activated(Action::PaintPrimary));

        input.set_action(Action::PaintPrimary, false);
        assert!(!input.is_active(Action::PaintPrimary));
        assert!(input.just_released(Action::PaintPrimary));
    }

    #[test]
    fn test_repeat_press_is_not_reactivation() {
        let mut input = InputState::new();
        input.set_action(Action::Attack, true);
        input.end_frame();

        // Key-repeat style duplicate press
        input.set_action(Action::Attack, true);
        assert!(!input.just_activated(Action::Attack));
    }

    #[test]
    fn test_pointer_ray_roundtrip() {
        use glam::Vec3;
        let mut input = InputState::new();
        assert!(input.pointer_ray().is_none());

        input.set_pointer_ray(Ray::new(Vec3::ZERO, Vec3::NEG_Y));
        assert!(input.pointer_ray().is_some());

        input.clear_pointer_ray();
        assert!(input.pointer_ray().is_none());
    }
}
