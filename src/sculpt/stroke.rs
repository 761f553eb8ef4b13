//! Stroke tracking
//!
//! Turns continuous pointer samples into discrete paint invocations. A
//! stroke runs from paint-trigger press to release: dragging interpolates
//! dabs along the pointer path, holding still repaints at a fixed rate
//! biased toward the local peak, and every touched region is accumulated
//! so the decay scheduler can take over when the stroke ends.

use std::collections::HashMap;

use crate::core::input::{Action, InputState};
use crate::core::types::{Vec2, Vec3};
use crate::field::{SurfaceId, TerrainStore};
use crate::math::GridRect;
use crate::scene::SceneActors;
use super::brush::{Brush, BrushMode};
use super::config::SculptConfig;
use super::decay::DecayScheduler;
use super::painter;
use super::peak;

/// In-flight stroke state, destroyed at stroke end
struct Stroke {
    last_hit: Option<(Vec3, SurfaceId)>,
    regions: HashMap<SurfaceId, Vec<GridRect>>,
    stationary_accum: f32,
}

impl Stroke {
    fn new() -> Self {
        Self {
            last_hit: None,
            regions: HashMap::new(),
            stationary_accum: 0.0,
        }
    }
}

/// Converts pointer/button state into brush paints, once per tick
pub struct StrokeTracker {
    stroke: Option<Stroke>,
}

impl StrokeTracker {
    /// Create an idle tracker
    pub fn new() -> Self {
        Self { stroke: None }
    }

    /// True while a stroke is in progress
    pub fn is_painting(&self) -> bool {
        self.stroke.is_some()
    }

    /// Number of accumulated regions for a surface in the current stroke
    pub fn region_count(&self, surface: SurfaceId) -> usize {
        self.stroke
            .as_ref()
            .and_then(|s| s.regions.get(&surface))
            .map(|r| r.len())
            .unwrap_or(0)
    }

    /// Advance the stroke state machine by one tick.
    ///
    /// A ray miss or a non-paintable hit is a no-op for the tick, not an
    /// error; the stroke stays open until the trigger is released.
    pub fn tick(
        &mut self,
        store: &mut TerrainStore,
        input: &InputState,
        actors: &SceneActors,
        decay: &mut DecayScheduler,
        config: &SculptConfig,
        dt: f32,
    ) {
        let painting = input.is_active(Action::PaintPrimary)
            || input.is_active(Action::PaintSecondary);

        if !painting {
            if let Some(stroke) = self.stroke.take() {
                Self::finish(stroke, decay, config);
            }
            return;
        }

        let stroke = self.stroke.get_or_insert_with(Stroke::new);

        let Some(ray) = input.pointer_ray() else {
            return;
        };
        let Some(hit) = store.raycast(&ray, config.max_interact_distance) else {
            return;
        };
        if !store.is_paintable(hit.surface) {
            return;
        }

        // Smooth only when the secondary trigger is held alone
        let mode = if input.is_active(Action::PaintSecondary)
            && !input.is_active(Action::PaintPrimary)
        {
            BrushMode::Smooth
        } else {
            BrushMode::RaiseLower
        };
        let brush = Brush::from_config(config, mode);
        let lower = input.is_active(Action::LowerModifier);

        match stroke.last_hit {
            Some((prev, surface)) if surface == hit.surface => {
                let moved = Vec2::new(hit.point.x - prev.x, hit.point.z - prev.z).length();
                if moved >= config.stationary_threshold {
                    // Moving: spread dabs along the dragged segment
                    let samples = ((moved / config.drag_step).ceil() as u32).max(1);
                    let sample_dt = dt / samples as f32;
                    for i in 1..=samples {
                        let t = i as f32 / samples as f32;
                        let point = prev.lerp(hit.point, t);
                        Self::paint_at(
                            store, actors, decay, config, &brush, lower, sample_dt,
                            hit.surface, point, &mut stroke.regions,
                        );
                    }
                    stroke.stationary_accum = 0.0;
                    stroke.last_hit = Some((hit.point, hit.surface));
                } else {
                    // Stationary: repaint at a fixed rate, biased toward
                    // the growing tip
                    stroke.stationary_accum += dt;
                    let interval = 1.0 / config.stationary_paint_hz;
                    while stroke.stationary_accum >= interval {
                        stroke.stationary_accum -= interval;
                        let target = match peak::find_local_peak(
                            store,
                            hit.surface,
                            hit.point,
                            config.peak_search_radius,
                        ) {
                            Some(p) if p.delta >= config.peak_min_delta => p.point,
                            _ => hit.point,
                        };
                        Self::paint_at(
                            store, actors, decay, config, &brush, lower, interval,
                            hit.surface, target, &mut stroke.regions,
                        );
                    }
                }
            }
            _ => {
                // First sample of the stroke, or the pointer crossed onto
                // a different surface
                Self::paint_at(
                    store, actors, decay, config, &brush, lower, dt,
                    hit.surface, hit.point, &mut stroke.regions,
                );
                stroke.stationary_accum = 0.0;
                stroke.last_hit = Some((hit.point, hit.surface));
            }
        }
    }

    /// Paint one dab, accumulate its region, and poke overlapping decays
    #[allow(clippy::too_many_arguments)]
    fn paint_at(
        store: &mut TerrainStore,
        actors: &SceneActors,
        decay: &mut DecayScheduler,
        config: &SculptConfig,
        brush: &Brush,
        lower: bool,
        dt: f32,
        surface: SurfaceId,
        point: Vec3,
        regions: &mut HashMap<SurfaceId, Vec<GridRect>>,
    ) {
        if let Some(protected) = actors.protected_position() {
            if protected.distance(point) < config.protected_radius {
                return;
            }
        }

        let region = painter::paint(store, surface, point, brush, lower, dt);
        if region.is_empty() {
            return;
        }

        let list = regions.entry(surface).or_default();
        if let Some(existing) = list.iter_mut().find(|r| r.intersects(&region)) {
            *existing = existing.union(&region);
        } else {
            list.push(region);
        }

        decay.notify_repaint(
            surface,
            region,
            config.decay_delay,
            config.decay_duration,
            config.restart_on_repaint,
        );
    }

    /// Hand every accumulated region to the decay scheduler
    fn finish(stroke: Stroke, decay: &mut DecayScheduler, config: &SculptConfig) {
        for (surface, rects) in stroke.regions {
            for rect in rects {
                decay.request(
                    surface,
                    rect,
                    config.decay_delay,
                    config.decay_duration,
                    config.restart_on_repaint,
                );
            }
        }
    }
}

impl Default for StrokeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{HeightField, SurfaceExtent};
    use crate::math::Ray;
    use crate::sculpt::baseline::BaselineManager;

    const DT: f32 = 0.05;

    struct Rig {
        store: TerrainStore,
        input: InputState,
        actors: SceneActors,
        decay: DecayScheduler,
        tracker: StrokeTracker,
        config: SculptConfig,
        surface: SurfaceId,
    }

    fn rig() -> Rig {
        // 801 samples over 100 m: 0.125 m cells, fine enough to separate
        // drag dabs from a small brush
        let extent = SurfaceExtent {
            origin: Vec3::ZERO,
            size: Vec3::new(100.0, 50.0, 100.0),
            resolution: 801,
        };
        let mut store = TerrainStore::new();
        let surface = store
            .add_surface(extent, HeightField::new(801, 0.5), true)
            .unwrap();
        Rig {
            store,
            input: InputState::new(),
            actors: SceneActors::new(),
            decay: DecayScheduler::new(),
            tracker: StrokeTracker::new(),
            config: SculptConfig::default(),
            surface,
        }
    }

    fn point_at(rig: &mut Rig, x: f32, z: f32) {
        rig.input
            .set_pointer_ray(Ray::new(Vec3::new(x, 45.0, z), Vec3::NEG_Y));
    }

    fn tick(rig: &mut Rig) {
        rig.tracker.tick(
            &mut rig.store,
            &rig.input,
            &rig.actors,
            &mut rig.decay,
            &rig.config,
            DT,
        );
        rig.input.end_frame();
    }

    #[test]
    fn test_press_paints_release_submits_decay() {
        let mut rig = rig();
        point_at(&mut rig, 50.0, 50.0);
        rig.input.set_action(Action::PaintPrimary, true);
        tick(&mut rig);

        assert!(rig.tracker.is_painting());
        assert!(rig.store.height_at_world(rig.surface, 50.0, 50.0).unwrap() > 25.0);
        assert_eq!(rig.decay.active_count(rig.surface), 0);

        rig.input.set_action(Action::PaintPrimary, false);
        tick(&mut rig);

        assert!(!rig.tracker.is_painting());
        assert_eq!(rig.decay.active_count(rig.surface), 1);
    }

    #[test]
    fn test_drag_interpolates_exact_sample_count() {
        let mut rig = rig();
        // A brush much smaller than the 0.5 m drag step keeps each dab's
        // window disjoint, so the region list counts the dabs
        rig.config.brush_radius = 0.1;
        rig.config.drag_step = 0.5;

        point_at(&mut rig, 40.0, 50.0);
        rig.input.set_action(Action::PaintPrimary, true);
        tick(&mut rig); // first sample dab at 40.0

        // Pointer jumps 2 m in one tick: exactly 4 interpolated dabs
        point_at(&mut rig, 42.0, 50.0);
        tick(&mut rig);

        assert_eq!(rig.tracker.region_count(rig.surface), 5);
    }

    #[test]
    fn test_stationary_repaints_at_fixed_rate() {
        let mut rig = rig();
        rig.config.stationary_paint_hz = 10.0; // interval 0.1 s

        point_at(&mut rig, 50.0, 50.0);
        rig.input.set_action(Action::PaintPrimary, true);

        // Tick 1 paints the first sample; ticks 2-8 accumulate 0.05 s
        // each, crossing the 0.1 s interval on ticks 3, 5 and 7
        for _ in 0..8 {
            tick(&mut rig);
        }

        // Center deposit: falloff(0) = 1, rate = strength/50*10 = 0.2/s.
        // First dab used dt = 0.05, the three stationary dabs 0.1 each.
        let expected = 0.5 + 0.2 * (0.05 + 3.0 * 0.1);
        let h = rig
            .store
            .height_at_world(rig.surface, 50.0, 50.0)
            .unwrap()
            / 50.0;
        assert!((h - expected).abs() < 1e-3, "h = {h}, expected {expected}");
    }

    #[test]
    fn test_protected_actor_blocks_dabs() {
        let mut rig = rig();
        let player = rig.actors.add(Vec3::new(50.0, 25.0, 50.0), 0.4);
        rig.actors.set_protected(player);

        point_at(&mut rig, 50.0, 50.0);
        rig.input.set_action(Action::PaintPrimary, true);
        for _ in 0..4 {
            tick(&mut rig);
        }

        let h = rig.store.height_at_world(rig.surface, 50.0, 50.0).unwrap();
        assert!((h - 25.0).abs() < 1e-4);
        assert_eq!(rig.tracker.region_count(rig.surface), 0);
    }

    #[test]
    fn test_ray_miss_keeps_stroke_open() {
        let mut rig = rig();
        rig.input.set_action(Action::PaintPrimary, true);
        rig.input
            .set_pointer_ray(Ray::new(Vec3::new(50.0, 45.0, 50.0), Vec3::Y));
        tick(&mut rig);

        assert!(rig.tracker.is_painting());
        assert!(rig.store.field(rig.surface).unwrap().samples().iter().all(|&h| h == 0.5));

        // Release with nothing painted: no decays
        rig.input.set_action(Action::PaintPrimary, false);
        tick(&mut rig);
        assert_eq!(rig.decay.active_count(rig.surface), 0);
    }

    #[test]
    fn test_non_paintable_surface_is_noop() {
        let mut rig = rig();
        let extent = SurfaceExtent {
            origin: Vec3::new(200.0, 0.0, 200.0),
            size: Vec3::new(10.0, 5.0, 10.0),
            resolution: 33,
        };
        let rock = rig
            .store
            .add_surface(extent, HeightField::new(33, 0.5), false)
            .unwrap();

        rig.input
            .set_pointer_ray(Ray::new(Vec3::new(205.0, 10.0, 205.0), Vec3::NEG_Y));
        rig.input.set_action(Action::PaintPrimary, true);
        tick(&mut rig);

        assert!(rig.store.field(rock).unwrap().samples().iter().all(|&h| h == 0.5));
        assert_eq!(rig.tracker.region_count(rock), 0);
    }

    #[test]
    fn test_repaint_restarts_pending_decay() {
        let mut rig = rig();
        rig.config.decay_delay = 1.0;

        // First stroke
        point_at(&mut rig, 50.0, 50.0);
        rig.input.set_action(Action::PaintPrimary, true);
        tick(&mut rig);
        rig.input.set_action(Action::PaintPrimary, false);
        tick(&mut rig);
        assert_eq!(rig.decay.active_count(rig.surface), 1);

        // Let the decay burn half its delay
        let baselines = {
            let mut b = BaselineManager::new();
            b.capture_all(&rig.store);
            b
        };
        for _ in 0..10 {
            rig.decay.tick(&mut rig.store, &baselines, DT, true);
        }

        // Overlapping second stroke restarts it mid-stroke
        point_at(&mut rig, 50.5, 50.0);
        rig.input.set_action(Action::PaintPrimary, true);
        tick(&mut rig);

        assert_eq!(rig.decay.active_count(rig.surface), 1);
        let entry = &rig.decay.entries(rig.surface)[0];
        assert!(entry.is_waiting());

        // Half the delay again still is not enough: the timer was reset
        for _ in 0..10 {
            rig.decay.tick(&mut rig.store, &baselines, DT, true);
        }
        assert!(rig.decay.entries(rig.surface)[0].is_waiting());
    }

    #[test]
    fn test_smooth_mode_via_secondary_trigger() {
        let mut rig = rig();
        // Spike to smooth away
        rig.store.field_mut(rig.surface).unwrap().set(400, 400, 1.0);

        point_at(&mut rig, 50.0, 50.0);
        rig.input.set_action(Action::PaintSecondary, true);
        tick(&mut rig);

        let h = rig.store.field(rig.surface).unwrap().get(400, 400);
        assert!(h < 1.0, "spike was not smoothed");
    }
}
