//! Timed decay back toward the baseline
//!
//! Every region a stroke touches eventually blends back to the captured
//! baseline. Each [`ActiveDecay`] is an explicit task record advanced once
//! per tick: it waits out its delay, snapshots the region's current
//! heights, then interpolates toward the baseline until done. Overlapping
//! requests coalesce; a restart always cancels the old record before the
//! replacement starts, so no two blends ever write the same cells.

use std::collections::HashMap;

use crate::field::{HeightWindow, SurfaceId, TerrainStore};
use crate::math::GridRect;
use super::baseline::BaselineManager;

enum DecayPhase {
    /// Holding shape until the delay elapses; no visual change
    Waiting { remaining: f32 },
    /// Blending from the heights captured at blend start
    Blending { progress: f32, start: HeightWindow },
}

/// One region currently decaying toward the baseline
pub struct ActiveDecay {
    region: GridRect,
    phase: DecayPhase,
    duration: f32,
}

impl ActiveDecay {
    /// Region this decay tracks
    pub fn region(&self) -> GridRect {
        self.region
    }

    /// True while the delay has not elapsed
    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, DecayPhase::Waiting { .. })
    }

    /// Normalized blend progress (0 while waiting)
    pub fn progress(&self) -> f32 {
        match &self.phase {
            DecayPhase::Waiting { .. } => 0.0,
            DecayPhase::Blending { progress, .. } => *progress,
        }
    }
}

/// Owns the set of active decays per surface
pub struct DecayScheduler {
    active: HashMap<SurfaceId, Vec<ActiveDecay>>,
}

impl DecayScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            active: HashMap::new(),
        }
    }

    /// Request a decay for a region, typically at stroke end.
    ///
    /// Overlapping an existing decay either restarts the union with a
    /// fresh timer (`restart_on_repaint`) or only widens the tracked
    /// region, leaving the running blend to finish over its original
    /// window; the widened remainder then holds until a later restart.
    pub fn request(
        &mut self,
        surface: SurfaceId,
        region: GridRect,
        delay: f32,
        duration: f32,
        restart_on_repaint: bool,
    ) {
        self.coalesce(surface, region, delay, duration, restart_on_repaint, true);
    }

    /// Notify the scheduler that a paint touched `region` mid-stroke.
    ///
    /// Only affects decays the region overlaps; painting over untouched
    /// terrain creates no decay until the stroke ends.
    pub fn notify_repaint(
        &mut self,
        surface: SurfaceId,
        region: GridRect,
        delay: f32,
        duration: f32,
        restart_on_repaint: bool,
    ) {
        self.coalesce(surface, region, delay, duration, restart_on_repaint, false);
    }

    fn coalesce(
        &mut self,
        surface: SurfaceId,
        region: GridRect,
        delay: f32,
        duration: f32,
        restart: bool,
        create_if_new: bool,
    ) {
        if region.is_empty() {
            return;
        }
        let entries = self.active.entry(surface).or_default();

        let overlaps = entries.iter().any(|e| e.region.intersects(&region));
        if !overlaps {
            if create_if_new {
                entries.push(ActiveDecay {
                    region,
                    phase: DecayPhase::Waiting { remaining: delay },
                    duration,
                });
            }
            return;
        }

        if restart {
            // Cancel every overlapping record first, then start one fresh
            // decay over the union with the full delay ahead of it. The
            // union can grow to overlap further entries, so merge until
            // nothing intersects it.
            let mut union = region;
            let mut merged = true;
            while merged {
                merged = false;
                let mut i = 0;
                while i < entries.len() {
                    if entries[i].region.intersects(&union) {
                        union = union.union(&entries[i].region);
                        entries.swap_remove(i);
                        merged = true;
                    } else {
                        i += 1;
                    }
                }
            }
            entries.push(ActiveDecay {
                region: union,
                phase: DecayPhase::Waiting { remaining: delay },
                duration,
            });
        } else if let Some(entry) = entries.iter_mut().find(|e| e.region.intersects(&region)) {
            // Widen-only path: the running blend keeps its start window,
            // so the added area does not decay until a future restart
            entry.region = entry.region.union(&region);
        }
    }

    /// Advance every active decay by `dt`.
    ///
    /// Does nothing while the session is inactive; requests queue up and
    /// run once it activates. Completed decays leave the grid exactly at
    /// the baseline over their blend window and are removed.
    pub fn tick(
        &mut self,
        store: &mut TerrainStore,
        baselines: &BaselineManager,
        dt: f32,
        session_active: bool,
    ) {
        if !session_active {
            return;
        }

        for (&surface, entries) in self.active.iter_mut() {
            entries.retain_mut(|entry| {
                Self::advance(store, baselines, surface, entry, dt)
            });
        }
        self.active.retain(|_, entries| !entries.is_empty());
    }

    /// Returns false when the entry is finished and should be removed
    fn advance(
        store: &mut TerrainStore,
        baselines: &BaselineManager,
        surface: SurfaceId,
        entry: &mut ActiveDecay,
        dt: f32,
    ) -> bool {
        match &mut entry.phase {
            DecayPhase::Waiting { remaining } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return true;
                }
                // Delay elapsed: capture the blend-start heights now
                let Some(start) = store.read_window(surface, entry.region) else {
                    log::warn!(
                        "decay dropped: surface {} not registered",
                        surface.raw()
                    );
                    return false;
                };
                if !baselines.has(surface) {
                    log::warn!(
                        "decay dropped: no baseline captured for surface {}",
                        surface.raw()
                    );
                    return false;
                }
                entry.phase = DecayPhase::Blending {
                    progress: 0.0,
                    start,
                };
                true
            }
            DecayPhase::Blending { progress, start } => {
                let Some(target) = baselines.window(surface, start.rect) else {
                    return false;
                };
                if target.rect != start.rect {
                    // Grid resolution changed under a running blend
                    log::warn!(
                        "decay dropped: surface {} baseline window mismatch",
                        surface.raw()
                    );
                    return false;
                }

                *progress = if entry.duration > 0.0 {
                    (*progress + dt / entry.duration).min(1.0)
                } else {
                    1.0
                };

                if *progress >= 1.0 {
                    // Land on the baseline bit-exactly
                    store.write_window(surface, &target);
                    return false;
                }

                let mut out = start.clone();
                for y in 0..start.rect.h {
                    for x in 0..start.rect.w {
                        let from = start.get(x, y);
                        let to = target.get(x, y);
                        out.set(x, y, from + (to - from) * *progress);
                    }
                }
                store.write_window(surface, &out);

                true
            }
        }
    }

    /// Number of active decays on a surface
    pub fn active_count(&self, surface: SurfaceId) -> usize {
        self.active.get(&surface).map(|e| e.len()).unwrap_or(0)
    }

    /// Total active decays across all surfaces
    pub fn total_active(&self) -> usize {
        self.active.values().map(|e| e.len()).sum()
    }

    /// Active decay records for a surface
    pub fn entries(&self, surface: SurfaceId) -> &[ActiveDecay] {
        self.active.get(&surface).map(|e| e.as_slice()).unwrap_or(&[])
    }

    /// Drop every active decay without touching the grid
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl Default for DecayScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::field::{HeightField, SurfaceExtent};

    const DELAY: f32 = 1.0;
    const DURATION: f32 = 2.0;
    const DT: f32 = 0.1;

    fn setup() -> (TerrainStore, BaselineManager, DecayScheduler, SurfaceId) {
        let extent = SurfaceExtent {
            origin: Vec3::ZERO,
            size: Vec3::new(10.0, 5.0, 10.0),
            resolution: 33,
        };
        let mut store = TerrainStore::new();
        let id = store
            .add_surface(extent, HeightField::new(33, 0.5), true)
            .unwrap();
        let mut baselines = BaselineManager::new();
        baselines.capture_all(&store);
        (store, baselines, DecayScheduler::new(), id)
    }

    fn raise_block(store: &mut TerrainStore, id: SurfaceId, rect: GridRect, height: f32) {
        let field = store.field_mut(id).unwrap();
        for (x, y) in rect.cells() {
            field.set(x, y, height);
        }
    }

    #[test]
    fn test_no_change_during_delay() {
        let (mut store, baselines, mut decay, id) = setup();
        let rect = GridRect::new(4, 4, 3, 3);
        raise_block(&mut store, id, rect, 0.9);

        decay.request(id, rect, DELAY, DURATION, true);
        for _ in 0..9 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        assert_eq!(store.field(id).unwrap().get(5, 5), 0.9);
        assert!(decay.entries(id)[0].is_waiting());
    }

    #[test]
    fn test_monotonic_blend_reaches_baseline_exactly() {
        let (mut store, baselines, mut decay, id) = setup();
        let rect = GridRect::new(4, 4, 3, 3);
        raise_block(&mut store, id, rect, 0.9);

        decay.request(id, rect, DELAY, DURATION, true);

        let mut prev = 0.9;
        let mut ticks = 0;
        while decay.active_count(id) > 0 {
            decay.tick(&mut store, &baselines, DT, true);
            let h = store.field(id).unwrap().get(5, 5);
            assert!(h <= prev + 1e-6, "height rose during decay");
            prev = h;
            ticks += 1;
            assert!(ticks < 1000, "decay never completed");
        }

        // Progress 1 writes the baseline value exactly
        assert_eq!(store.field(id).unwrap().get(5, 5), 0.5);
    }

    #[test]
    fn test_overlapping_requests_restart_coalesces_to_union() {
        let (mut store, baselines, mut decay, id) = setup();
        let a = GridRect::new(2, 2, 4, 4);
        let b = GridRect::new(4, 4, 4, 4);
        raise_block(&mut store, id, a.union(&b), 0.8);

        decay.request(id, a, DELAY, DURATION, true);
        // Let the first decay get partway through its delay
        for _ in 0..5 {
            decay.tick(&mut store, &baselines, DT, true);
        }

        decay.request(id, b, DELAY, DURATION, true);
        assert_eq!(decay.active_count(id), 1);

        let entry = &decay.entries(id)[0];
        assert_eq!(entry.region(), a.union(&b));
        assert!(entry.is_waiting());

        // Timer restarted in full: half the delay again is not enough
        for _ in 0..5 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        assert!(decay.entries(id)[0].is_waiting());
        // But the full delay is
        for _ in 0..6 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        assert!(!decay.entries(id)[0].is_waiting());
    }

    #[test]
    fn test_widen_only_keeps_running_blend_window() {
        let (mut store, baselines, mut decay, id) = setup();
        let a = GridRect::new(2, 2, 3, 3);
        let b = GridRect::new(4, 2, 3, 3);
        raise_block(&mut store, id, a.union(&b), 0.8);

        decay.request(id, a, DELAY, DURATION, false);
        // Run past the delay so the blend starts over rect `a`
        for _ in 0..12 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        assert!(!decay.entries(id)[0].is_waiting());

        decay.request(id, b, DELAY, DURATION, false);
        assert_eq!(decay.active_count(id), 1);
        assert_eq!(decay.entries(id)[0].region(), a.union(&b));

        // Run the blend to completion: cells unique to `b` never decay
        for _ in 0..30 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        assert_eq!(store.field(id).unwrap().get(2, 2), 0.5);
        assert_eq!(store.field(id).unwrap().get(6, 2), 0.8);
    }

    #[test]
    fn test_non_overlapping_requests_stay_independent() {
        let (mut store, baselines, mut decay, id) = setup();
        let a = GridRect::new(1, 1, 3, 3);
        let b = GridRect::new(10, 10, 3, 3);
        raise_block(&mut store, id, a, 0.8);
        raise_block(&mut store, id, b, 0.2);

        decay.request(id, a, DELAY, DURATION, true);
        decay.request(id, b, DELAY, DURATION, true);
        assert_eq!(decay.active_count(id), 2);

        while decay.active_count(id) > 0 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        assert_eq!(store.field(id).unwrap().get(2, 2), 0.5);
        assert_eq!(store.field(id).unwrap().get(11, 11), 0.5);
    }

    #[test]
    fn test_notify_repaint_without_overlap_creates_nothing() {
        let (mut store, baselines, mut decay, id) = setup();
        decay.notify_repaint(id, GridRect::new(3, 3, 4, 4), DELAY, DURATION, true);
        assert_eq!(decay.active_count(id), 0);

        // But with an overlap it restarts the existing entry
        decay.request(id, GridRect::new(3, 3, 4, 4), DELAY, DURATION, true);
        for _ in 0..8 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        decay.notify_repaint(id, GridRect::new(5, 5, 4, 4), DELAY, DURATION, true);
        assert_eq!(decay.active_count(id), 1);
        assert!(decay.entries(id)[0].is_waiting());
        assert_eq!(
            decay.entries(id)[0].region(),
            GridRect::new(3, 3, 6, 6)
        );
    }

    #[test]
    fn test_inactive_session_queues_without_running() {
        let (mut store, baselines, mut decay, id) = setup();
        let rect = GridRect::new(4, 4, 3, 3);
        raise_block(&mut store, id, rect, 0.9);

        decay.request(id, rect, 0.0, DURATION, true);
        for _ in 0..50 {
            decay.tick(&mut store, &baselines, DT, false);
        }
        assert_eq!(store.field(id).unwrap().get(5, 5), 0.9);
        assert_eq!(decay.active_count(id), 1);

        // Activating the session lets the queued decay run
        for _ in 0..50 {
            decay.tick(&mut store, &baselines, DT, true);
        }
        assert_eq!(store.field(id).unwrap().get(5, 5), 0.5);
    }

    #[test]
    fn test_zero_duration_snaps_to_baseline() {
        let (mut store, baselines, mut decay, id) = setup();
        let rect = GridRect::new(4, 4, 2, 2);
        raise_block(&mut store, id, rect, 1.0);

        decay.request(id, rect, 0.0, 0.0, true);
        decay.tick(&mut store, &baselines, DT, true); // delay expires
        decay.tick(&mut store, &baselines, DT, true); // snap
        assert_eq!(store.field(id).unwrap().get(4, 4), 0.5);
        assert_eq!(decay.active_count(id), 0);
    }
}
