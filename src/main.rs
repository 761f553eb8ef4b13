//! Regolith - headless sculpting demo
//!
//! Generates a baseline terrain, runs a few scripted brush strokes, and
//! lets the decay scheduler blend everything back. Set REGOLITH_INSPECT=1
//! to keep the session alive afterwards with the TCP inspection server
//! attached (port 9761), and REGOLITH_CONFIG=<path> to load sculpting
//! parameters from a JSON file.

use std::sync::{Arc, Mutex};

use regolith::combat::{ComboConfig, ComboController};
use regolith::core::input::{Action, InputState};
use regolith::core::logging;
use regolith::core::time::TickTimer;
use regolith::core::types::{Quat, Vec3};
use regolith::field::{HeightField, SurfaceExtent, TerrainStore};
use regolith::math::Ray;
use regolith::scene::{AnimationDriver, SceneActors, VfxHandle, VfxSpawner};
use regolith::sculpt::{SculptConfig, SculptSession};
use regolith::terrain::{TerrainGenerator, TerrainParams};

use regolith_inspect::{InspectCommand, InspectHandler, InspectResponse, InspectServer};

const DT: f32 = 1.0 / 60.0;

/// Everything the demo mutates per tick, shared with the inspector
struct World {
    store: TerrainStore,
    session: SculptSession,
    input: InputState,
    actors: SceneActors,
}

impl World {
    fn tick(&mut self) {
        let World {
            store,
            session,
            input,
            actors,
        } = self;
        session.tick(store, input, actors, DT);
        input.end_frame();
    }
}

/// Animation hook that just logs triggers
struct LogAnimation;

impl AnimationDriver for LogAnimation {
    fn fire_trigger(&mut self, name: &str) {
        log::debug!("animation trigger: {}", name);
    }
}

/// VFX hook that just logs spawns
struct LogVfx {
    next: u64,
}

impl VfxSpawner for LogVfx {
    fn spawn(&mut self, effect: &str, position: Vec3, _: Quat, lifetime: f32) -> VfxHandle {
        self.next += 1;
        log::debug!("vfx spawn: {} at {:?} for {:.1}s", effect, position, lifetime);
        VfxHandle(self.next)
    }
}

fn main() {
    logging::init();

    let config = match std::env::var("REGOLITH_CONFIG") {
        Ok(path) => match SculptConfig::from_json_file(&path) {
            Ok(config) => {
                log::info!("loaded sculpt config from {}", path);
                config
            }
            Err(e) => {
                log::error!("failed to load {}: {}, using defaults", path, e);
                SculptConfig::default()
            }
        },
        Err(_) => SculptConfig::default(),
    };

    // A 200 m island at half-meter cells
    let extent = SurfaceExtent {
        origin: Vec3::ZERO,
        size: Vec3::new(200.0, 60.0, 200.0),
        resolution: 401,
    };
    let mut field = HeightField::new(extent.resolution, 0.0);
    let generator = TerrainGenerator::new(TerrainParams::default());
    generator.fill(&mut field, &extent);

    let mut store = TerrainStore::new();
    let surface = match store.add_surface(extent, field, true) {
        Ok(id) => id,
        Err(e) => {
            log::error!("failed to register surface: {}", e);
            return;
        }
    };

    let mut actors = SceneActors::new();
    let player = actors.add(Vec3::new(60.0, 0.0, 60.0), 0.4);
    actors.set_protected(player);

    let mut session = SculptSession::new(config);
    session.start(&store);

    let mut world = World {
        store,
        session,
        input: InputState::new(),
        actors,
    };

    // Stroke 1: drag a ridge across the middle of the island
    let before = world.store.height_at_world(surface, 100.0, 100.0).unwrap_or(0.0);
    world.input.set_action(Action::PaintPrimary, true);
    for i in 0..=120 {
        let x = 85.0 + i as f32 * 0.25;
        world
            .input
            .set_pointer_ray(Ray::new(Vec3::new(x, 80.0, 100.0), Vec3::NEG_Y));
        world.tick();
    }
    world.input.set_action(Action::PaintPrimary, false);
    world.tick();
    let after = world.store.height_at_world(surface, 100.0, 100.0).unwrap_or(0.0);
    log::info!(
        "ridge stroke done: height at center {:.2} m -> {:.2} m, {} decay(s) pending",
        before,
        after,
        world.session.decay().active_count(surface)
    );

    // Stroke 2: hold still and let the peak bias grow a spire
    world.input.set_action(Action::PaintPrimary, true);
    world
        .input
        .set_pointer_ray(Ray::new(Vec3::new(140.0, 80.0, 140.0), Vec3::NEG_Y));
    for _ in 0..180 {
        world.tick();
    }
    world.input.set_action(Action::PaintPrimary, false);
    world.tick();
    log::info!(
        "spire stroke done: height at spire {:.2} m",
        world.store.height_at_world(surface, 140.0, 140.0).unwrap_or(0.0)
    );

    // A short combo while the terrain decays
    let mut combo = ComboController::new(ComboConfig::default());
    let mut anim = LogAnimation;
    let mut vfx = LogVfx { next: 0 };
    world.actors.add(Vec3::new(61.5, 0.0, 60.0), 0.5);
    world.input.set_action(Action::Attack, true);
    let mut struck = 0;
    for i in 0..90 {
        combo.tick(
            &world.input,
            &world.actors,
            &mut anim,
            &mut vfx,
            Vec3::new(60.0, 0.0, 60.0),
            DT,
        );
        struck += combo.last_hits().len();
        world.tick();
        if i == 0 {
            world.input.set_action(Action::Attack, false);
        }
    }
    log::info!("combo ran, struck {} target(s)", struck);

    // Idle until every decay has blended back
    let mut ticks = 0u32;
    while world.session.decay().total_active() > 0 && ticks < 60 * 30 {
        world.tick();
        ticks += 1;
    }
    log::info!(
        "decay settled after {:.1} s: height at center {:.2} m",
        ticks as f32 * DT,
        world.store.height_at_world(surface, 100.0, 100.0).unwrap_or(0.0)
    );

    if std::env::var("REGOLITH_INSPECT").is_ok() {
        let world = Arc::new(Mutex::new(world));
        let handler: Arc<Mutex<dyn InspectHandler>> =
            Arc::new(Mutex::new(WorldInspector { world: world.clone() }));
        let _server = InspectServer::start(handler, regolith_inspect::DEFAULT_PORT);

        log::info!("idle; inspect on port {}", regolith_inspect::DEFAULT_PORT);
        let mut timer = TickTimer::new();
        loop {
            if let Ok(mut world) = world.lock() {
                world.tick();
            }
            timer.tick();
            std::thread::sleep(std::time::Duration::from_millis(16));
        }
    }
}

/// Bridges inspection commands onto the shared world
struct WorldInspector {
    world: Arc<Mutex<World>>,
}

impl InspectHandler for WorldInspector {
    fn handle_command(&mut self, cmd: InspectCommand) -> InspectResponse {
        let Ok(mut world) = self.world.lock() else {
            return InspectResponse::error("world lock poisoned");
        };

        let find_surface = |world: &World, raw: u32| {
            world
                .store
                .surface_ids()
                .into_iter()
                .find(|id| id.raw() == raw)
        };

        match cmd {
            InspectCommand::Ping => InspectResponse::ok(),
            InspectCommand::GetSessionState => {
                let decays: usize = world.session.decay().total_active();
                InspectResponse::with_data(serde_json::json!({
                    "active": world.session.is_active(),
                    "painting": world.session.tracker().is_painting(),
                    "active_decays": decays,
                }))
            }
            InspectCommand::ListSurfaces => {
                let ids: Vec<u32> = world
                    .store
                    .surface_ids()
                    .iter()
                    .map(|id| id.raw())
                    .collect();
                InspectResponse::with_data(serde_json::json!({ "surfaces": ids }))
            }
            InspectCommand::GetSurfaceInfo { surface } => {
                let Some(id) = find_surface(&world, surface) else {
                    return InspectResponse::error(format!("unknown surface {}", surface));
                };
                match world.store.extent(id) {
                    Some(extent) => InspectResponse::with_data(serde_json::json!({
                        "origin": [extent.origin.x, extent.origin.y, extent.origin.z],
                        "size": [extent.size.x, extent.size.y, extent.size.z],
                        "resolution": extent.resolution,
                    })),
                    None => InspectResponse::error(format!("unknown surface {}", surface)),
                }
            }
            InspectCommand::SampleHeight { surface, x, z } => {
                let Some(id) = find_surface(&world, surface) else {
                    return InspectResponse::error(format!("unknown surface {}", surface));
                };
                match world.store.height_at_world(id, x, z) {
                    Some(height) => {
                        InspectResponse::with_data(serde_json::json!({ "height": height }))
                    }
                    None => InspectResponse::error(format!("unknown surface {}", surface)),
                }
            }
            InspectCommand::GetActiveDecays { surface } => {
                let Some(id) = find_surface(&world, surface) else {
                    return InspectResponse::error(format!("unknown surface {}", surface));
                };
                let entries: Vec<_> = world
                    .session
                    .decay()
                    .entries(id)
                    .iter()
                    .map(|e| {
                        let r = e.region();
                        serde_json::json!({
                            "region": [r.x, r.y, r.w, r.h],
                            "waiting": e.is_waiting(),
                            "progress": e.progress(),
                        })
                    })
                    .collect();
                InspectResponse::with_data(serde_json::json!({ "decays": entries }))
            }
            InspectCommand::SetBrush {
                radius,
                hardness,
                raise_strength,
                smooth_strength,
            } => {
                let config = world.session.config_mut();
                if let Some(radius) = radius {
                    config.brush_radius = radius;
                }
                if let Some(hardness) = hardness {
                    config.hardness = hardness;
                }
                if let Some(raise) = raise_strength {
                    config.raise_strength = raise;
                }
                if let Some(smooth) = smooth_strength {
                    config.smooth_strength = smooth;
                }
                InspectResponse::ok()
            }
            InspectCommand::RestoreBaseline => {
                let World { store, session, .. } = &mut *world;
                session.restore(store);
                InspectResponse::ok()
            }
        }
    }
}
