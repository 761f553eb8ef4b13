use criterion::{criterion_group, criterion_main, Criterion, black_box};

use regolith::core::types::Vec3;
use regolith::field::{HeightField, SurfaceExtent, TerrainStore};
use regolith::math::GridRect;
use regolith::sculpt::baseline::BaselineManager;
use regolith::sculpt::painter;
use regolith::sculpt::{Brush, BrushMode, DecayScheduler, SculptConfig};
use regolith::terrain::{TerrainGenerator, TerrainParams};

fn test_extent(resolution: u32) -> SurfaceExtent {
    SurfaceExtent {
        origin: Vec3::ZERO,
        size: Vec3::new(200.0, 60.0, 200.0),
        resolution,
    }
}

fn bench_paint_raise(c: &mut Criterion) {
    let extent = test_extent(513);
    let mut store = TerrainStore::new();
    let surface = store
        .add_surface(extent, HeightField::new(513, 0.5), true)
        .unwrap();
    let brush = Brush::from_config(&SculptConfig::default(), BrushMode::RaiseLower);

    c.bench_function("paint_raise_4m_513", |b| {
        b.iter(|| {
            painter::paint(
                &mut store,
                surface,
                black_box(Vec3::new(100.0, 30.0, 100.0)),
                &brush,
                false,
                1.0 / 60.0,
            )
        });
    });
}

fn bench_paint_smooth(c: &mut Criterion) {
    let extent = test_extent(513);
    let mut store = TerrainStore::new();
    let surface = store
        .add_surface(extent, HeightField::new(513, 0.5), true)
        .unwrap();
    let brush = Brush::from_config(&SculptConfig::default(), BrushMode::Smooth);

    c.bench_function("paint_smooth_4m_513", |b| {
        b.iter(|| {
            painter::paint(
                &mut store,
                surface,
                black_box(Vec3::new(100.0, 30.0, 100.0)),
                &brush,
                false,
                1.0 / 60.0,
            )
        });
    });
}

fn bench_decay_tick(c: &mut Criterion) {
    let extent = test_extent(513);
    let mut store = TerrainStore::new();
    let surface = store
        .add_surface(extent, HeightField::new(513, 0.5), true)
        .unwrap();
    let mut baselines = BaselineManager::new();
    baselines.capture_all(&store);

    // Eight mid-blend regions; the huge duration keeps them blending for
    // the whole measurement
    let mut decay = DecayScheduler::new();
    for i in 0..8u32 {
        let rect = GridRect::new(i * 60, i * 60, 32, 32);
        decay.request(surface, rect, 0.0, 1.0e9, true);
    }
    decay.tick(&mut store, &baselines, 0.1, true);

    c.bench_function("decay_tick_8x32x32", |b| {
        b.iter(|| {
            decay.tick(&mut store, &baselines, black_box(1.0 / 60.0), true);
        });
    });
}

fn bench_generator_fill(c: &mut Criterion) {
    let extent = test_extent(257);
    let generator = TerrainGenerator::new(TerrainParams::default());

    c.bench_function("generator_fill_257", |b| {
        b.iter(|| {
            let mut field = HeightField::new(257, 0.0);
            generator.fill(&mut field, &extent);
            black_box(field)
        });
    });
}

criterion_group!(
    benches,
    bench_paint_raise,
    bench_paint_smooth,
    bench_decay_tick,
    bench_generator_fill
);
criterion_main!(benches);
