use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scroll_scene::config::SceneConfig;
use scroll_scene::geometry::MeshGeometry;
use scroll_scene::scenes::{create_space_scene, star_positions};
use scroll_scene::scroll::on_scroll;
use scroll_scene::RenderLoop;

fn bench_space_scene(c: &mut Criterion) {
    let config = SceneConfig::default();
    c.bench_function("create_space_scene", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            black_box(create_space_scene(&config, &mut rng, 1280, 720))
        })
    });
}

fn bench_star_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("star_field");
    for count in [200usize, 2_000, 20_000].iter() {
        group.bench_with_input(BenchmarkId::new("positions", count), count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(star_positions(&mut rng, count, 100.0)))
        });
    }
    group.finish();
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    group.bench_function("torus_16x100", |b| {
        b.iter(|| black_box(MeshGeometry::torus(10.0, 3.0, black_box(16), black_box(100))))
    });
    group.bench_function("sphere_32x32", |b| {
        b.iter(|| black_box(MeshGeometry::sphere(3.0, black_box(32), black_box(32))))
    });
    group.finish();
}

fn bench_frame_update(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut ctx = create_space_scene(&SceneConfig::default(), &mut rng, 1280, 720);
    let mut render_loop = RenderLoop::default();

    c.bench_function("tick_and_scroll", |b| {
        b.iter(|| {
            on_scroll(&mut ctx, black_box(-40.0));
            black_box(render_loop.tick(&mut ctx))
        })
    });
}

criterion_group!(
    benches,
    bench_space_scene,
    bench_star_field,
    bench_geometry,
    bench_frame_update
);
criterion_main!(benches);
