//! Benchmarks for procedural geometry and scene assembly

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabletop_core::{cylinder_disk, cylinder_side, CylinderParams, Scene};

fn bench_cylinder(c: &mut Criterion) {
    let mut group = c.benchmark_group("cylinder");

    for &segments in &[20u32, 128, 1024] {
        let params = CylinderParams::new(0.3, 1.5, segments);
        group.bench_with_input(BenchmarkId::new("side", segments), &params, |b, &params| {
            b.iter(|| cylinder_side("side", black_box(params)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("disk", segments), &params, |b, &params| {
            b.iter(|| cylinder_disk("disk", black_box(params)).unwrap())
        });
    }

    group.finish();
}

fn bench_desk_scene(c: &mut Criterion) {
    c.bench_function("desk_scene", |b| b.iter(|| Scene::desk().unwrap()));
}

criterion_group!(benches, bench_cylinder, bench_desk_scene);
criterion_main!(benches);
