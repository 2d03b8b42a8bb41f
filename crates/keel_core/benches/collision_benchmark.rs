//! # Collision Pipeline Benchmark
//!
//! The exhaustive O(n^2) pair scan at several entity counts, plus the raw
//! narrow-phase predicates.
//!
//! Run with: `cargo bench --package keel_core`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keel_core::systems::collision_check::check_collision_pair;
use keel_core::{Collider, CollisionCheckSystem, Scene, SystemRunner, Transform};
use keel_shared::{Aabb, Shape, Sphere, Vec3};

const DT: f32 = 1.0 / 60.0;

/// Builds a scene with `count` unit spheres along a line, every neighbor
/// pair overlapping.
fn sphere_line(count: usize) -> (Scene, SystemRunner) {
    let mut scene = Scene::new();
    let mut runner = SystemRunner::new();
    runner.register(Box::new(CollisionCheckSystem::new()));
    runner.initialize_all(&mut scene);

    for i in 0..count {
        let entity = scene.spawn("probe");
        let x = i as f32 * 1.5;
        scene
            .components_mut()
            .add_component(entity, Transform::at(Vec3::new(x, 0.0, 0.0)));
        scene.components_mut().add_component(
            entity,
            Collider::new(Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0))),
        );
        runner.subscribe(entity);
    }

    (scene, runner)
}

/// Benchmark: one full collision frame over the pair scan.
fn bench_collision_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_frame");

    for count in [50, 100, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let (mut scene, mut runner) = sphere_line(count);
            b.iter(|| {
                runner.run_frame(&mut scene, DT);
                black_box(scene.entities().entity_count())
            });
        });
    }

    group.finish();
}

/// Benchmark: the narrow-phase predicates by shape pair.
fn bench_narrow_phase(c: &mut Criterion) {
    let sphere_a = Shape::Sphere(Sphere::new(Vec3::ZERO, 1.0));
    let sphere_b = Shape::Sphere(Sphere::new(Vec3::new(1.2, 0.3, 0.0), 1.0));
    let aabb_a = Shape::Aabb(Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::ONE));
    let aabb_b = Shape::Aabb(Aabb::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(2.5, 2.0, 2.0)));

    let mut group = c.benchmark_group("narrow_phase");

    group.bench_function("sphere_sphere", |b| {
        b.iter(|| black_box(check_collision_pair(&sphere_a, &sphere_b, true, true).hit));
    });
    group.bench_function("aabb_aabb", |b| {
        b.iter(|| black_box(check_collision_pair(&aabb_a, &aabb_b, true, true).hit));
    });
    group.bench_function("aabb_sphere", |b| {
        b.iter(|| black_box(check_collision_pair(&aabb_a, &sphere_b, true, true).hit));
    });

    group.finish();
}

criterion_group!(benches, bench_collision_frame, bench_narrow_phase);

criterion_main!(benches);
