//! Benchmarks for plane cuts, cleaning and loop ordering.
//!
//! Run with: cargo bench -p mesh-contour

#![allow(missing_docs, clippy::cast_precision_loss)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_contour::{CleanParams, Plane, clean_mesh, cut_with_plane, intersection_polygon, order_loop};
use mesh_types::{Point3, SurfaceMesh, Vector3};

/// A closed cycle of `n` segments given in a scrambled order.
fn scrambled_cycle(n: u32) -> Vec<[u32; 2]> {
    let mut segments: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
    // Deterministic interleave: even segments forwards, odd ones flipped at the back.
    segments.sort_by_key(|s| (s[0] % 2, s[0]));
    for s in segments.iter_mut().filter(|s| s[0] % 2 == 1) {
        s.swap(0, 1);
    }
    segments
}

fn bench_order_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_loop");
    for n in [64u32, 1024, 16384] {
        let segments = scrambled_cycle(n);
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &segments, |b, segments| {
            b.iter(|| order_loop(black_box(segments.iter().copied())).len());
        });
    }
    group.finish();
}

fn bench_cut(c: &mut Criterion) {
    let mut group = c.benchmark_group("cut_with_plane");
    for n in [32u32, 128, 512] {
        let mesh = SurfaceMesh::planar_grid(n, n, 1.0);
        let Ok(plane) = Plane::new(Point3::new(f64::from(n) / 2.0 + 0.5, 0.0, 0.0), Vector3::new(1.0, 0.2, 0.0))
        else {
            continue;
        };
        group.throughput(Throughput::Elements(mesh.cell_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
            b.iter(|| cut_with_plane(black_box(mesh), &plane).map(|s| s.cell_count()));
        });
    }
    group.finish();
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_mesh");
    let mesh = SurfaceMesh::planar_grid(256, 256, 1.0);
    for (name, params) in [
        ("exact", CleanParams::default()),
        ("tolerance", CleanParams::default().with_absolute_tolerance(0.25)),
    ] {
        group.bench_with_input(BenchmarkId::new(name, mesh.vertex_count()), &params, |b, params| {
            b.iter(|| clean_mesh(black_box(&mesh), params).map(|o| o.mesh.vertex_count()));
        });
    }
    group.finish();
}

fn bench_section(c: &mut Criterion) {
    let cube = SurfaceMesh::unit_cube();
    let params = CleanParams::default();
    c.bench_function("intersection_polygon_cube", |b| {
        b.iter(|| intersection_polygon(black_box(&cube), &Plane::horizontal(0.1), &params).map(|p| p.len()));
    });
}

criterion_group!(benches, bench_order_loop, bench_cut, bench_clean, bench_section);
criterion_main!(benches);
