// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use ase_export::io::{build_command_tree, render_to_string};
use ase_export::{build_scene, BuildOptions, MeshRecord, Polygon, RawMesh, WriterOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector3;

/// Wavy `n` x `n` quad grid with one UV channel
fn grid(n: u32) -> RawMesh {
    let mut positions = Vec::new();
    for y in 0..=n {
        for x in 0..=n {
            let z = ((x as f64) * 0.3).sin() * ((y as f64) * 0.2).cos();
            positions.push(Vector3::new(x as f64, y as f64, z));
        }
    }

    let row = n + 1;
    let mut polygons = Vec::new();
    for y in 0..n {
        for x in 0..n {
            let i = y * row + x;
            polygons.push(Polygon::new(vec![i, i + 1, i + row + 1, i + row]));
        }
    }

    let mut mesh = RawMesh::new(positions, polygons);
    let corners = mesh.corner_count();
    mesh.uv_layers = vec![(0..corners).map(|c| [c as f64 * 0.01, 0.5]).collect()];
    mesh.auto_smooth_angle = Some(0.5);
    mesh
}

fn records(count: usize, n: u32) -> Vec<MeshRecord> {
    (0..count)
        .map(|i| MeshRecord::new(format!("Grid{}", i), grid(n)).with_materials(["Mat"]))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for n in [16u32, 64] {
        let input = records(4, n);
        group.bench_with_input(BenchmarkId::new("grid", n), &input, |b, input| {
            b.iter(|| build_scene(black_box(input), &BuildOptions::default()).unwrap());
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for n in [16u32, 64] {
        let scene = build_scene(&records(4, n), &BuildOptions::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("grid", n), &scene, |b, scene| {
            b.iter(|| {
                let tree = build_command_tree(black_box(scene), &WriterOptions::default());
                render_to_string(&tree)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_serialize);
criterion_main!(benches);
