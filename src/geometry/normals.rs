// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face and per-corner normal resolution
//!
//! Normals stay in mesh-local space. Under a mirroring transform the emitted
//! corner order is reversed and every corner normal is negated, which keeps
//! winding and shading consistent. The face normal is reported as the source
//! triangle's normal and is never negated.

use super::raw::RawMesh;
use super::topology::polygon_normal;
use super::transform::Winding;
use super::triangulate::LoopTriangle;
use crate::scene::{FaceNormal, VertexNormal};
use nalgebra::Vector3;

pub struct NormalResolver<'a> {
    mesh: &'a RawMesh,
    loop_vertices: Vec<u32>,
    /// One normal per loop
    corner_normals: Vec<Vector3<f64>>,
}

impl<'a> NormalResolver<'a> {
    /// Prepare per-corner normals for `mesh`
    ///
    /// `islands` holds the raw smoothing island of every polygon.
    pub fn new(mesh: &'a RawMesh, islands: &[u32]) -> Self {
        let loop_vertices = mesh.loop_vertices();
        let corner_normals = match &mesh.custom_normals {
            Some(normals) => normals
                .iter()
                .map(|n| n.try_normalize(f64::EPSILON).unwrap_or(*n))
                .collect(),
            None => split_normals(mesh, islands),
        };
        Self {
            mesh,
            loop_vertices,
            corner_normals,
        }
    }

    /// Vertex index referenced by a loop
    pub fn loop_vertex(&self, loop_index: usize) -> usize {
        self.loop_vertices[loop_index] as usize
    }

    pub fn corner_normal(&self, loop_index: usize) -> Vector3<f64> {
        self.corner_normals[loop_index]
    }

    /// Normal of the triangle in its source winding
    pub fn face_normal(&self, triangle: &LoopTriangle) -> Vector3<f64> {
        let [p0, p1, p2] = triangle
            .loops
            .map(|l| self.mesh.positions[self.loop_vertex(l)]);
        (p1 - p0)
            .cross(&(p2 - p0))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| polygon_normal(self.mesh, triangle.polygon))
    }

    /// Normals for one triangle as they are written out
    ///
    /// Corner vertex indices are shifted by `vertex_offset` into the owning
    /// group's index space.
    pub fn resolve(&self, triangle: &LoopTriangle, winding: Winding, vertex_offset: usize) -> FaceNormal {
        let vertex_normals = winding.indices().map(|corner| {
            let loop_index = triangle.loops[corner];
            let normal = self.corner_normal(loop_index);
            VertexNormal {
                vertex_index: vertex_offset + self.loop_vertex(loop_index),
                normal: if winding.is_reversed() { -normal } else { normal },
            }
        });
        FaceNormal {
            normal: self.face_normal(triangle),
            vertex_normals,
        }
    }
}

/// Per-loop normals derived from topology
///
/// Flat polygons use their own normal. Smooth corners average the normals of
/// the smooth polygons around the vertex that belong to the same smoothing
/// island, weighted by each polygon's corner angle.
fn split_normals(mesh: &RawMesh, islands: &[u32]) -> Vec<Vector3<f64>> {
    let polygon_normals: Vec<Vector3<f64>> = (0..mesh.polygons.len())
        .map(|p| polygon_normal(mesh, p))
        .collect();

    // (polygon, weighted normal) for every corner touching each vertex
    let mut vertex_fans: Vec<Vec<(usize, Vector3<f64>)>> = vec![Vec::new(); mesh.positions.len()];
    for (polygon_index, polygon) in mesh.polygons.iter().enumerate() {
        let n = polygon.corners.len();
        for k in 0..n {
            let v = polygon.corners[k] as usize;
            let prev = mesh.positions[polygon.corners[(k + n - 1) % n] as usize];
            let next = mesh.positions[polygon.corners[(k + 1) % n] as usize];
            let angle = (prev - mesh.positions[v]).angle(&(next - mesh.positions[v]));
            let weight = if angle.is_finite() { angle } else { 0.0 };
            vertex_fans[v].push((polygon_index, polygon_normals[polygon_index] * weight));
        }
    }

    let mut normals = Vec::with_capacity(mesh.corner_count());
    for (polygon_index, polygon) in mesh.polygons.iter().enumerate() {
        let own = polygon_normals[polygon_index];
        for &v in &polygon.corners {
            if !polygon.smooth {
                normals.push(own);
                continue;
            }
            let sum: Vector3<f64> = vertex_fans[v as usize]
                .iter()
                .filter(|(other, _)| {
                    mesh.polygons[*other].smooth && islands[*other] == islands[polygon_index]
                })
                .map(|(_, weighted)| *weighted)
                .sum();
            normals.push(sum.try_normalize(f64::EPSILON).unwrap_or(own));
        }
    }
    normals
}
