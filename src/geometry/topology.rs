// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edge connectivity over polygon rings

use super::raw::RawMesh;
use ahash::AHashMap;
use nalgebra::Vector3;

/// Tolerance for planarity tests on normalized directions
const CONVEX_EPS: f64 = 1e-5;

/// Undirected edge key, smaller vertex index first
pub type EdgeKey = (u32, u32);

pub fn edge_key(a: u32, b: u32) -> EdgeKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Map from each undirected edge to the polygons that use it
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    edges: AHashMap<EdgeKey, Vec<usize>>,
    /// Insertion order, so traversal is deterministic
    order: Vec<EdgeKey>,
}

impl EdgeMap {
    pub fn build(mesh: &RawMesh) -> Self {
        let mut map = Self::default();
        for (polygon_index, polygon) in mesh.polygons.iter().enumerate() {
            let n = polygon.corners.len();
            for i in 0..n {
                let key = edge_key(polygon.corners[i], polygon.corners[(i + 1) % n]);
                let users = map.edges.entry(key).or_insert_with(|| {
                    map.order.push(key);
                    Vec::new()
                });
                users.push(polygon_index);
            }
        }
        map
    }

    pub fn polygons(&self, key: EdgeKey) -> &[usize] {
        self.edges.get(&key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Edges in first-seen order, with their polygons
    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey, &[usize])> + '_ {
        self.order
            .iter()
            .map(move |key| (*key, self.edges[key].as_slice()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// An edge is manifold when exactly two polygons share it
    pub fn is_manifold(&self, key: EdgeKey) -> bool {
        self.polygons(key).len() == 2
    }
}

/// Polygon normal by Newell's method, in the mesh's local space
///
/// Robust for non-planar and concave rings. Degenerate polygons yield +Z.
pub fn polygon_normal(mesh: &RawMesh, polygon_index: usize) -> Vector3<f64> {
    let corners = &mesh.polygons[polygon_index].corners;
    let n = corners.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let current = mesh.positions[corners[i] as usize];
        let next = mesh.positions[corners[(i + 1) % n] as usize];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z)
}

/// Unsigned angle between the normals of two polygons
pub fn dihedral_angle(mesh: &RawMesh, a: usize, b: usize) -> f64 {
    let na = polygon_normal(mesh, a);
    let nb = polygon_normal(mesh, b);
    na.dot(&nb).clamp(-1.0, 1.0).acos()
}

/// Convexity of a manifold edge
///
/// No vertex of either polygon may sit in front of the other polygon's plane.
/// Coplanar neighbours count as convex.
pub fn is_convex_edge(mesh: &RawMesh, key: EdgeKey, a: usize, b: usize) -> bool {
    let midpoint = (mesh.positions[key.0 as usize] + mesh.positions[key.1 as usize]) * 0.5;
    in_front_of(mesh, midpoint, a, b).is_none() && in_front_of(mesh, midpoint, b, a).is_none()
}

/// First vertex of `other` lying in front of `plane_polygon`'s plane
fn in_front_of(mesh: &RawMesh, origin: Vector3<f64>, plane_polygon: usize, other: usize) -> Option<u32> {
    let normal = polygon_normal(mesh, plane_polygon);
    mesh.polygons[other].corners.iter().copied().find(|&v| {
        let direction = mesh.positions[v as usize] - origin;
        match direction.try_normalize(f64::EPSILON) {
            Some(direction) => normal.dot(&direction) > CONVEX_EPS,
            None => false,
        }
    })
}

/// Topology defect found on a collision hull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullDefect {
    NonManifold(EdgeKey),
    NonConvex(EdgeKey),
}

/// Check every edge of a collision hull, stopping at the first defect
pub fn check_convex_hull(mesh: &RawMesh) -> Option<HullDefect> {
    let edges = EdgeMap::build(mesh);
    for (key, polygons) in edges.iter() {
        if polygons.len() != 2 {
            return Some(HullDefect::NonManifold(key));
        }
        if !is_convex_edge(mesh, key, polygons[0], polygons[1]) {
            return Some(HullDefect::NonConvex(key));
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::geometry::raw::{Polygon, RawMesh};
    use nalgebra::Vector3;

    /// Axis-aligned unit cube made of six outward-facing quads
    pub fn cube() -> RawMesh {
        let positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
        ];
        let polygons = vec![
            Polygon::new(vec![0, 3, 2, 1]),
            Polygon::new(vec![4, 5, 6, 7]),
            Polygon::new(vec![0, 1, 5, 4]),
            Polygon::new(vec![1, 2, 6, 5]),
            Polygon::new(vec![2, 3, 7, 6]),
            Polygon::new(vec![3, 0, 4, 7]),
        ];
        RawMesh::new(positions, polygons)
    }
}
