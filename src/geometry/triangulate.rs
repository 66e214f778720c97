// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon to loop-triangle conversion

use super::raw::RawMesh;
use super::topology::polygon_normal;
use nalgebra::Vector3;

/// Triangle over three loops of the source mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTriangle {
    /// Mesh-wide loop indices, in source winding
    pub loops: [usize; 3],
    /// Polygon the triangle was cut from
    pub polygon: usize,
}

/// Triangulate every polygon of `mesh`, keeping polygon order
///
/// Triangles pass through unchanged. Larger rings are ear-clipped in the
/// polygon's own plane; a fan is used if clipping stalls.
pub fn loop_triangles(mesh: &RawMesh) -> Vec<LoopTriangle> {
    let mut triangles = Vec::with_capacity(mesh.corner_count());
    let mut loop_start = 0;

    for (polygon_index, polygon) in mesh.polygons.iter().enumerate() {
        let n = polygon.corners.len();
        if n == 3 {
            triangles.push(LoopTriangle {
                loops: [loop_start, loop_start + 1, loop_start + 2],
                polygon: polygon_index,
            });
        } else if n > 3 {
            let ring: Vec<Vector3<f64>> = polygon
                .corners
                .iter()
                .map(|&v| mesh.positions[v as usize])
                .collect();
            let normal = polygon_normal(mesh, polygon_index);
            for [a, b, c] in ear_clip(&project(&ring, &normal)) {
                triangles.push(LoopTriangle {
                    loops: [loop_start + a, loop_start + b, loop_start + c],
                    polygon: polygon_index,
                });
            }
        }
        loop_start += n;
    }

    triangles
}

/// Project a ring onto the plane with the given normal
///
/// The 2D basis is right-handed around `normal`, so a ring wound
/// counter-clockwise around its normal stays counter-clockwise.
fn project(ring: &[Vector3<f64>], normal: &Vector3<f64>) -> Vec<(f64, f64)> {
    let helper = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = helper.cross(normal).normalize();
    let v = normal.cross(&u);
    ring.iter().map(|p| (p.dot(&u), p.dot(&v))).collect()
}

fn ear_clip(polygon: &[(f64, f64)]) -> Vec<[usize; 3]> {
    let n = polygon.len();
    let mut result = Vec::with_capacity(n - 2);
    let ccw = signed_area(polygon) >= 0.0;
    let mut indices: Vec<usize> = (0..n).collect();

    let mut safety = n * n;
    while indices.len() > 3 && safety > 0 {
        safety -= 1;
        let len = indices.len();
        let mut found_ear = false;

        for i in 0..len {
            let prev = indices[(i + len - 1) % len];
            let curr = indices[i];
            let next = indices[(i + 1) % len];

            if is_ear(polygon, &indices, prev, curr, next, ccw) {
                result.push([prev, curr, next]);
                indices.remove(i);
                found_ear = true;
                break;
            }
        }

        if !found_ear {
            break;
        }
    }

    // Whatever could not be clipped is fanned from its first corner
    for k in 1..indices.len().saturating_sub(1) {
        result.push([indices[0], indices[k], indices[k + 1]]);
    }

    result
}

fn signed_area(polygon: &[(f64, f64)]) -> f64 {
    let n = polygon.len();
    let mut area = 0.0;
    for i in 0..n {
        let (x1, y1) = polygon[i];
        let (x2, y2) = polygon[(i + 1) % n];
        area += x1 * y2 - x2 * y1;
    }
    area * 0.5
}

fn is_ear(
    polygon: &[(f64, f64)],
    indices: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    ccw: bool,
) -> bool {
    let (ax, ay) = polygon[prev];
    let (bx, by) = polygon[curr];
    let (cx, cy) = polygon[next];

    let cross = (bx - ax) * (cy - ay) - (by - ay) * (cx - ax);
    if (ccw && cross <= 0.0) || (!ccw && cross >= 0.0) {
        return false;
    }

    for &idx in indices {
        if idx == prev || idx == curr || idx == next {
            continue;
        }
        let (px, py) = polygon[idx];
        if point_in_triangle((px, py), (ax, ay), (bx, by), (cx, cy)) {
            return false;
        }
    }

    true
}

fn point_in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let d1 = (p.0 - b.0) * (a.1 - b.1) - (a.0 - b.0) * (p.1 - b.1);
    let d2 = (p.0 - c.0) * (b.1 - c.1) - (b.0 - c.0) * (p.1 - c.1);
    let d3 = (p.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (p.1 - a.1);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
