// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Smoothing group classification
//!
//! Polygons are grouped into smoothing islands by flood fill across smooth
//! edges. Island ids start at 1. The target format only has room for
//! [`SMOOTHING_GROUP_MAX`] groups, so ids are folded into `[0, 32)` with
//! [`quantize`].
//!
//! The fold is lossy. Islands whose ids differ by a multiple of 32 land in the
//! same slot, and if two such islands touch, the importer will smooth across
//! their shared edge. Meshes with more than 32 islands can show this. Keeping
//! more than 32 distinct slots makes the importer discard smoothing for the
//! whole model, so the exact modulo behaviour is kept for compatibility.

use super::raw::RawMesh;
use super::topology::{dihedral_angle, edge_key, EdgeKey, EdgeMap};
use ahash::AHashSet;

/// Number of smoothing slots the importer accepts
pub const SMOOTHING_GROUP_MAX: u32 = 32;

/// Fold a raw island id (starting at 1) into the importer's slot range
pub fn quantize(raw_group: u32) -> u32 {
    (raw_group as i64 - 1).rem_euclid(SMOOTHING_GROUP_MAX as i64) as u32
}

/// Raw smoothing island id for every polygon, starting at 1
pub fn smoothing_islands(mesh: &RawMesh) -> Vec<u32> {
    let edges = EdgeMap::build(mesh);
    let sharp: AHashSet<EdgeKey> = mesh
        .sharp_edges
        .iter()
        .map(|&[a, b]| edge_key(a, b))
        .collect();

    let is_boundary = |key: EdgeKey, users: &[usize]| -> bool {
        if users.len() != 2 || sharp.contains(&key) {
            return true;
        }
        let (a, b) = (users[0], users[1]);
        if !mesh.polygons[a].smooth || !mesh.polygons[b].smooth {
            return true;
        }
        match mesh.auto_smooth_angle {
            Some(limit) => dihedral_angle(mesh, a, b) > limit,
            None => false,
        }
    };

    let mut islands = vec![0u32; mesh.polygons.len()];
    let mut next_island = 1;
    let mut stack = Vec::new();

    for seed in 0..mesh.polygons.len() {
        if islands[seed] != 0 {
            continue;
        }
        islands[seed] = next_island;
        stack.push(seed);

        while let Some(polygon_index) = stack.pop() {
            let corners = &mesh.polygons[polygon_index].corners;
            let n = corners.len();
            for i in 0..n {
                let key = edge_key(corners[i], corners[(i + 1) % n]);
                let users = edges.polygons(key);
                if is_boundary(key, users) {
                    continue;
                }
                for &neighbour in users {
                    if islands[neighbour] == 0 {
                        islands[neighbour] = next_island;
                        stack.push(neighbour);
                    }
                }
            }
        }

        next_island += 1;
    }

    islands
}

/// Quantized smoothing group for every polygon
pub fn smoothing_groups(mesh: &RawMesh) -> Vec<u32> {
    smoothing_islands(mesh).into_iter().map(quantize).collect()
}
