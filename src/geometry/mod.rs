// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - input records and per-mesh topology passes

pub mod normals;
pub mod raw;
pub mod smoothing;
pub mod topology;
pub mod transform;
pub mod triangulate;

pub use normals::NormalResolver;
pub use raw::{
    InstanceOffset, MaterialId, MeshClass, MeshEvalState, MeshRecord, MeshSource, Polygon,
    RawMesh, COLLISION_PREFIX,
};
pub use smoothing::{quantize, smoothing_groups, smoothing_islands, SMOOTHING_GROUP_MAX};
pub use topology::{check_convex_hull, EdgeMap, HullDefect};
pub use transform::{corner_order, negative_scale_axes, vertex_transform, Winding};
pub use triangulate::{loop_triangles, LoopTriangle};
