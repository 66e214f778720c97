// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene model produced by the builder and consumed by the writer

use super::materials::MaterialRegistry;
use crate::geometry::MeshClass;
use nalgebra::Vector3;
use serde::Serialize;

/// Triangle in group-local vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    /// Smoothing slot in `[0, 32)`
    pub smoothing: u32,
    /// Registry index; always `None` on collision geometry
    pub material_index: Option<usize>,
}

impl Face {
    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VertexNormal {
    pub vertex_index: usize,
    pub normal: Vector3<f64>,
}

/// Face normal plus one normal per emitted corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceNormal {
    pub normal: Vector3<f64>,
    pub vertex_normals: [VertexNormal; 3],
}

/// One UV channel: a `(u, v, w)` entry per corner
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UvLayer {
    pub texture_vertices: Vec<[f64; 3]>,
}

impl UvLayer {
    pub fn len(&self) -> usize {
        self.texture_vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texture_vertices.is_empty()
    }
}

/// One exported mesh object
#[derive(Debug, Clone, Serialize)]
pub struct GeometryGroup {
    pub name: String,
    pub class: MeshClass,
    pub vertices: Vec<Vector3<f64>>,
    pub faces: Vec<Face>,
    pub face_normals: Vec<FaceNormal>,
    pub uv_layers: Vec<UvLayer>,
    pub texture_faces: Vec<[usize; 3]>,
    pub vertex_colors: Vec<[f64; 3]>,
    /// Vertex count before the mesh currently being folded in
    pub vertex_offset: usize,
    /// Corner count before the mesh currently being folded in
    pub texture_vertex_offset: usize,
}

impl GeometryGroup {
    pub fn new(name: impl Into<String>, class: MeshClass) -> Self {
        Self {
            name: name.into(),
            class,
            vertices: Vec::new(),
            faces: Vec::new(),
            face_normals: Vec::new(),
            uv_layers: Vec::new(),
            texture_faces: Vec::new(),
            vertex_colors: Vec::new(),
            vertex_offset: 0,
            texture_vertex_offset: 0,
        }
    }

    pub fn is_collision(&self) -> bool {
        self.class.is_collision()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Texture vertices of the primary UV channel, if any
    pub fn texture_vertices(&self) -> &[[f64; 3]] {
        self.uv_layers
            .first()
            .map(|layer| layer.texture_vertices.as_slice())
            .unwrap_or(&[])
    }
}

/// Complete export document model
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    pub materials: MaterialRegistry,
    pub geometry_groups: Vec<GeometryGroup>,
}

impl Scene {
    /// The merged renderable group
    pub fn main_group(&self) -> Option<&GeometryGroup> {
        self.geometry_groups.iter().find(|g| !g.is_collision())
    }

    pub fn collision_groups(&self) -> impl Iterator<Item = &GeometryGroup> {
        self.geometry_groups.iter().filter(|g| g.is_collision())
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            materials: self
                .materials
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
            groups: self
                .geometry_groups
                .iter()
                .map(|g| GroupSummary {
                    name: g.name.clone(),
                    class: g.class,
                    vertex_count: g.vertex_count(),
                    face_count: g.face_count(),
                    uv_channels: g.uv_layers.len(),
                    texture_vertex_count: g.texture_vertices().len(),
                    has_vertex_colors: !g.vertex_colors.is_empty(),
                })
                .collect(),
        }
    }
}

/// Counts describing one group, for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub class: MeshClass,
    pub vertex_count: usize,
    pub face_count: usize,
    pub uv_channels: usize,
    pub texture_vertex_count: usize,
    pub has_vertex_colors: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub materials: Vec<String>,
    pub groups: Vec<GroupSummary>,
}
