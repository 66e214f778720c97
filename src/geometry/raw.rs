// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Raw mesh records handed to the scene builder
//!
//! These are fully materialized snapshots of host objects. The builder never
//! reaches back into the host; everything it needs travels in a [`MeshRecord`].

use anyhow::Result;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name prefix that marks a mesh as collision-only geometry
pub const COLLISION_PREFIX: &str = "MCDCX_";

/// Stable material identity (the material's name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub String);

impl MaterialId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for MaterialId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A polygon as an ordered ring of vertex indices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertex index per corner (loop)
    pub corners: Vec<u32>,
    /// Index into the owning record's material slots
    #[serde(default)]
    pub material_index: usize,
    /// Smooth-shaded polygons may share normals with their neighbours
    #[serde(default = "default_smooth")]
    pub smooth: bool,
}

fn default_smooth() -> bool {
    true
}

impl Polygon {
    pub fn new(corners: Vec<u32>) -> Self {
        Self {
            corners,
            material_index: 0,
            smooth: true,
        }
    }

    pub fn with_material(mut self, material_index: usize) -> Self {
        self.material_index = material_index;
        self
    }

    pub fn flat(mut self) -> Self {
        self.smooth = false;
        self
    }
}

/// Mesh data in object-local space
///
/// Per-corner arrays (`custom_normals`, each UV channel, `vertex_colors`) are
/// indexed by loop index: corners are numbered polygon by polygon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMesh {
    pub positions: Vec<Vector3<f64>>,
    pub polygons: Vec<Polygon>,
    #[serde(default)]
    pub sharp_edges: Vec<[u32; 2]>,
    /// Dihedral angle (radians) above which an edge is treated as sharp
    #[serde(default)]
    pub auto_smooth_angle: Option<f64>,
    #[serde(default)]
    pub custom_normals: Option<Vec<Vector3<f64>>>,
    #[serde(default)]
    pub uv_layers: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub vertex_colors: Option<Vec<[f64; 3]>>,
}

impl RawMesh {
    pub fn new(positions: Vec<Vector3<f64>>, polygons: Vec<Polygon>) -> Self {
        Self {
            positions,
            polygons,
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Total number of corners (loops) across all polygons
    pub fn corner_count(&self) -> usize {
        self.polygons.iter().map(|p| p.corners.len()).sum()
    }

    /// First loop index of every polygon
    pub fn loop_starts(&self) -> Vec<usize> {
        let mut starts = Vec::with_capacity(self.polygons.len());
        let mut next = 0;
        for polygon in &self.polygons {
            starts.push(next);
            next += polygon.corners.len();
        }
        starts
    }

    /// Vertex index referenced by each loop
    pub fn loop_vertices(&self) -> Vec<u32> {
        self.polygons
            .iter()
            .flat_map(|p| p.corners.iter().copied())
            .collect()
    }

    /// Check that every index and per-corner array is consistent
    pub fn validate(&self) -> std::result::Result<(), String> {
        let vertex_count = self.positions.len();
        for (polygon_index, polygon) in self.polygons.iter().enumerate() {
            if polygon.corners.len() < 3 {
                return Err(format!(
                    "polygon {} has {} corners",
                    polygon_index,
                    polygon.corners.len()
                ));
            }
            if let Some(&bad) = polygon
                .corners
                .iter()
                .find(|&&v| v as usize >= vertex_count)
            {
                return Err(format!(
                    "polygon {} references vertex {} of {}",
                    polygon_index, bad, vertex_count
                ));
            }
        }

        let corners = self.corner_count();
        if let Some(normals) = &self.custom_normals {
            if normals.len() != corners {
                return Err(format!(
                    "{} custom normals for {} corners",
                    normals.len(),
                    corners
                ));
            }
        }
        for (channel, layer) in self.uv_layers.iter().enumerate() {
            if layer.len() != corners {
                return Err(format!(
                    "uv channel {} has {} entries for {} corners",
                    channel,
                    layer.len(),
                    corners
                ));
            }
        }
        if let Some(colors) = &self.vertex_colors {
            if colors.len() != corners {
                return Err(format!(
                    "{} vertex colors for {} corners",
                    colors.len(),
                    corners
                ));
            }
        }
        Ok(())
    }
}

/// Collection-instance placement of a mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceOffset {
    /// World matrix of the object doing the instancing
    pub instancer: Matrix4<f64>,
    /// The instanced collection's offset
    pub offset: Vector3<f64>,
}

/// One mesh object as seen by the builder
#[derive(Debug, Clone)]
pub struct MeshRecord {
    pub name: String,
    pub mesh: RawMesh,
    /// `None` marks an unbound slot
    pub material_slots: Vec<Option<MaterialId>>,
    /// World matrix, or the local matrix when `instance` is set
    pub transform: Matrix4<f64>,
    pub instance: Option<InstanceOffset>,
}

impl MeshRecord {
    pub fn new(name: impl Into<String>, mesh: RawMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            material_slots: Vec::new(),
            transform: Matrix4::identity(),
            instance: None,
        }
    }

    pub fn with_materials<I, M>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MaterialId>,
    {
        self.material_slots = materials.into_iter().map(|m| Some(m.into())).collect();
        self
    }

    pub fn with_slots(mut self, slots: Vec<Option<MaterialId>>) -> Self {
        self.material_slots = slots;
        self
    }

    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_instance(mut self, instance: InstanceOffset) -> Self {
        self.instance = Some(instance);
        self
    }

    /// World matrix, including the instance-collection offset if any
    pub fn world_matrix(&self) -> Matrix4<f64> {
        match &self.instance {
            Some(instance) => {
                instance.instancer * Matrix4::new_translation(&instance.offset) * self.transform
            }
            None => self.transform,
        }
    }
}

/// Geometry classification, decided once from the name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshClass {
    Renderable,
    Collision,
}

impl MeshClass {
    /// Case-sensitive exact-prefix test against [`COLLISION_PREFIX`]
    pub fn of(name: &str) -> Self {
        if name.starts_with(COLLISION_PREFIX) {
            MeshClass::Collision
        } else {
            MeshClass::Renderable
        }
    }

    pub fn is_collision(self) -> bool {
        self == MeshClass::Collision
    }
}

/// Which mesh data the source should hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshEvalState {
    /// Mesh data as authored, no modifiers applied
    Original,
    /// Final mesh after the host's modifier evaluation
    #[default]
    Evaluated,
}

/// Anything that can produce mesh records for an export
pub trait MeshSource {
    fn mesh_records(&self, state: MeshEvalState) -> Result<Vec<MeshRecord>>;
}

impl MeshSource for Vec<MeshRecord> {
    fn mesh_records(&self, _state: MeshEvalState) -> Result<Vec<MeshRecord>> {
        Ok(self.clone())
    }
}
