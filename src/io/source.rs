// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON scene files
//!
//! A scene file is a snapshot of host objects:
//!
//! ```json
//! {
//!   "objects": [
//!     { "name": "Rock", "materials": ["Stone"], "mesh": { "positions": [...], "polygons": [...] } }
//!   ],
//!   "collections": [
//!     { "name": "Props", "hide_viewport": false, "objects": [...] }
//!   ]
//! }
//! ```
//!
//! Matrices are 16 numbers in column-major order. A `null` material entry is
//! an unbound slot.

use crate::geometry::{
    InstanceOffset, MaterialId, MeshEvalState, MeshRecord, MeshSource, RawMesh,
};
use anyhow::{Context, Result};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn identity() -> Matrix4<f64> {
    Matrix4::identity()
}

/// One mesh object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default = "identity")]
    pub matrix_world: Matrix4<f64>,
    #[serde(default)]
    pub materials: Vec<Option<MaterialId>>,
    pub mesh: RawMesh,
    /// Mesh after modifier evaluation, when it differs from `mesh`
    #[serde(default)]
    pub evaluated_mesh: Option<RawMesh>,
    #[serde(default)]
    pub instance: Option<InstanceOffset>,
}

impl ObjectEntry {
    pub fn to_record(&self, state: MeshEvalState) -> MeshRecord {
        let mesh = match (state, &self.evaluated_mesh) {
            (MeshEvalState::Evaluated, Some(evaluated)) => evaluated.clone(),
            _ => self.mesh.clone(),
        };

        let mut record = MeshRecord::new(self.name.clone(), mesh)
            .with_slots(self.materials.clone())
            .with_transform(self.matrix_world);
        if let Some(instance) = &self.instance {
            record = record.with_instance(instance.clone());
        }
        record
    }
}

/// Named group of objects exported to its own file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub name: String,
    #[serde(default)]
    pub hide_viewport: bool,
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
}

impl CollectionEntry {
    pub fn is_visible(&self) -> bool {
        !self.hide_viewport
    }
}

impl MeshSource for CollectionEntry {
    fn mesh_records(&self, state: MeshEvalState) -> Result<Vec<MeshRecord>> {
        Ok(self.objects.iter().map(|o| o.to_record(state)).collect())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
    #[serde(default)]
    pub collections: Vec<CollectionEntry>,
}

impl SceneFile {
    /// Load a scene file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid scene JSON")
    }

    /// Collections not hidden in the viewport, in file order
    pub fn visible_collections(&self) -> impl Iterator<Item = &CollectionEntry> {
        self.collections.iter().filter(|c| c.is_visible())
    }
}

impl MeshSource for SceneFile {
    fn mesh_records(&self, state: MeshEvalState) -> Result<Vec<MeshRecord>> {
        Ok(self.objects.iter().map(|o| o.to_record(state)).collect())
    }
}
