// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene builder - folds mesh records into geometry groups
//!
//! Renderable meshes are merged into one main group, created by the first
//! renderable record. Every collision mesh gets its own group. Each record is
//! transformed into export space, triangulated and appended with its indices
//! shifted past whatever the group already holds.

use super::error::BuildError;
use super::materials::MaterialRegistry;
use super::model::{Face, GeometryGroup, Scene, UvLayer};
use super::progress::ProgressSink;
use crate::geometry::{
    check_convex_hull, corner_order, loop_triangles, quantize, smoothing_islands,
    vertex_transform, HullDefect, MaterialId, MeshClass, MeshRecord, NormalResolver,
};
use log::{debug, warn};
use nalgebra::Point3;

/// Scale for Unreal units
pub const UNREAL_UNIT_SCALE: f64 = 1.0;
/// Scale taking metres to Unreal units
pub const METERS_UNIT_SCALE: f64 = 60.352;

const WHITE: [f64; 3] = [1.0, 1.0, 1.0];

/// Options consumed by [`SceneBuilder`]
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Uniform scale applied after the axis flip
    pub unit_scale: f64,
    /// Caller-ordered materials; registry indices follow this order
    pub materials: Vec<MaterialId>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            unit_scale: UNREAL_UNIT_SCALE,
            materials: Vec::new(),
        }
    }
}

impl BuildOptions {
    pub fn with_unit_scale(mut self, unit_scale: f64) -> Self {
        self.unit_scale = unit_scale;
        self
    }

    pub fn with_materials<I, M>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MaterialId>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }
}

/// Build a scene with no progress reporting
pub fn build_scene(records: &[MeshRecord], options: &BuildOptions) -> Result<Scene, BuildError> {
    SceneBuilder::new(options.clone()).build(records)
}

pub struct SceneBuilder<'p> {
    options: BuildOptions,
    progress: Option<&'p mut dyn ProgressSink>,
}

impl SceneBuilder<'static> {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }
}

impl<'p> SceneBuilder<'p> {
    /// Report a tick after each folded record
    pub fn with_progress<'q>(self, progress: &'q mut dyn ProgressSink) -> SceneBuilder<'q> {
        SceneBuilder {
            options: self.options,
            progress: Some(progress),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Fold `records` into a scene, in order
    pub fn build(&mut self, records: &[MeshRecord]) -> Result<Scene, BuildError> {
        if records.is_empty() {
            return Err(BuildError::EmptySelection);
        }

        let mut scene = Scene {
            materials: MaterialRegistry::with_order(self.options.materials.iter().cloned()),
            geometry_groups: Vec::new(),
        };
        let mut main_group: Option<usize> = None;
        let total = records.len();

        for (index, record) in records.iter().enumerate() {
            let class = MeshClass::of(&record.name);
            check_record(record, class)?;

            let material_indices = match class {
                MeshClass::Renderable => resolve_slots(record, &mut scene.materials)?,
                MeshClass::Collision => Vec::new(),
            };

            let group_index = match (class, main_group) {
                (MeshClass::Renderable, Some(main)) => main,
                _ => {
                    scene
                        .geometry_groups
                        .push(GeometryGroup::new(record.name.clone(), class));
                    let created = scene.geometry_groups.len() - 1;
                    if class == MeshClass::Renderable {
                        main_group = Some(created);
                    }
                    created
                }
            };

            let group = &mut scene.geometry_groups[group_index];
            fold_record(group, record, &material_indices, self.options.unit_scale);
            debug!(
                "folded '{}' into '{}' ({} vertices, {} faces)",
                record.name,
                group.name,
                group.vertices.len(),
                group.faces.len()
            );

            if let Some(progress) = self.progress.as_deref_mut() {
                progress.tick(index + 1, total);
            }
        }

        if main_group.is_none() {
            return Err(BuildError::NoRenderableGroup);
        }

        Ok(scene)
    }
}

/// Reject records that cannot be folded, before anything is appended
fn check_record(record: &MeshRecord, class: MeshClass) -> Result<(), BuildError> {
    record
        .mesh
        .validate()
        .map_err(|reason| BuildError::MalformedMesh {
            mesh: record.name.clone(),
            reason,
        })?;

    match class {
        MeshClass::Collision => match check_convex_hull(&record.mesh) {
            Some(HullDefect::NonManifold(_)) => Err(BuildError::NonManifoldCollision {
                mesh: record.name.clone(),
            }),
            Some(HullDefect::NonConvex(_)) => Err(BuildError::NonConvexCollision {
                mesh: record.name.clone(),
            }),
            None => Ok(()),
        },
        MeshClass::Renderable => {
            if record.material_slots.is_empty() {
                return Err(BuildError::EmptyMaterialList {
                    mesh: record.name.clone(),
                });
            }
            Ok(())
        }
    }
}

/// Registry index for every material slot of a renderable record
fn resolve_slots(
    record: &MeshRecord,
    materials: &mut MaterialRegistry,
) -> Result<Vec<usize>, BuildError> {
    record
        .material_slots
        .iter()
        .enumerate()
        .map(|(slot, material)| match material {
            Some(material) => Ok(materials.index_of(material)),
            None => Err(BuildError::UnboundMaterialSlot {
                mesh: record.name.clone(),
                slot: slot + 1,
            }),
        })
        .collect()
}

/// Append one record's geometry to `group`
fn fold_record(
    group: &mut GeometryGroup,
    record: &MeshRecord,
    material_indices: &[usize],
    unit_scale: f64,
) {
    let mesh = &record.mesh;
    let matrix = vertex_transform(&record.world_matrix(), unit_scale);
    let winding = corner_order(&matrix);
    let order = winding.indices();
    let vertex_offset = group.vertex_offset;

    group.vertices.extend(
        mesh.positions
            .iter()
            .map(|p| matrix.transform_point(&Point3::from(*p)).coords),
    );

    let triangles = loop_triangles(mesh);
    let islands = smoothing_islands(mesh);
    let loop_vertices = mesh.loop_vertices();

    for triangle in &triangles {
        let [a, b, c] = order.map(|i| vertex_offset + loop_vertices[triangle.loops[i]] as usize);
        let material_index = if group.is_collision() {
            None
        } else {
            Some(slot_material(record, triangle.polygon, material_indices))
        };
        group.faces.push(Face {
            a,
            b,
            c,
            smoothing: quantize(islands[triangle.polygon]),
            material_index,
        });
    }

    if !group.is_collision() {
        let resolver = NormalResolver::new(mesh, &islands);
        group.face_normals.extend(
            triangles
                .iter()
                .map(|triangle| resolver.resolve(triangle, winding, vertex_offset)),
        );

        append_uv_layers(group, record);

        let texture_offset = group.texture_vertex_offset;
        group.texture_faces.extend(
            triangles
                .iter()
                .map(|triangle| order.map(|i| texture_offset + triangle.loops[i])),
        );

        append_vertex_colors(group, record);
    }

    group.texture_vertex_offset += mesh.corner_count();
    group.vertex_offset = group.vertices.len();
}

/// Registry index for a polygon's slot, clamped to the last slot
fn slot_material(record: &MeshRecord, polygon: usize, material_indices: &[usize]) -> usize {
    let slot = record.mesh.polygons[polygon].material_index;
    if slot >= material_indices.len() {
        warn!(
            "polygon {} of '{}' uses material slot {} of {}, clamping",
            polygon,
            record.name,
            slot + 1,
            material_indices.len()
        );
    }
    material_indices[slot.min(material_indices.len() - 1)]
}

/// Append every UV channel, zero-filling channels a mesh does not have
fn append_uv_layers(group: &mut GeometryGroup, record: &MeshRecord) {
    let corners = record.mesh.corner_count();
    let existing = group.uv_layers.len();

    for (channel, layer) in record.mesh.uv_layers.iter().enumerate() {
        if channel >= group.uv_layers.len() {
            if group.texture_vertex_offset > 0 {
                warn!(
                    "uv channel {} first appears on '{}', zero-filling {} earlier corners",
                    channel, record.name, group.texture_vertex_offset
                );
            }
            group.uv_layers.push(UvLayer {
                texture_vertices: vec![[0.0; 3]; group.texture_vertex_offset],
            });
        }
        group.uv_layers[channel]
            .texture_vertices
            .extend(layer.iter().map(|&[u, v]| [u, v, 0.0]));
    }

    for channel in record.mesh.uv_layers.len()..existing {
        warn!(
            "'{}' has no uv channel {}, zero-filling {} corners",
            record.name, channel, corners
        );
        group.uv_layers[channel]
            .texture_vertices
            .extend(std::iter::repeat([0.0; 3]).take(corners));
    }
}

/// Append the active color channel, padding with white where colors are missing
fn append_vertex_colors(group: &mut GeometryGroup, record: &MeshRecord) {
    let corners = record.mesh.corner_count();
    match &record.mesh.vertex_colors {
        Some(colors) => {
            if group.vertex_colors.is_empty() && group.texture_vertex_offset > 0 {
                group.vertex_colors = vec![WHITE; group.texture_vertex_offset];
            }
            group.vertex_colors.extend(colors.iter().copied());
        }
        None if !group.vertex_colors.is_empty() => {
            group
                .vertex_colors
                .extend(std::iter::repeat(WHITE).take(corners));
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::topology::fixtures::cube;
    use crate::geometry::{InstanceOffset, Polygon, RawMesh};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Vector3};

    /// Unit quad in the XY plane split into two triangles
    fn quad() -> RawMesh {
        RawMesh::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            vec![Polygon::new(vec![0, 1, 2]), Polygon::new(vec![0, 2, 3])],
        )
    }

    fn renderable(name: &str, mesh: RawMesh) -> MeshRecord {
        MeshRecord::new(name, mesh).with_materials(["Stone"])
    }

    #[test]
    fn test_empty_selection() {
        let err = build_scene(&[], &BuildOptions::default()).unwrap_err();
        assert_eq!(err, BuildError::EmptySelection);
    }

    #[test]
    fn test_collision_only_is_rejected() {
        let records = vec![MeshRecord::new("MCDCX_Hull", cube())];
        let err = build_scene(&records, &BuildOptions::default()).unwrap_err();
        assert_eq!(err, BuildError::NoRenderableGroup);
    }

    #[test]
    fn test_renderable_meshes_fold_into_one_group() {
        let mut second = cube();
        second.positions.iter_mut().for_each(|p| p.x += 5.0);
        let records = vec![renderable("A", quad()), renderable("B", second)];

        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        assert_eq!(scene.geometry_groups.len(), 1);

        let group = &scene.geometry_groups[0];
        assert_eq!(group.name, "A");
        assert_eq!(group.vertex_count(), 4 + 8);
        assert_eq!(group.face_count(), 2 + 12);
        assert_eq!(group.vertex_offset, 12);
        assert_eq!(group.texture_vertex_offset, 6 + 24);

        // First mesh indexes [0, 4), second [4, 12)
        for face in &group.faces[..2] {
            assert!(face.indices().iter().all(|&i| i < 4));
        }
        for face in &group.faces[2..] {
            assert!(face.indices().iter().all(|&i| (4..12).contains(&i)));
        }
    }

    #[test]
    fn test_each_collision_mesh_gets_its_own_group() {
        let records = vec![
            MeshRecord::new("MCDCX_A", cube()),
            renderable("Body", quad()),
            MeshRecord::new("MCDCX_B", cube()),
            renderable("Trim", quad()),
        ];
        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        let names: Vec<&str> = scene.geometry_groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["MCDCX_A", "Body", "MCDCX_B"]);

        let main = scene.main_group().unwrap();
        assert_eq!(main.vertex_count(), 8);

        for hull in scene.collision_groups() {
            assert_eq!(hull.vertex_count(), 8);
            assert!(hull.face_normals.is_empty());
            assert!(hull.uv_layers.is_empty());
            assert!(hull.texture_faces.is_empty());
            assert!(hull.faces.iter().all(|f| f.material_index.is_none()));
        }
    }

    #[test]
    fn test_collision_mesh_does_not_need_materials() {
        let records = vec![
            renderable("Body", quad()),
            MeshRecord::new("MCDCX_Hull", cube()).with_slots(vec![None]),
        ];
        assert!(build_scene(&records, &BuildOptions::default()).is_ok());
    }

    #[test]
    fn test_bad_collision_hulls_abort() {
        let mut open = cube();
        open.polygons.pop();
        let records = vec![renderable("Body", quad()), MeshRecord::new("MCDCX_Open", open)];
        assert_eq!(
            build_scene(&records, &BuildOptions::default()).unwrap_err(),
            BuildError::NonManifoldCollision {
                mesh: "MCDCX_Open".to_string()
            }
        );

        let mut dented = cube();
        dented.positions[6] = Vector3::new(1.0, 1.0, -0.5);
        let records = vec![renderable("Body", quad()), MeshRecord::new("MCDCX_Dent", dented)];
        assert_eq!(
            build_scene(&records, &BuildOptions::default()).unwrap_err(),
            BuildError::NonConvexCollision {
                mesh: "MCDCX_Dent".to_string()
            }
        );
    }

    #[test]
    fn test_material_slot_errors() {
        let records = vec![MeshRecord::new("Bare", quad())];
        assert_eq!(
            build_scene(&records, &BuildOptions::default()).unwrap_err(),
            BuildError::EmptyMaterialList {
                mesh: "Bare".to_string()
            }
        );

        let records = vec![MeshRecord::new("Holey", quad())
            .with_slots(vec![Some("Stone".into()), None])];
        assert_eq!(
            build_scene(&records, &BuildOptions::default()).unwrap_err(),
            BuildError::UnboundMaterialSlot {
                mesh: "Holey".to_string(),
                slot: 2
            }
        );
    }

    #[test]
    fn test_shared_materials_share_indices() {
        let mut mesh = quad();
        mesh.polygons[1].material_index = 1;
        let records = vec![
            MeshRecord::new("A", mesh).with_materials(["Moss", "Stone"]),
            MeshRecord::new("B", quad()).with_materials(["Stone"]),
        ];
        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        assert_eq!(scene.materials.len(), 2);

        let ids: Vec<Option<usize>> = scene.geometry_groups[0]
            .faces
            .iter()
            .map(|f| f.material_index)
            .collect();
        assert_eq!(ids, vec![Some(0), Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn test_caller_material_order_is_used() {
        let records = vec![renderable("A", quad())];
        let options = BuildOptions::default().with_materials(["Moss", "Stone"]);
        let scene = build_scene(&records, &options).unwrap();
        let names: Vec<&str> = scene.materials.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["Moss", "Stone"]);
        assert!(scene.geometry_groups[0]
            .faces
            .iter()
            .all(|f| f.material_index == Some(1)));
    }

    #[test]
    fn test_out_of_range_slot_clamps() {
        let mut mesh = quad();
        mesh.polygons[0].material_index = 7;
        let records = vec![MeshRecord::new("A", mesh).with_materials(["Moss", "Stone"])];
        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        assert_eq!(scene.geometry_groups[0].faces[0].material_index, Some(1));
    }

    #[test]
    fn test_vertices_are_flipped_and_scaled() {
        let records = vec![renderable("A", quad())
            .with_transform(Matrix4::new_translation(&Vector3::new(0.0, 0.0, 1.0)))];
        let options = BuildOptions::default().with_unit_scale(METERS_UNIT_SCALE);
        let scene = build_scene(&records, &options).unwrap();
        let v = scene.geometry_groups[0].vertices[2];
        assert_relative_eq!(
            v,
            Vector3::new(-METERS_UNIT_SCALE, -METERS_UNIT_SCALE, METERS_UNIT_SCALE)
        );
    }

    #[test]
    fn test_instance_offset_moves_vertices() {
        let records = vec![renderable("A", quad()).with_instance(InstanceOffset {
            instancer: Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)),
            offset: Vector3::new(0.0, 0.0, 3.0),
        })];
        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        assert_relative_eq!(
            scene.geometry_groups[0].vertices[0],
            Vector3::new(-10.0, 0.0, 3.0)
        );
    }

    #[test]
    fn test_mirrored_mesh_reverses_winding_and_corner_normals() {
        let plain = build_scene(&[renderable("A", quad())], &BuildOptions::default()).unwrap();
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0));
        let mirrored = build_scene(
            &[renderable("A", quad()).with_transform(mirror)],
            &BuildOptions::default(),
        )
        .unwrap();

        let (p, m) = (&plain.geometry_groups[0], &mirrored.geometry_groups[0]);
        for (pf, mf) in p.faces.iter().zip(&m.faces) {
            assert_eq!([pf.a, pf.b, pf.c], [mf.c, mf.b, mf.a]);
        }
        for (pn, mn) in p.face_normals.iter().zip(&m.face_normals) {
            assert_relative_eq!(pn.normal, mn.normal);
            for i in 0..3 {
                assert_relative_eq!(pn.vertex_normals[i].normal, -mn.vertex_normals[2 - i].normal);
            }
        }
        for (pt, mt) in p.texture_faces.iter().zip(&m.texture_faces) {
            assert_eq!(*pt, [mt[2], mt[1], mt[0]]);
        }
    }

    #[test]
    fn test_winding_is_decided_per_mesh() {
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, -1.0));
        let records = vec![
            renderable("A", quad()),
            renderable("B", quad()).with_transform(mirror),
        ];
        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        let faces = &scene.geometry_groups[0].faces;
        assert_eq!(faces[0].indices(), [0, 1, 2]);
        assert_eq!(faces[2].indices(), [6, 5, 4]);
    }

    #[test]
    fn test_uv_channels_are_zero_filled() {
        let mut first = quad();
        first.uv_layers = vec![vec![[0.5, 0.5]; 6]];
        let mut second = quad();
        second.uv_layers = vec![vec![[1.0, 1.0]; 6], vec![[0.25, 0.75]; 6]];
        let third = quad();

        let records = vec![
            renderable("A", first),
            renderable("B", second),
            renderable("C", third),
        ];
        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        let group = &scene.geometry_groups[0];

        assert_eq!(group.uv_layers.len(), 2);
        for layer in &group.uv_layers {
            assert_eq!(layer.len(), group.texture_vertex_offset);
        }
        assert_eq!(group.uv_layers[0].texture_vertices[0], [0.5, 0.5, 0.0]);
        assert_eq!(group.uv_layers[0].texture_vertices[6], [1.0, 1.0, 0.0]);
        assert_eq!(group.uv_layers[0].texture_vertices[12], [0.0, 0.0, 0.0]);
        assert_eq!(group.uv_layers[1].texture_vertices[0], [0.0, 0.0, 0.0]);
        assert_eq!(group.uv_layers[1].texture_vertices[6], [0.25, 0.75, 0.0]);

        let max_texture_index = group.texture_faces.iter().flatten().max().copied();
        assert_eq!(max_texture_index, Some(17));
    }

    #[test]
    fn test_vertex_colors_are_padded_white() {
        let mut colored = quad();
        colored.vertex_colors = Some(vec![[1.0, 0.0, 0.0]; 6]);
        let records = vec![
            renderable("A", quad()),
            renderable("B", colored),
            renderable("C", quad()),
        ];
        let scene = build_scene(&records, &BuildOptions::default()).unwrap();
        let colors = &scene.geometry_groups[0].vertex_colors;
        assert_eq!(colors.len(), 18);
        assert_eq!(colors[0], WHITE);
        assert_eq!(colors[6], [1.0, 0.0, 0.0]);
        assert_eq!(colors[17], WHITE);
    }

    #[test]
    fn test_smoothing_groups_are_quantized() {
        let mut mesh = quad();
        mesh.polygons[1] = mesh.polygons[1].clone().flat();
        let scene = build_scene(&[renderable("A", mesh)], &BuildOptions::default()).unwrap();
        let smoothing: Vec<u32> = scene.geometry_groups[0].faces.iter().map(|f| f.smoothing).collect();
        assert_eq!(smoothing, vec![0, 1]);
    }

    #[test]
    fn test_progress_ticks_once_per_record() {
        let records = vec![
            renderable("A", quad()),
            MeshRecord::new("MCDCX_Hull", cube()),
            renderable("B", quad()),
        ];
        let mut ticks = Vec::new();
        let mut sink = |done: usize, total: usize| ticks.push((done, total));
        let scene = SceneBuilder::new(BuildOptions::default())
            .with_progress(&mut sink)
            .build(&records)
            .unwrap();
        assert_eq!(scene.geometry_groups.len(), 2);
        assert_eq!(ticks, vec![(1, 3), (2, 3), (3, 3)]);
    }
}
