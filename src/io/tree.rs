// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene to command tree conversion

use super::command::{Command, CommandTree, Datum};
use crate::scene::{Face, FaceNormal, GeometryGroup, MaterialRegistry, Scene};
use serde::{Deserialize, Serialize};

pub const FORMAT_HEADER: &str = "3DSMAX_ASCIIEXPORT";
pub const FORMAT_VERSION: i64 = 200;

/// Options that only affect serialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterOptions {
    /// Emit the vertex color blocks for groups that carry colors
    #[serde(default)]
    pub write_vertex_colors: bool,
}

impl WriterOptions {
    pub fn with_vertex_colors(mut self, enabled: bool) -> Self {
        self.write_vertex_colors = enabled;
        self
    }
}

/// Build the document tree for a scene
///
/// Pure: the same scene always yields the same tree.
pub fn build_command_tree(scene: &Scene, options: &WriterOptions) -> CommandTree {
    let mut tree = CommandTree::new();
    tree.push(Command::new(FORMAT_HEADER).datum(FORMAT_VERSION));

    if !scene.materials.is_empty() {
        tree.push(material_list(&scene.materials));
    }

    for group in &scene.geometry_groups {
        tree.push(geometry_object(group, options));
    }

    tree
}

fn material_list(materials: &MaterialRegistry) -> Command {
    let mut material =
        Command::new("MATERIAL").with_child(Command::new("NUMSUBMTLS").datum(materials.len()));

    for (index, id) in materials.iter().enumerate() {
        let diffuse = Command::new("MAP_DIFFUSE")
            .with_child(Command::new("MAP_NAME").datum("default"))
            .with_child(Command::new("UVW_U_OFFSET").datum(0.0))
            .with_child(Command::new("UVW_V_OFFSET").datum(0.0))
            .with_child(Command::new("UVW_U_TILING").datum(1.0))
            .with_child(Command::new("UVW_V_TILING").datum(1.0));

        material.push(
            Command::new("SUBMATERIAL")
                .datum(index)
                .with_child(Command::new("MATERIAL_NAME").datum(id.as_str()))
                .with_child(diffuse),
        );
    }

    Command::new("MATERIAL_LIST")
        .with_child(Command::new("MATERIAL_COUNT").datum(materials.len()))
        .with_child(material)
}

fn geometry_object(group: &GeometryGroup, options: &WriterOptions) -> Command {
    Command::new("GEOMOBJECT")
        .with_child(Command::new("NODE_NAME").datum(group.name.as_str()))
        .with_child(mesh(group, options))
        .with_child(Command::new("MATERIAL_REF").datum(0usize))
}

fn mesh(group: &GeometryGroup, options: &WriterOptions) -> Command {
    let mut mesh = Command::new("MESH");

    mesh.push(Command::new("MESH_NUMVERTEX").datum(group.vertex_count()));
    let mut vertex_list = Command::new("MESH_VERTEX_LIST");
    for (index, v) in group.vertices.iter().enumerate() {
        vertex_list.push(
            Command::new("MESH_VERTEX")
                .datum(index)
                .data([v.x, v.y, v.z]),
        );
    }
    mesh.push(vertex_list);

    mesh.push(Command::new("MESH_NUMFACES").datum(group.face_count()));
    let mut face_list = Command::new("MESH_FACE_LIST");
    for (index, face) in group.faces.iter().enumerate() {
        face_list.push(mesh_face(index, face));
    }
    mesh.push(face_list);

    // Texture faces index the primary channel, so both blocks need one
    let texture_vertices = group.texture_vertices();
    if !group.is_collision() && !texture_vertices.is_empty() {
        mesh.push(Command::new("MESH_NUMTVERTEX").datum(texture_vertices.len()));
        let mut tvert_list = Command::new("MESH_TVERTLIST");
        for (index, uvw) in texture_vertices.iter().enumerate() {
            tvert_list.push(Command::new("MESH_TVERT").datum(index).data(*uvw));
        }
        mesh.push(tvert_list);

        if !group.texture_faces.is_empty() {
            mesh.push(Command::new("MESH_NUMTVFACES").datum(group.texture_faces.len()));
            mesh.push(corner_face_list(
                "MESH_TFACELIST",
                "MESH_TFACE",
                &group.texture_faces,
            ));
        }
    }

    if options.write_vertex_colors && !group.is_collision() && !group.vertex_colors.is_empty() {
        mesh.push(Command::new("MESH_NUMCVERTEX").datum(group.vertex_colors.len()));
        let mut cvert_list = Command::new("MESH_CVERTLIST");
        for (index, rgb) in group.vertex_colors.iter().enumerate() {
            cvert_list.push(Command::new("MESH_VERTCOL").datum(index).data(*rgb));
        }
        mesh.push(cvert_list);

        mesh.push(Command::new("MESH_NUMCVFACES").datum(group.texture_faces.len()));
        mesh.push(corner_face_list(
            "MESH_CFACELIST",
            "MESH_CFACE",
            &group.texture_faces,
        ));
    }

    if !group.face_normals.is_empty() {
        let mut normals = Command::new("MESH_NORMALS");
        for (index, face_normal) in group.face_normals.iter().enumerate() {
            push_face_normal(&mut normals, index, face_normal);
        }
        mesh.push(normals);
    }

    mesh
}

fn mesh_face(index: usize, face: &Face) -> Command {
    let corners = Datum::map([
        ("A", Datum::from(face.a)),
        ("B", Datum::from(face.b)),
        ("C", Datum::from(face.c)),
        ("AB", Datum::Int(0)),
        ("BC", Datum::Int(0)),
        ("CA", Datum::Int(0)),
    ]);

    let mut command = Command::new("MESH_FACE")
        .datum(Datum::map([(index.to_string(), corners)]))
        .with_inline(Command::new("MESH_SMOOTHING").datum(face.smoothing));

    if let Some(material_index) = face.material_index {
        command = command.with_inline(Command::new("MESH_MTLID").datum(material_index));
    }

    command
}

fn corner_face_list(list: &str, item: &str, faces: &[[usize; 3]]) -> Command {
    let mut command = Command::new(list);
    for (index, corners) in faces.iter().enumerate() {
        command.push(Command::new(item).datum(index).data(*corners));
    }
    command
}

fn push_face_normal(normals: &mut Command, index: usize, face_normal: &FaceNormal) {
    let n = face_normal.normal;
    normals.push(
        Command::new("MESH_FACENORMAL")
            .datum(index)
            .data([n.x, n.y, n.z]),
    );
    for vertex_normal in &face_normal.vertex_normals {
        let n = vertex_normal.normal;
        normals.push(
            Command::new("MESH_VERTEXNORMAL")
                .datum(vertex_normal.vertex_index)
                .data([n.x, n.y, n.z]),
        );
    }
}
