// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene file and collection export tests

use anyhow::Result;
use ase_export::{
    export, export_collections, BuildError, BuildOptions, ExportConfig, MeshEvalState,
    MeshSource, SceneFile, WriterOptions,
};

const TRIANGLE: &str = r#"{
    "positions": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
    "polygons": [{ "corners": [0, 1, 2] }]
}"#;

fn object(name: &str, materials: &str) -> String {
    format!(
        r#"{{ "name": "{}", "materials": {}, "mesh": {} }}"#,
        name, materials, TRIANGLE
    )
}

fn scene_json() -> String {
    format!(
        r#"{{
            "objects": [{}],
            "collections": [
                {{ "name": "Rocks", "objects": [{}, {}] }},
                {{ "name": "Hidden", "hide_viewport": true, "objects": [{}] }},
                {{ "name": "Trees", "objects": [{}] }}
            ]
        }}"#,
        object("Loose", r#"["Mat"]"#),
        object("RockA", r#"["Stone"]"#),
        object("RockB", r#"["Stone", "Moss"]"#),
        object("Ghost", r#"["Mat"]"#),
        object("Oak", r#"["Bark"]"#),
    )
}

#[test]
fn test_scene_file_objects_export() -> Result<()> {
    let scene = SceneFile::from_str(&scene_json())?;
    let records = scene.mesh_records(MeshEvalState::Evaluated)?;
    assert_eq!(records.len(), 1);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("loose.ase");
    let built = export(
        &records,
        &BuildOptions::default(),
        &WriterOptions::default(),
        &path,
    )?;

    assert_eq!(built.materials.len(), 1);
    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("*NODE_NAME \"Loose\""));
    Ok(())
}

#[test]
fn test_visible_collections_get_one_file_each() -> Result<()> {
    let scene = SceneFile::from_str(&scene_json())?;
    let dir = tempfile::tempdir()?;
    let mut ticks = Vec::new();
    let mut progress = |done: usize, total: usize| ticks.push((done, total));

    let written = export_collections(
        &scene,
        MeshEvalState::Evaluated,
        &BuildOptions::default(),
        &WriterOptions::default(),
        dir.path(),
        &mut progress,
    )?;

    assert_eq!(
        written,
        vec![dir.path().join("Rocks.ase"), dir.path().join("Trees.ase")]
    );
    assert!(!dir.path().join("Hidden.ase").exists());
    assert_eq!(ticks, vec![(1, 2), (2, 2)]);

    let rocks = std::fs::read_to_string(dir.path().join("Rocks.ase"))?;
    println!("{}", rocks);
    assert!(rocks.contains("*NUMSUBMTLS 2"));
    assert!(rocks.contains("*MESH_NUMVERTEX 6"));
    assert!(rocks.contains("*MESH_NUMFACES 2"));
    Ok(())
}

#[test]
fn test_failing_collection_stops_the_batch() -> Result<()> {
    let json = format!(
        r#"{{ "collections": [
            {{ "name": "Good", "objects": [{}] }},
            {{ "name": "Bad", "objects": [{}] }},
            {{ "name": "Later", "objects": [{}] }}
        ] }}"#,
        object("A", r#"["Mat"]"#),
        object("B", r#"["Mat", null]"#),
        object("C", r#"["Mat"]"#),
    );
    let scene = SceneFile::from_str(&json)?;
    let dir = tempfile::tempdir()?;

    let err = export_collections(
        &scene,
        MeshEvalState::Evaluated,
        &BuildOptions::default(),
        &WriterOptions::default(),
        dir.path(),
        &mut ase_export::scene::NoProgress,
    )
    .expect_err("unbound slot must abort the batch");

    assert!(format!("{:#}", err).contains("collection 'Bad'"));
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::UnboundMaterialSlot { slot: 2, .. })
    ));
    assert!(dir.path().join("Good.ase").exists());
    assert!(!dir.path().join("Bad.ase").exists());
    assert!(!dir.path().join("Later.ase").exists());
    Ok(())
}

#[test]
fn test_config_drives_export() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("ase-export.toml");
    std::fs::write(
        &config_path,
        "units = \"meters\"\nmaterials = [\"First\", \"Mat\"]\n",
    )?;
    let config = ExportConfig::from_file(&config_path)?;

    let scene = SceneFile::from_str(&scene_json())?;
    let records = scene.mesh_records(config.mesh_data)?;
    let path = dir.path().join("scaled.ase");
    export(
        &records,
        &config.to_build_options(),
        &config.writer_options(),
        &path,
    )?;

    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("*MESH_VERTEX 1 -60.3520"));
    assert!(text.contains("*MESH_MTLID 1"));
    Ok(())
}
