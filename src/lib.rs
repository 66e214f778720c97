// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASE scene exporter
//!
//! Merges mesh objects into indexed geometry groups and writes them as an
//! ASCII scene export (`*3DSMAX_ASCIIEXPORT 200`) for game-engine importers.
//! Renderable meshes share one merged group; meshes named `MCDCX_*` become
//! convex collision hulls of their own.

pub mod cli;
pub mod config;
pub mod geometry;
pub mod io;
pub mod scene;

pub use config::{ExportConfig, Units};
pub use geometry::{MaterialId, MeshEvalState, MeshRecord, MeshSource, Polygon, RawMesh};
pub use io::{write_ase, SceneFile, WriterOptions};
pub use scene::{build_scene, BuildError, BuildOptions, ProgressSink, Scene, SceneBuilder};

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

/// Build a scene from `records` and write it to `path`
///
/// Nothing is written when the build fails.
pub fn export(
    records: &[MeshRecord],
    build: &BuildOptions,
    writer: &WriterOptions,
    path: impl AsRef<Path>,
) -> Result<Scene> {
    let scene = build_scene(records, build)?;
    write_ase(&scene, path, writer)?;
    Ok(scene)
}

/// Export every visible collection of `scene` to `<dir>/<name>.ase`
///
/// Collections are processed in file order. The first failure aborts the
/// batch; files written before it stay on disk.
pub fn export_collections(
    scene: &SceneFile,
    state: MeshEvalState,
    build: &BuildOptions,
    writer: &WriterOptions,
    dir: impl AsRef<Path>,
    progress: &mut dyn ProgressSink,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let collections: Vec<_> = scene.visible_collections().collect();
    let total = collections.len();
    let mut written = Vec::with_capacity(total);

    for (index, collection) in collections.into_iter().enumerate() {
        let path = dir.join(format!("{}.ase", collection.name));
        let records = collection.mesh_records(state)?;
        export(&records, build, writer, &path)
            .with_context(|| format!("Failed to export collection '{}'", collection.name))?;
        written.push(path);
        progress.tick(index + 1, total);
    }

    info!("Exported {} collections to {}", written.len(), dir.display());
    Ok(written)
}
