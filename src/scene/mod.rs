// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene module - aggregation of mesh records into an export model

mod builder;
mod error;
mod materials;
mod model;
mod progress;

pub use builder::{
    build_scene, BuildOptions, SceneBuilder, METERS_UNIT_SCALE, UNREAL_UNIT_SCALE,
};
pub use error::BuildError;
pub use materials::MaterialRegistry;
pub use model::{
    Face, FaceNormal, GeometryGroup, GroupSummary, Scene, SceneSummary, UvLayer, VertexNormal,
};
pub use progress::{NoProgress, ProgressSink};
