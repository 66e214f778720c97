// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Build failures
//!
//! Every variant aborts the whole build; no partial scene is returned.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("at least one mesh object must be selected")]
    EmptySelection,

    #[error("at least one non-collision mesh must be exported")]
    NoRenderableGroup,

    #[error("mesh '{mesh}' must have at least one material")]
    EmptyMaterialList { mesh: String },

    /// `slot` is 1-based
    #[error("material slot {slot} for mesh '{mesh}' cannot be empty")]
    UnboundMaterialSlot { mesh: String, slot: usize },

    #[error("collision mesh '{mesh}' is not manifold")]
    NonManifoldCollision { mesh: String },

    #[error("collision mesh '{mesh}' is not convex")]
    NonConvexCollision { mesh: String },

    #[error("mesh '{mesh}' is malformed: {reason}")]
    MalformedMesh { mesh: String, reason: String },
}

impl BuildError {
    /// Name of the offending mesh, when the error is tied to one
    pub fn mesh(&self) -> Option<&str> {
        match self {
            BuildError::EmptySelection | BuildError::NoRenderableGroup => None,
            BuildError::EmptyMaterialList { mesh }
            | BuildError::UnboundMaterialSlot { mesh, .. }
            | BuildError::NonManifoldCollision { mesh }
            | BuildError::NonConvexCollision { mesh }
            | BuildError::MalformedMesh { mesh, .. } => Some(mesh),
        }
    }
}
