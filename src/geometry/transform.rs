// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export-space transforms

use nalgebra::{Matrix3, Matrix4, Vector3};

/// 180° rotation about the vertical (Z) axis
///
/// Built from exact entries so that flipped coordinates carry no rounding noise.
pub fn axis_flip() -> Matrix4<f64> {
    Matrix4::new(
        -1.0, 0.0, 0.0, 0.0, //
        0.0, -1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Matrix that takes mesh-local positions into the exported space
pub fn vertex_transform(world: &Matrix4<f64>, unit_scale: f64) -> Matrix4<f64> {
    Matrix4::new_scaling(unit_scale) * axis_flip() * world
}

/// Per-axis scale of an affine matrix
///
/// Axis lengths come from the basis columns. A negative determinant (a
/// mirroring transform) is reported by negating every axis, matching the
/// decomposition convention of the host application.
pub fn decompose_scale(matrix: &Matrix4<f64>) -> Vector3<f64> {
    let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let scale = Vector3::new(
        linear.column(0).norm(),
        linear.column(1).norm(),
        linear.column(2).norm(),
    );
    if linear.determinant() < 0.0 {
        -scale
    } else {
        scale
    }
}

/// Number of negative axes in [`decompose_scale`]
pub fn negative_scale_axes(matrix: &Matrix4<f64>) -> usize {
    decompose_scale(matrix).iter().filter(|&&s| s < 0.0).count()
}

/// Corner traversal order for a triangle under `matrix`
///
/// An odd count of negative scale axes flips the winding.
pub fn corner_order(matrix: &Matrix4<f64>) -> Winding {
    if negative_scale_axes(matrix) % 2 == 1 {
        Winding::Reversed
    } else {
        Winding::Preserved
    }
}

/// Triangle corner order after transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Preserved,
    Reversed,
}

impl Winding {
    pub fn indices(self) -> [usize; 3] {
        match self {
            Winding::Preserved => [0, 1, 2],
            Winding::Reversed => [2, 1, 0],
        }
    }

    pub fn is_reversed(self) -> bool {
        self == Winding::Reversed
    }
}
