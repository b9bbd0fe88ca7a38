// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! 4x4 homogeneous affine transforms between coordinate systems.

use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::{LocationError, LocationResult};

/// A homogeneous 4x4 affine matrix, e.g. the voxel-to-physical mapping of an image.
///
/// # Example
///
/// ```
/// use siibra_locations::Affine;
///
/// let affine = Affine::from_rows([
///     [2.0, 0.0, 0.0, -10.0],
///     [0.0, 2.0, 0.0, -10.0],
///     [0.0, 0.0, 2.0, -10.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ]);
/// assert_eq!(affine.apply([5.0, 5.0, 5.0]), [0.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    matrix: Matrix4<f64>,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Build from row-major nested arrays, the layout image headers use.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let flat: Vec<f64> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self {
            matrix: Matrix4::from_row_slice(&flat),
        }
    }

    /// Isotropic voxel size plus origin offset.
    pub fn scaling_translation(scale: f64, origin: [f64; 3]) -> Self {
        Self::from_rows([
            [scale, 0.0, 0.0, origin[0]],
            [0.0, scale, 0.0, origin[1]],
            [0.0, 0.0, scale, origin[2]],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn inverse(&self) -> LocationResult<Affine> {
        self.matrix
            .try_inverse()
            .map(Affine::from_matrix)
            .ok_or(LocationError::SingularAffine)
    }

    /// Apply to a 3D coordinate and return the dehomogenized result together
    /// with the homogeneous coordinate before division.
    pub fn apply_homogeneous(&self, xyz: [f64; 3]) -> ([f64; 3], f64) {
        let v = self.matrix * Vector4::new(xyz[0], xyz[1], xyz[2], 1.0);
        let h = v[3];
        ([v[0] / h, v[1] / h, v[2] / h], h)
    }

    pub fn apply(&self, xyz: [f64; 3]) -> [f64; 3] {
        self.apply_homogeneous(xyz).0
    }
}

/// Whether a homogeneous coordinate lost its unit scale after a transform.
pub(crate) fn homogeneous_drifted(h: f64) -> bool {
    (h - 1.0).abs() > f64::EPSILON
}
