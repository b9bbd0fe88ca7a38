// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::space::SpaceId;

/// Result type for location operations
pub type LocationResult<T> = Result<T, LocationError>;

/// Errors raised by geometric operations on locations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum LocationError {
    /// Two locations (or a location and a mask) live in different spaces.
    #[error("incompatible spaces: {} vs {}", display_space(.left), display_space(.right))]
    IncompatibleSpace {
        left: Option<SpaceId>,
        right: Option<SpaceId>,
    },

    /// The operation needs a location that is defined in a reference space.
    #[error("location is not defined in any reference space")]
    MissingSpace,

    /// Per-point sigma values must match the number of coordinates.
    #[error("sigma length {sigma} does not match {coordinates} coordinates")]
    SigmaLengthMismatch { coordinates: usize, sigma: usize },

    /// The operation has no meaning for a cloud without points.
    #[error("point cloud is empty")]
    EmptyPointCloud,

    /// The affine matrix cannot be inverted.
    #[error("affine matrix is singular and cannot be inverted")]
    SingularAffine,
}

fn display_space(space: &Option<SpaceId>) -> String {
    match space {
        Some(id) => id.to_string(),
        None => "<no space>".to_string(),
    }
}
