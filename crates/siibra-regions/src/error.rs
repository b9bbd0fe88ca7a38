// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use siibra_locations::{LocationError, SpaceId};

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum RegionError {
    #[error("invalid region specification '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },

    /// A lookup that needed exactly one region found none or several.
    #[error("region specification '{spec}' {reason}")]
    Resolution { spec: String, reason: String },

    #[error("unknown reference space '{0}'")]
    UnknownSpace(SpaceId),

    #[error("region '{name}' already exists under '{parent}'")]
    DuplicateRegion { name: String, parent: String },

    #[error("parent node {index} does not exist")]
    UnknownParent { index: usize },

    #[error(transparent)]
    Location(#[from] LocationError),
}
