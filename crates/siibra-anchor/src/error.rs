// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use siibra_locations::LocationError;
use siibra_regions::RegionError;
use siibra_warp::WarpError;

/// Result type for anchoring and assignment
pub type AnchorResult<T> = Result<T, AnchorError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum AnchorError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Warp(#[from] WarpError),

    #[error(transparent)]
    Region(#[from] RegionError),

    /// `origin` is the file path, or `<inline>` for tables parsed from text.
    #[error("invalid alias table {origin}: {reason}")]
    InvalidAliasTable { origin: String, reason: String },
}
