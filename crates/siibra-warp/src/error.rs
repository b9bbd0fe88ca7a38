// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use siibra_locations::{LocationError, SpaceId};

/// Result type for warp operations
pub type WarpResult<T> = Result<T, WarpError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum WarpError {
    /// The space is not known to the warp service; rejected before any request.
    #[error("space '{space}' is not supported by the warp service")]
    UnsupportedSpace { space: SpaceId },

    #[error("warping from '{source_space}' to '{target_space}' failed: {reason}")]
    WarpingFailed {
        source_space: SpaceId,
        target_space: SpaceId,
        reason: String,
    },

    #[error("warp service request failed: {0}")]
    Transport(String),

    #[error("invalid warp service response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Location(#[from] LocationError),
}

impl WarpError {
    /// Fold transport level failures into [`WarpError::WarpingFailed`] for a space pair.
    pub(crate) fn for_pair(self, source: &SpaceId, target: &SpaceId) -> WarpError {
        match self {
            WarpError::Transport(reason) | WarpError::InvalidResponse(reason) => {
                WarpError::WarpingFailed {
                    source_space: source.clone(),
                    target_space: target.clone(),
                    reason,
                }
            }
            other => other,
        }
    }
}

impl From<reqwest::Error> for WarpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WarpError::InvalidResponse(err.to_string())
        } else {
            WarpError::Transport(err.to_string())
        }
    }
}
