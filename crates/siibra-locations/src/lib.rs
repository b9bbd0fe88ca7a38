// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# siibra-locations

Geometric primitives defined in a brain reference space.

Every location lives in exactly one reference space (or none, for
temporary entities such as raw voxel grids). Binary operations between
two locations require the same space; mixing spaces is reported as
[`LocationError::IncompatibleSpace`] and never silently coerced. Warping
between spaces is the job of `siibra-warp`.

## Types

- [`Point`]: a single coordinate in mm with an optional uncertainty
- [`PointCloud`]: an ordered set of coordinates with per-point uncertainty
- [`BoundingBox`]: an axis-aligned box, normalized so `min <= max`
- [`WholeBrain`]: "everywhere in this space"
- [`Location`]: the sum type over all of the above
- [`VoxelMask`]: a binary voxel volume with its voxel-to-physical affine

## Mask predicates

Locations are compared against masks by mapping between voxel and
physical coordinates. Points are voxelized with the inverse affine and
rounded to the nearest voxel. Bounding boxes test the physical position
of every nonzero voxel against `min < c <= max` (strict lower bound,
inclusive upper bound), except for degenerate single-point boxes which
behave like a point.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod affine;
mod boundingbox;
mod error;
mod location;
mod mask;
mod point;
mod pointcloud;
mod predicates;
mod space;
mod union;

pub use affine::Affine;
pub use boundingbox::BoundingBox;
pub use error::{LocationError, LocationResult};
pub use location::{Location, LocationKey, LocationKind, WholeBrain};
pub use mask::{from_array_bounds, IndexBounds, VoxelMask};
pub use point::Point;
pub use pointcloud::PointCloud;
pub use space::{ensure_same_space, SpaceId};
pub use union::union;
