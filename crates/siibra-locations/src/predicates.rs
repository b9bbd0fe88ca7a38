// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spatial predicates between locations, and between locations and masks.
//!
//! Every predicate checks spaces first and fails with
//! [`LocationError::IncompatibleSpace`](crate::LocationError) on mismatch.
//! An empty mask neither intersects, contains nor is contained in anything.

use ahash::AHashSet;

use crate::boundingbox::BoundingBox;
use crate::error::LocationResult;
use crate::location::Location;
use crate::mask::VoxelMask;
use crate::pointcloud::PointCloud;
use crate::space::ensure_same_space;

impl Location {
    /// Whether the two locations share at least one position.
    ///
    /// Box boundaries are inclusive, so boxes touching in a face intersect.
    pub fn intersects(&self, other: &Location) -> LocationResult<bool> {
        ensure_same_space(self.space_id(), other.space_id())?;
        Ok(intersects(self, other))
    }

    /// Whether `self` lies entirely within `other`.
    pub fn contained_in(&self, other: &Location) -> LocationResult<bool> {
        ensure_same_space(self.space_id(), other.space_id())?;
        Ok(contained_in(self, other))
    }

    /// Whether `other` lies entirely within `self`.
    pub fn contains(&self, other: &Location) -> LocationResult<bool> {
        other.contained_in(self)
    }

    /// Whether any part of this location hits a nonzero voxel.
    ///
    /// Points are mapped into voxel space and rounded to the nearest voxel.
    /// For boxes, a nonzero voxel counts when its physical position `c`
    /// satisfies `minpoint < c <= maxpoint` on every axis; a degenerate box
    /// is tested like a point.
    pub fn intersects_mask(&self, mask: &VoxelMask) -> LocationResult<bool> {
        ensure_same_space(self.space_id(), mask.space_id())?;
        Ok(match self {
            Location::Point(p) => mask.contains_coordinate(p.coordinate()),
            Location::PointCloud(pc) => pc.coordinates().iter().any(|c| mask.contains_coordinate(*c)),
            Location::BoundingBox(bb) if bb.is_degenerate() => {
                mask.contains_coordinate(bb.minpoint())
            }
            Location::BoundingBox(bb) => mask
                .nonzero_coordinates()
                .any(|c| bb.contains_coordinate_half_open(c)),
            Location::WholeBrain(_) => !mask.is_empty(),
        })
    }

    /// Whether this location lies entirely within the mask.
    pub fn contained_in_mask(&self, mask: &VoxelMask) -> LocationResult<bool> {
        ensure_same_space(self.space_id(), mask.space_id())?;
        Ok(match self {
            Location::Point(p) => mask.contains_coordinate(p.coordinate()),
            Location::PointCloud(pc) => {
                !pc.is_empty() && pc.coordinates().iter().all(|c| mask.contains_coordinate(*c))
            }
            Location::BoundingBox(bb) => box_contained_in_mask(bb, mask),
            Location::WholeBrain(_) => false,
        })
    }

    /// Whether every nonzero voxel of the mask lies within this location.
    pub fn contains_mask(&self, mask: &VoxelMask) -> LocationResult<bool> {
        ensure_same_space(self.space_id(), mask.space_id())?;
        if mask.is_empty() {
            return Ok(false);
        }
        Ok(match self {
            Location::Point(p) => {
                mask.count_nonzero() == 1 && mask.contains_coordinate(p.coordinate())
            }
            Location::PointCloud(pc) => cloud_covers_mask(pc, mask),
            Location::BoundingBox(bb) => mask.nonzero_coordinates().all(|c| bb.contains_coordinate(c)),
            Location::WholeBrain(_) => true,
        })
    }
}

fn intersects(a: &Location, b: &Location) -> bool {
    use Location::*;
    match (a, b) {
        (WholeBrain(_), _) | (_, WholeBrain(_)) => true,
        (Point(p), Point(q)) => p.coordinate() == q.coordinate(),
        (Point(p), PointCloud(pc)) | (PointCloud(pc), Point(p)) => {
            pc.contains_coordinate(p.coordinate())
        }
        (Point(p), BoundingBox(bb)) | (BoundingBox(bb), Point(p)) => {
            bb.contains_coordinate(p.coordinate())
        }
        (PointCloud(a), PointCloud(b)) => a.coordinates().iter().any(|c| b.contains_coordinate(*c)),
        (PointCloud(pc), BoundingBox(bb)) | (BoundingBox(bb), PointCloud(pc)) => {
            pc.coordinates().iter().any(|c| bb.contains_coordinate(*c))
        }
        (BoundingBox(a), BoundingBox(b)) => boxes_touch(a, b),
    }
}

fn contained_in(inner: &Location, outer: &Location) -> bool {
    use Location::*;
    match (inner, outer) {
        (_, WholeBrain(_)) => true,
        (WholeBrain(_), _) => false,
        (Point(p), Point(q)) => p.coordinate() == q.coordinate(),
        (Point(p), PointCloud(pc)) => pc.contains_coordinate(p.coordinate()),
        (Point(p), BoundingBox(bb)) => bb.contains_coordinate(p.coordinate()),
        (PointCloud(pc), _) => {
            !pc.is_empty()
                && pc
                    .points()
                    .all(|p| contained_in(&Location::Point(p), outer))
        }
        (BoundingBox(bb), BoundingBox(other)) => box_within(bb, other),
        (BoundingBox(bb), Point(_) | PointCloud(_)) => {
            bb.is_degenerate() && contained_in(&Location::Point(bb.center()), outer)
        }
    }
}

fn box_within(inner: &BoundingBox, outer: &BoundingBox) -> bool {
    outer.contains_coordinate(inner.minpoint()) && outer.contains_coordinate(inner.maxpoint())
}

fn boxes_touch(a: &BoundingBox, b: &BoundingBox) -> bool {
    let (amin, amax) = (a.minpoint(), a.maxpoint());
    let (bmin, bmax) = (b.minpoint(), b.maxpoint());
    (0..3).all(|i| amin[i] <= bmax[i] && bmin[i] <= amax[i])
}

/// All eight corners must hit the mask, and every voxel whose center lies
/// inside the box must be set.
fn box_contained_in_mask(bb: &BoundingBox, mask: &VoxelMask) -> bool {
    if !bb.corners().coordinates().iter().all(|c| mask.contains_coordinate(*c)) {
        return false;
    }
    mask.voxel_coordinates()
        .filter(|(c, _)| bb.contains_coordinate(*c))
        .all(|(_, set)| set)
}

fn cloud_covers_mask(pc: &PointCloud, mask: &VoxelMask) -> bool {
    let hit: AHashSet<[usize; 3]> = pc
        .coordinates()
        .iter()
        .filter_map(|c| mask.voxel_of(*c))
        .collect();
    mask.nonzero_voxels().all(|v| hit.contains(&v))
}
