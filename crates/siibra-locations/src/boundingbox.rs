// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::affine::Affine;
use crate::error::{LocationError, LocationResult};
use crate::mask::VoxelMask;
use crate::point::Point;
use crate::pointcloud::PointCloud;
use crate::space::{ensure_same_space, SpaceId};

/// Axis-aligned box spanned by two corner points.
///
/// Corners are normalized on construction so that `minpoint[i] <= maxpoint[i]`
/// holds on every axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBoundingBox")]
pub struct BoundingBox {
    minpoint: [f64; 3],
    maxpoint: [f64; 3],
    space_id: Option<SpaceId>,
}

#[derive(Deserialize)]
struct RawBoundingBox {
    minpoint: [f64; 3],
    maxpoint: [f64; 3],
    space_id: Option<SpaceId>,
}

impl From<RawBoundingBox> for BoundingBox {
    fn from(raw: RawBoundingBox) -> Self {
        BoundingBox::from_corners(raw.minpoint, raw.maxpoint, raw.space_id)
    }
}

impl BoundingBox {
    pub fn new(a: [f64; 3], b: [f64; 3], space_id: impl Into<SpaceId>) -> Self {
        Self::from_corners(a, b, Some(space_id.into()))
    }

    /// Build from any two opposite corners.
    pub fn from_corners(a: [f64; 3], b: [f64; 3], space_id: Option<SpaceId>) -> Self {
        let mut minpoint = [0.0; 3];
        let mut maxpoint = [0.0; 3];
        for i in 0..3 {
            minpoint[i] = a[i].min(b[i]);
            maxpoint[i] = a[i].max(b[i]);
        }
        Self {
            minpoint,
            maxpoint,
            space_id,
        }
    }

    /// Smallest box enclosing every point of the cloud.
    pub fn enclosing(cloud: &PointCloud) -> LocationResult<Self> {
        let coordinates = cloud.coordinates();
        let first = *coordinates.first().ok_or(LocationError::EmptyPointCloud)?;
        let (lo, hi) = coordinates
            .iter()
            .fold((first, first), |(mut lo, mut hi), c| {
                for i in 0..3 {
                    lo[i] = lo[i].min(c[i]);
                    hi[i] = hi[i].max(c[i]);
                }
                (lo, hi)
            });
        Ok(Self::from_corners(lo, hi, cloud.space_id().cloned()))
    }

    /// Physical extent of the nonzero voxels of a mask, `None` if the mask is empty.
    ///
    /// The index bounds are exclusive on the upper side, so the box covers
    /// the full extent of the outermost voxels.
    pub fn from_mask(mask: &VoxelMask) -> Option<Self> {
        let bounds = mask.bounds()?;
        let lo = bounds.min.map(|v| v as f64);
        let hi = bounds.max.map(|v| v as f64);
        Some(Self::from_corners(
            mask.affine().apply(lo),
            mask.affine().apply(hi),
            mask.space_id().cloned(),
        ))
    }

    pub fn minpoint(&self) -> [f64; 3] {
        self.minpoint
    }

    pub fn maxpoint(&self) -> [f64; 3] {
        self.maxpoint
    }

    pub fn space_id(&self) -> Option<&SpaceId> {
        self.space_id.as_ref()
    }

    pub fn shape(&self) -> [f64; 3] {
        [
            self.maxpoint[0] - self.minpoint[0],
            self.maxpoint[1] - self.minpoint[1],
            self.maxpoint[2] - self.minpoint[2],
        ]
    }

    pub fn volume(&self) -> f64 {
        self.shape().iter().product()
    }

    /// True when both corners coincide, i.e. the box is a single point.
    pub fn is_degenerate(&self) -> bool {
        self.minpoint == self.maxpoint
    }

    /// True when at least one axis has zero extent.
    pub fn is_flat(&self) -> bool {
        self.shape().iter().any(|extent| *extent == 0.0)
    }

    pub fn center(&self) -> Point {
        let mut c = [0.0; 3];
        for (i, v) in c.iter_mut().enumerate() {
            *v = (self.minpoint[i] + self.maxpoint[i]) / 2.0;
        }
        Point::from_parts(c, 0.0, self.space_id.clone())
    }

    /// The eight corner points, with duplicates for flat boxes.
    pub fn corners(&self) -> PointCloud {
        let (lo, hi) = (self.minpoint, self.maxpoint);
        let mut coordinates = Vec::with_capacity(8);
        for x in [lo[0], hi[0]] {
            for y in [lo[1], hi[1]] {
                for z in [lo[2], hi[2]] {
                    coordinates.push([x, y, z]);
                }
            }
        }
        PointCloud::from_coordinates(coordinates, self.space_id.clone())
    }

    /// Inclusive on both boundaries.
    pub fn contains_coordinate(&self, coordinate: [f64; 3]) -> bool {
        (0..3).all(|i| self.minpoint[i] <= coordinate[i] && coordinate[i] <= self.maxpoint[i])
    }

    /// Lower boundary exclusive, upper boundary inclusive.
    ///
    /// This is the convention for testing mask voxels against a box.
    pub fn contains_coordinate_half_open(&self, coordinate: [f64; 3]) -> bool {
        (0..3).all(|i| self.minpoint[i] < coordinate[i] && coordinate[i] <= self.maxpoint[i])
    }

    /// Intersection of two boxes; `None` if they do not touch.
    ///
    /// Boxes that share only a face, edge or corner yield a flat box.
    pub fn intersection(&self, other: &BoundingBox) -> LocationResult<Option<BoundingBox>> {
        ensure_same_space(self.space_id(), other.space_id())?;
        let mut lo = [0.0; 3];
        let mut hi = [0.0; 3];
        for i in 0..3 {
            lo[i] = self.minpoint[i].max(other.minpoint[i]);
            hi[i] = self.maxpoint[i].min(other.maxpoint[i]);
            if lo[i] > hi[i] {
                return Ok(None);
            }
        }
        Ok(Some(BoundingBox {
            minpoint: lo,
            maxpoint: hi,
            space_id: self.space_id.clone(),
        }))
    }

    /// Transform all eight corners and take their enclosing box.
    pub fn transform(&self, affine: &Affine, target_space: Option<SpaceId>) -> BoundingBox {
        let corners = self.corners().transform(affine, target_space.clone());
        match BoundingBox::enclosing(&corners) {
            Ok(bbox) => bbox,
            // corners() always yields eight points
            Err(_) => BoundingBox::from_corners(self.minpoint, self.maxpoint, target_space),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.minpoint;
        let [x, y, z] = self.maxpoint;
        write!(
            f,
            "Bounding box from ({:.2}, {:.2}, {:.2})mm to ({:.2}, {:.2}, {:.2})mm",
            a, b, c, x, y, z
        )?;
        if let Some(space) = &self.space_id {
            write!(f, " in {}", space)?;
        }
        Ok(())
    }
}
