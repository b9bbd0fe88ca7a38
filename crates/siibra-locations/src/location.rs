// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::affine::Affine;
use crate::boundingbox::BoundingBox;
use crate::error::{LocationError, LocationResult};
use crate::point::Point;
use crate::pointcloud::PointCloud;
use crate::space::SpaceId;

/// "Everywhere in this space": a location without geometric extent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WholeBrain {
    space_id: Option<SpaceId>,
}

impl WholeBrain {
    pub fn new(space_id: impl Into<SpaceId>) -> Self {
        Self {
            space_id: Some(space_id.into()),
        }
    }

    pub fn space_id(&self) -> Option<&SpaceId> {
        self.space_id.as_ref()
    }
}

impl fmt::Display for WholeBrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.space_id {
            Some(space) => write!(f, "Whole brain in {}", space),
            None => f.write_str("Whole brain"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationKind {
    Point,
    PointCloud,
    BoundingBox,
    WholeBrain,
}

impl LocationKind {
    pub const ALL: [LocationKind; 4] = [
        LocationKind::Point,
        LocationKind::PointCloud,
        LocationKind::BoundingBox,
        LocationKind::WholeBrain,
    ];
}

/// A geometric location in exactly one reference space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Location {
    Point(Point),
    PointCloud(PointCloud),
    BoundingBox(BoundingBox),
    WholeBrain(WholeBrain),
}

impl Location {
    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Point(_) => LocationKind::Point,
            Location::PointCloud(_) => LocationKind::PointCloud,
            Location::BoundingBox(_) => LocationKind::BoundingBox,
            Location::WholeBrain(_) => LocationKind::WholeBrain,
        }
    }

    pub fn space_id(&self) -> Option<&SpaceId> {
        match self {
            Location::Point(p) => p.space_id(),
            Location::PointCloud(pc) => pc.space_id(),
            Location::BoundingBox(bb) => bb.space_id(),
            Location::WholeBrain(wb) => wb.space_id(),
        }
    }

    /// The space of this location, or [`LocationError::MissingSpace`].
    pub fn require_space(&self) -> LocationResult<&SpaceId> {
        self.space_id().ok_or(LocationError::MissingSpace)
    }

    /// Enclosing box. `None` for the whole brain and for empty clouds.
    pub fn boundingbox(&self) -> Option<BoundingBox> {
        match self {
            Location::Point(p) => Some(BoundingBox::from_corners(
                p.coordinate(),
                p.coordinate(),
                p.space_id().cloned(),
            )),
            Location::PointCloud(pc) => pc.boundingbox(),
            Location::BoundingBox(bb) => Some(bb.clone()),
            Location::WholeBrain(_) => None,
        }
    }

    /// Apply an affine to all coordinates and retag with `target_space`.
    pub fn transform(&self, affine: &Affine, target_space: Option<SpaceId>) -> Location {
        match self {
            Location::Point(p) => Location::Point(p.transform(affine, target_space)),
            Location::PointCloud(pc) => Location::PointCloud(pc.transform(affine, target_space)),
            Location::BoundingBox(bb) => Location::BoundingBox(bb.transform(affine, target_space)),
            Location::WholeBrain(_) => Location::WholeBrain(WholeBrain {
                space_id: target_space,
            }),
        }
    }

    /// Hashable identity used to memoize comparisons.
    pub fn key(&self) -> LocationKey {
        let coordinates: Vec<[f64; 3]> = match self {
            Location::Point(p) => vec![p.coordinate()],
            Location::PointCloud(pc) => pc.coordinates().to_vec(),
            Location::BoundingBox(bb) => vec![bb.minpoint(), bb.maxpoint()],
            Location::WholeBrain(_) => Vec::new(),
        };
        LocationKey {
            kind: self.kind(),
            space_id: self.space_id().cloned(),
            bits: coordinates
                .iter()
                .flat_map(|c| c.iter().map(|v| canonical_bits(*v)))
                .collect(),
        }
    }
}

/// Bit pattern with `-0.0` folded onto `0.0`.
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Equality key of a [`Location`]: kind, space and exact coordinate bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    kind: LocationKind,
    space_id: Option<SpaceId>,
    bits: Vec<u64>,
}

impl PartialEq for Location {
    /// Geometric equality. A one-point cloud equals that point, and a
    /// degenerate box equals the point at its corner.
    fn eq(&self, other: &Self) -> bool {
        use Location::*;
        match (self, other) {
            (Point(a), Point(b)) => a == b,
            (PointCloud(a), PointCloud(b)) => a == b,
            (BoundingBox(a), BoundingBox(b)) => a == b,
            (WholeBrain(a), WholeBrain(b)) => a == b,
            (Point(p), PointCloud(pc)) | (PointCloud(pc), Point(p)) => {
                pc.len() == 1 && pc.get(0).as_ref() == Some(p)
            }
            (Point(p), BoundingBox(bb)) | (BoundingBox(bb), Point(p)) => {
                bb.is_degenerate()
                    && bb.space_id() == p.space_id()
                    && bb.minpoint() == p.coordinate()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Point(p) => p.fmt(f),
            Location::PointCloud(pc) => pc.fmt(f),
            Location::BoundingBox(bb) => bb.fmt(f),
            Location::WholeBrain(wb) => wb.fmt(f),
        }
    }
}

impl From<Point> for Location {
    fn from(value: Point) -> Self {
        Location::Point(value)
    }
}

impl From<PointCloud> for Location {
    fn from(value: PointCloud) -> Self {
        Location::PointCloud(value)
    }
}

impl From<BoundingBox> for Location {
    fn from(value: BoundingBox) -> Self {
        Location::BoundingBox(value)
    }
}

impl From<WholeBrain> for Location {
    fn from(value: WholeBrain) -> Self {
        Location::WholeBrain(value)
    }
}
