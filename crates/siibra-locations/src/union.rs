// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::LocationResult;
use crate::location::Location;
use crate::pointcloud::PointCloud;
use crate::space::ensure_same_space;

/// Union of two locations in the same space.
///
/// | left \ right | Point      | PointCloud | BoundingBox |
/// |--------------|------------|------------|-------------|
/// | Point        | PointCloud | PointCloud | BoundingBox |
/// | PointCloud   | PointCloud | PointCloud | BoundingBox |
/// | BoundingBox  | BoundingBox| BoundingBox| BoundingBox |
///
/// Clouds keep argument order. Anything combined with a box yields the box
/// enclosing the corners of both operands. The whole brain absorbs any
/// other location, and a location united with itself is returned unchanged.
pub fn union(a: &Location, b: &Location) -> LocationResult<Location> {
    ensure_same_space(a.space_id(), b.space_id())?;
    if a == b {
        return Ok(a.clone());
    }
    use Location::*;
    let merged = match (a, b) {
        (WholeBrain(wb), _) | (_, WholeBrain(wb)) => WholeBrain(wb.clone()),
        (BoundingBox(_), _) | (_, BoundingBox(_)) => {
            let mut corners = as_cloud(a);
            corners.extend(&as_cloud(b))?;
            BoundingBox(crate::boundingbox::BoundingBox::enclosing(&corners)?)
        }
        _ => {
            let mut cloud = as_cloud(a);
            cloud.extend(&as_cloud(b))?;
            PointCloud(cloud)
        }
    };
    Ok(merged)
}

impl Location {
    pub fn union(&self, other: &Location) -> LocationResult<Location> {
        union(self, other)
    }
}

fn as_cloud(location: &Location) -> PointCloud {
    match location {
        Location::Point(p) => PointCloud::from_point(p),
        Location::PointCloud(pc) => pc.clone(),
        Location::BoundingBox(bb) => bb.corners(),
        Location::WholeBrain(wb) => PointCloud::from_coordinates(Vec::new(), wb.space_id().cloned()),
    }
}
