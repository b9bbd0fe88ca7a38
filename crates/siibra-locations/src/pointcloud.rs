// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::affine::{homogeneous_drifted, Affine};
use crate::boundingbox::BoundingBox;
use crate::error::{LocationError, LocationResult};
use crate::point::Point;
use crate::space::{ensure_same_space, SpaceId};

/// An ordered set of 3D coordinates in one reference space.
///
/// Order is significant: warping and transforming keep index alignment,
/// so labels or vertex ids attached by index stay valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPointCloud")]
pub struct PointCloud {
    coordinates: Vec<[f64; 3]>,
    sigma: Vec<f64>,
    space_id: Option<SpaceId>,
}

#[derive(Deserialize)]
struct RawPointCloud {
    coordinates: Vec<[f64; 3]>,
    #[serde(default)]
    sigma: Option<Vec<f64>>,
    space_id: Option<SpaceId>,
}

impl TryFrom<RawPointCloud> for PointCloud {
    type Error = LocationError;

    fn try_from(raw: RawPointCloud) -> Result<Self, Self::Error> {
        match raw.sigma {
            Some(sigma) => PointCloud::with_sigma(raw.coordinates, sigma, raw.space_id),
            None => Ok(PointCloud::from_coordinates(raw.coordinates, raw.space_id)),
        }
    }
}

impl PointCloud {
    pub fn new(coordinates: Vec<[f64; 3]>, space_id: impl Into<SpaceId>) -> Self {
        Self::from_coordinates(coordinates, Some(space_id.into()))
    }

    pub fn from_coordinates(coordinates: Vec<[f64; 3]>, space_id: Option<SpaceId>) -> Self {
        let sigma = vec![0.0; coordinates.len()];
        Self {
            coordinates,
            sigma,
            space_id,
        }
    }

    pub fn from_point(point: &Point) -> Self {
        Self {
            coordinates: vec![point.coordinate()],
            sigma: vec![point.sigma()],
            space_id: point.space_id().cloned(),
        }
    }

    /// Build with explicit per-point sigma; lengths must match.
    pub fn with_sigma(
        coordinates: Vec<[f64; 3]>,
        sigma: Vec<f64>,
        space_id: Option<SpaceId>,
    ) -> LocationResult<Self> {
        if sigma.len() != coordinates.len() {
            return Err(LocationError::SigmaLengthMismatch {
                coordinates: coordinates.len(),
                sigma: sigma.len(),
            });
        }
        Ok(Self {
            coordinates,
            sigma,
            space_id,
        })
    }

    /// Collect points into a cloud. All points must share one space.
    ///
    /// An empty slice yields an empty, space-less cloud.
    pub fn from_points(points: &[Point]) -> LocationResult<Self> {
        let Some(first) = points.first() else {
            return Ok(Self::from_coordinates(Vec::new(), None));
        };
        let space_id = first.space_id().cloned();
        let mut coordinates = Vec::with_capacity(points.len());
        let mut sigma = Vec::with_capacity(points.len());
        for point in points {
            ensure_same_space(space_id.as_ref(), point.space_id())?;
            coordinates.push(point.coordinate());
            sigma.push(point.sigma());
        }
        Ok(Self {
            coordinates,
            sigma,
            space_id,
        })
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn coordinates(&self) -> &[[f64; 3]] {
        &self.coordinates
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    pub fn space_id(&self) -> Option<&SpaceId> {
        self.space_id.as_ref()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.coordinates.get(index).map(|coordinate| {
            Point::from_parts(*coordinate, self.sigma[index], self.space_id.clone())
        })
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.coordinates
            .iter()
            .zip(&self.sigma)
            .map(|(c, s)| Point::from_parts(*c, *s, self.space_id.clone()))
    }

    pub fn push(&mut self, point: &Point) -> LocationResult<()> {
        ensure_same_space(self.space_id(), point.space_id())?;
        self.coordinates.push(point.coordinate());
        self.sigma.push(point.sigma());
        Ok(())
    }

    pub fn extend(&mut self, other: &PointCloud) -> LocationResult<()> {
        ensure_same_space(self.space_id(), other.space_id())?;
        self.coordinates.extend_from_slice(&other.coordinates);
        self.sigma.extend_from_slice(&other.sigma);
        Ok(())
    }

    /// Replace the coordinates of this cloud, keeping sigma by index.
    ///
    /// Used by warping, where the target coordinates come back in the same
    /// order as the source coordinates.
    pub fn with_coordinates(
        &self,
        coordinates: Vec<[f64; 3]>,
        space_id: Option<SpaceId>,
    ) -> LocationResult<PointCloud> {
        PointCloud::with_sigma(coordinates, self.sigma.clone(), space_id)
    }

    pub fn contains_coordinate(&self, coordinate: [f64; 3]) -> bool {
        self.coordinates.iter().any(|c| *c == coordinate)
    }

    /// Axis-aligned box around all points, `None` for an empty cloud.
    pub fn boundingbox(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self).ok()
    }

    pub fn centroid(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        let n = self.len() as f64;
        let mut sum = [0.0; 3];
        for c in &self.coordinates {
            for i in 0..3 {
                sum[i] += c[i];
            }
        }
        Some(Point::from_parts(
            sum.map(|s| s / n),
            0.0,
            self.space_id.clone(),
        ))
    }

    pub fn transform(&self, affine: &Affine, target_space: Option<SpaceId>) -> PointCloud {
        if self.sigma.iter().any(|s| *s != 0.0) {
            warn!("sigma is not retained when transforming a point cloud");
        }
        let mut drifted = 0usize;
        let coordinates = self
            .coordinates
            .iter()
            .map(|c| {
                let (xyz, h) = affine.apply_homogeneous(*c);
                if homogeneous_drifted(h) {
                    drifted += 1;
                }
                xyz
            })
            .collect();
        if drifted > 0 {
            warn!(count = drifted, "homogeneous coordinate is not one after transform");
        }
        PointCloud::from_coordinates(coordinates, target_space)
    }
}

impl PartialEq for PointCloud {
    fn eq(&self, other: &Self) -> bool {
        self.coordinates == other.coordinates && self.space_id == other.space_id
    }
}

impl fmt::Display for PointCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Set of {} points", self.len())?;
        if let Some(space) = &self.space_id {
            write!(f, " in {}", space)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigma_length_invariant() {
        let err = PointCloud::with_sigma(vec![[0.0; 3], [1.0; 3]], vec![1.0], None).unwrap_err();
        assert_eq!(
            err,
            LocationError::SigmaLengthMismatch {
                coordinates: 2,
                sigma: 1
            }
        );
    }

    #[test]
    fn test_from_points_rejects_mixed_spaces() {
        let points = [
            Point::new([0.0; 3], "mni152"),
            Point::new([1.0; 3], "colin27"),
        ];
        assert!(PointCloud::from_points(&points).is_err());
    }

    #[test]
    fn test_from_points_keeps_sigma() {
        let points = [
            Point::new([0.0; 3], "mni152").with_sigma(1.0),
            Point::new([1.0; 3], "mni152").with_sigma(2.0),
        ];
        let cloud = PointCloud::from_points(&points).unwrap();
        assert_eq!(cloud.sigma(), &[1.0, 2.0]);
        assert_eq!(cloud.get(1).unwrap(), points[1]);
        assert!(cloud.get(2).is_none());
    }

    #[test]
    fn test_boundingbox_and_centroid() {
        let cloud = PointCloud::new(vec![[0.0, 4.0, -1.0], [2.0, 0.0, 1.0]], "mni152");
        let bbox = cloud.boundingbox().unwrap();
        assert_eq!(bbox.minpoint(), [0.0, 0.0, -1.0]);
        assert_eq!(bbox.maxpoint(), [2.0, 4.0, 1.0]);
        assert_eq!(cloud.centroid().unwrap().coordinate(), [1.0, 2.0, 0.0]);

        let empty = PointCloud::from_coordinates(Vec::new(), None);
        assert!(empty.boundingbox().is_none());
        assert!(empty.centroid().is_none());
    }

    #[test]
    fn test_deserialize_validates_sigma() {
        let ok: PointCloud =
            serde_json::from_str(r#"{"coordinates": [[1,2,3]], "space_id": "mni152"}"#).unwrap();
        assert_eq!(ok.sigma(), &[0.0]);
        let bad = serde_json::from_str::<PointCloud>(
            r#"{"coordinates": [[1,2,3]], "sigma": [1, 2], "space_id": null}"#,
        );
        assert!(bad.is_err());
    }
}
