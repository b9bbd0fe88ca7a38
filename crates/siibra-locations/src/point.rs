// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::affine::{homogeneous_drifted, Affine};
use crate::error::LocationResult;
use crate::space::{ensure_same_space, SpaceId};

/// A single 3D point in a reference space, in mm.
///
/// Equality compares coordinate and space; `sigma` is an uncertainty
/// annotation and does not take part in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    coordinate: [f64; 3],
    #[serde(default)]
    sigma: f64,
    space_id: Option<SpaceId>,
}

impl Point {
    pub fn new(coordinate: [f64; 3], space_id: impl Into<SpaceId>) -> Self {
        Self {
            coordinate,
            sigma: 0.0,
            space_id: Some(space_id.into()),
        }
    }

    /// A point outside any reference space, e.g. a voxel index.
    pub fn spaceless(coordinate: [f64; 3]) -> Self {
        Self {
            coordinate,
            sigma: 0.0,
            space_id: None,
        }
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub(crate) fn from_parts(coordinate: [f64; 3], sigma: f64, space_id: Option<SpaceId>) -> Self {
        Self {
            coordinate,
            sigma,
            space_id,
        }
    }

    pub fn coordinate(&self) -> [f64; 3] {
        self.coordinate
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn space_id(&self) -> Option<&SpaceId> {
        self.space_id.as_ref()
    }

    pub fn homogeneous(&self) -> [f64; 4] {
        [self.coordinate[0], self.coordinate[1], self.coordinate[2], 1.0]
    }

    /// Apply an affine and tag the result with `target_space`.
    ///
    /// The caller is responsible for the affine actually mapping into
    /// `target_space`. Sigma is not carried over.
    pub fn transform(&self, affine: &Affine, target_space: Option<SpaceId>) -> Point {
        if self.sigma != 0.0 {
            warn!(sigma = self.sigma, "sigma is not retained when transforming a point");
        }
        let (coordinate, h) = affine.apply_homogeneous(self.coordinate);
        if homogeneous_drifted(h) {
            warn!(h, "homogeneous coordinate is not one after transform");
        }
        Point {
            coordinate,
            sigma: 0.0,
            space_id: target_space,
        }
    }

    /// Offset vector `self - other`, as a point in the same space.
    pub fn checked_sub(&self, other: &Point) -> LocationResult<Point> {
        ensure_same_space(self.space_id(), other.space_id())?;
        Ok(self.map_pairwise(other, |a, b| a - b))
    }

    pub fn checked_add(&self, other: &Point) -> LocationResult<Point> {
        ensure_same_space(self.space_id(), other.space_id())?;
        Ok(self.map_pairwise(other, |a, b| a + b))
    }

    pub fn scaled(&self, factor: f64) -> Point {
        Point {
            coordinate: self.coordinate.map(|c| c * factor),
            sigma: self.sigma,
            space_id: self.space_id.clone(),
        }
    }

    fn map_pairwise(&self, other: &Point, f: impl Fn(f64, f64) -> f64) -> Point {
        Point {
            coordinate: [
                f(self.coordinate[0], other.coordinate[0]),
                f(self.coordinate[1], other.coordinate[1]),
                f(self.coordinate[2], other.coordinate[2]),
            ],
            sigma: 0.0,
            space_id: self.space_id.clone(),
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate && self.space_id == other.space_id
    }
}

impl std::ops::Div<f64> for &Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        self.scaled(1.0 / rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.coordinate;
        write!(f, "Point ({:.2}, {:.2}, {:.2})mm", x, y, z)?;
        if let Some(space) = &self.space_id {
            write!(f, " in {}", space)?;
        }
        Ok(())
    }
}
