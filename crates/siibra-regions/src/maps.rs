// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parcellation maps and region mask construction.

use ahash::{AHashMap, AHashSet};
use ndarray::Array3;
use siibra_locations::{Affine, Point, SpaceId, VoxelMask};
use tracing::{debug, warn};

use crate::error::{RegionError, RegionResult};
use crate::parcellation::Parcellation;
use crate::region::Region;
use crate::space::{MapType, Space};

/// Source of binary region masks for one parcellation.
pub trait MaskProvider: Send + Sync {
    /// Spaces this provider has maps for, in preference order.
    fn supported_spaces(&self) -> Vec<Space>;

    /// `Ok(None)` when the region has no voxels in `space` or the space or
    /// map type is not covered.
    fn build_mask(&self, region: &Region, space: &SpaceId, maptype: MapType) -> RegionResult<Option<VoxelMask>>;
}

/// A labelled volume: one integer label per voxel, 0 is background.
#[derive(Debug, Clone)]
pub struct LabelledVolume {
    labels: Array3<u32>,
    affine: Affine,
}

impl LabelledVolume {
    pub fn new(labels: Array3<u32>, affine: Affine) -> RegionResult<Self> {
        affine.inverse()?;
        Ok(Self { labels, affine })
    }

    pub fn labels(&self) -> &Array3<u32> {
        &self.labels
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }
}

/// Labelled maps of one parcellation in one or more spaces.
///
/// A region's mask is the union of the labels of its whole subtree.
#[derive(Debug, Clone, Default)]
pub struct LabelledMap {
    volumes: Vec<(Space, LabelledVolume)>,
}

impl LabelledMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(mut self, space: Space, labels: Array3<u32>, affine: Affine) -> RegionResult<Self> {
        let volume = LabelledVolume::new(labels, affine)?;
        self.volumes.retain(|(s, _)| s.id != space.id);
        self.volumes.push((space, volume));
        Ok(self)
    }

    pub fn volume(&self, space: &SpaceId) -> Option<&LabelledVolume> {
        self.volumes.iter().find(|(s, _)| &s.id == space).map(|(_, v)| v)
    }

    /// Physical centroid of every labelled region of `parcellation`.
    ///
    /// Regions whose label has no voxels in the volume are skipped with a
    /// warning. Results are in pre-order of the region tree.
    pub fn compute_centroids(&self, parcellation: &Parcellation, space: &SpaceId) -> RegionResult<Vec<(Region, Point)>> {
        let volume = self
            .volume(space)
            .ok_or_else(|| RegionError::UnknownSpace(space.clone()))?;

        let mut sums: AHashMap<u32, ([f64; 3], usize)> = AHashMap::new();
        for ((i, j, k), &label) in volume.labels.indexed_iter() {
            if label == 0 {
                continue;
            }
            let entry = sums.entry(label).or_insert(([0.0; 3], 0));
            entry.0[0] += i as f64;
            entry.0[1] += j as f64;
            entry.0[2] += k as f64;
            entry.1 += 1;
        }

        let mut centroids = Vec::new();
        for region in parcellation.regions() {
            let Some(label) = region.label() else {
                continue;
            };
            match sums.get(&label) {
                Some((sum, count)) => {
                    let n = *count as f64;
                    let voxel = [sum[0] / n, sum[1] / n, sum[2] / n];
                    let point = Point::new(volume.affine.apply(voxel), space.clone());
                    centroids.push((region, point));
                }
                None => warn!(region = region.name(), label, %space, "label has no voxels, skipping centroid"),
            }
        }
        Ok(centroids)
    }
}

impl MaskProvider for LabelledMap {
    fn supported_spaces(&self) -> Vec<Space> {
        self.volumes.iter().map(|(s, _)| s.clone()).collect()
    }

    fn build_mask(&self, region: &Region, space: &SpaceId, maptype: MapType) -> RegionResult<Option<VoxelMask>> {
        if maptype != MapType::Labelled {
            debug!(%maptype, "labelled map cannot provide this map type");
            return Ok(None);
        }
        let Some(volume) = self.volume(space) else {
            return Ok(None);
        };

        let labels: AHashSet<u32> = region.iter().filter_map(|r| r.label()).collect();
        if labels.is_empty() {
            debug!(region = region.name(), "no labels in subtree");
            return Ok(None);
        }

        let mask = VoxelMask::from_predicate(
            volume.labels.view(),
            volume.affine,
            Some(space.clone()),
            |v| labels.contains(v),
        )?;
        if mask.is_empty() {
            debug!(region = region.name(), %space, "region has no voxels in this space");
            return Ok(None);
        }
        Ok(Some(mask))
    }
}
