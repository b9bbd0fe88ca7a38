// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Binary voxel masks with a voxel-to-physical affine.

use ndarray::{Array3, ArrayView3};

use crate::affine::Affine;
use crate::error::LocationResult;
use crate::space::SpaceId;

/// Index-space bounds of the nonzero entries of a 3D array.
///
/// `min` is inclusive, `max` is exclusive (last nonzero index + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBounds {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl IndexBounds {
    pub fn shape(&self) -> [usize; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Bounds of all entries that differ from `T::default()`.
///
/// Returns `None` when the array has no such entry.
pub fn from_array_bounds<T>(array: ArrayView3<'_, T>) -> Option<IndexBounds>
where
    T: Default + PartialEq,
{
    let zero = T::default();
    let mut bounds: Option<IndexBounds> = None;
    for ((i, j, k), value) in array.indexed_iter() {
        if *value == zero {
            continue;
        }
        let idx = [i, j, k];
        match bounds.as_mut() {
            None => {
                bounds = Some(IndexBounds {
                    min: idx,
                    max: idx.map(|v| v + 1),
                })
            }
            Some(b) => {
                for axis in 0..3 {
                    b.min[axis] = b.min[axis].min(idx[axis]);
                    b.max[axis] = b.max[axis].max(idx[axis] + 1);
                }
            }
        }
    }
    bounds
}

/// A binary volume in a reference space.
///
/// The inverse affine is computed once on construction, so a singular
/// affine is rejected up front instead of on the first point lookup.
#[derive(Debug, Clone)]
pub struct VoxelMask {
    data: Array3<bool>,
    affine: Affine,
    inverse: Affine,
    space_id: Option<SpaceId>,
}

impl VoxelMask {
    pub fn new(data: Array3<bool>, affine: Affine, space_id: Option<SpaceId>) -> LocationResult<Self> {
        let inverse = affine.inverse()?;
        Ok(Self {
            data,
            affine,
            inverse,
            space_id,
        })
    }

    /// Mask of all voxels of `values` for which `predicate` holds.
    pub fn from_predicate<T>(
        values: ArrayView3<'_, T>,
        affine: Affine,
        space_id: Option<SpaceId>,
        predicate: impl Fn(&T) -> bool,
    ) -> LocationResult<Self> {
        Self::new(values.map(predicate), affine, space_id)
    }

    pub fn data(&self) -> &Array3<bool> {
        &self.data
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    pub fn space_id(&self) -> Option<&SpaceId> {
        self.space_id.as_ref()
    }

    pub fn shape(&self) -> [usize; 3] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|v| **v).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|v| *v)
    }

    pub fn bounds(&self) -> Option<IndexBounds> {
        from_array_bounds(self.data.view())
    }

    /// Voxel index of a physical coordinate, rounded to the nearest voxel.
    ///
    /// `None` if the coordinate falls outside the volume.
    pub fn voxel_of(&self, coordinate: [f64; 3]) -> Option<[usize; 3]> {
        let voxel = self.inverse.apply(coordinate);
        let shape = self.shape();
        let mut index = [0usize; 3];
        for axis in 0..3 {
            let v = voxel[axis].round();
            if !v.is_finite() || v < 0.0 || v >= shape[axis] as f64 {
                return None;
            }
            index[axis] = v as usize;
        }
        Some(index)
    }

    pub fn is_set(&self, index: [usize; 3]) -> bool {
        self.data.get(index).copied().unwrap_or(false)
    }

    /// Whether the voxel nearest to `coordinate` is part of the mask.
    pub fn contains_coordinate(&self, coordinate: [f64; 3]) -> bool {
        self.voxel_of(coordinate).is_some_and(|index| self.is_set(index))
    }

    pub fn nonzero_voxels(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.data
            .indexed_iter()
            .filter(|(_, v)| **v)
            .map(|((i, j, k), _)| [i, j, k])
    }

    /// Physical coordinates of all nonzero voxel centers.
    pub fn nonzero_coordinates(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.nonzero_voxels()
            .map(|[i, j, k]| self.affine.apply([i as f64, j as f64, k as f64]))
    }

    /// Physical coordinates of every voxel center together with its value.
    pub(crate) fn voxel_coordinates(&self) -> impl Iterator<Item = ([f64; 3], bool)> + '_ {
        self.data
            .indexed_iter()
            .map(|((i, j, k), v)| (self.affine.apply([i as f64, j as f64, k as f64]), *v))
    }
}
