// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Spatial Predicate Tests
//!
//! Location-to-location and location-to-mask predicates:
//! - flat slabs touching in a plane intersect
//! - disjoint boxes do not
//! - point voxelization and the half-open box convention against masks
//! - self-union is the identity for every location kind

use ndarray::Array3;
use proptest::prelude::*;
use siibra_locations::{
    union, Affine, BoundingBox, Location, LocationError, Point, PointCloud, SpaceId, VoxelMask,
    WholeBrain,
};

const SPACE: &str = "mni152";

/// 10x10x10 mask at 1mm, origin at the first voxel, with a 3x3x3 block set at 4..7
fn block_mask() -> VoxelMask {
    let mut data = Array3::from_elem((10, 10, 10), false);
    for i in 4..7 {
        for j in 4..7 {
            for k in 4..7 {
                data[[i, j, k]] = true;
            }
        }
    }
    VoxelMask::new(data, Affine::identity(), Some(SpaceId::from(SPACE))).expect("identity affine")
}

fn bbox(a: [f64; 3], b: [f64; 3]) -> Location {
    Location::from(BoundingBox::new(a, b, SPACE))
}

fn point(xyz: [f64; 3]) -> Location {
    Location::from(Point::new(xyz, SPACE))
}

// ═══════════════════════════════════════════════════════════
// Location vs location
// ═══════════════════════════════════════════════════════════

#[test]
fn test_perpendicular_flat_slabs_intersect_in_shared_plane() {
    let horizontal = bbox([0.0, 0.0, 5.0], [10.0, 10.0, 5.0]);
    let vertical = bbox([5.0, 0.0, 0.0], [5.0, 10.0, 10.0]);

    assert!(horizontal.intersects(&vertical).unwrap());
    assert!(!horizontal.contained_in(&vertical).unwrap());
    assert!(!vertical.contained_in(&horizontal).unwrap());
}

#[test]
fn test_disjoint_boxes_do_not_intersect() {
    let a = bbox([0.0; 3], [1.0; 3]);
    let b = bbox([2.0; 3], [3.0; 3]);
    assert!(!a.intersects(&b).unwrap());
    assert!(!a.contains(&b).unwrap());
}

#[test]
fn test_nested_boxes() {
    let outer = bbox([0.0; 3], [10.0; 3]);
    let inner = bbox([2.0; 3], [3.0; 3]);
    assert!(inner.contained_in(&outer).unwrap());
    assert!(outer.contains(&inner).unwrap());
    assert!(!outer.contained_in(&inner).unwrap());
}

#[test]
fn test_point_cloud_containment() {
    let cloud = Location::from(PointCloud::new(vec![[1.0; 3], [2.0; 3]], SPACE));
    assert!(cloud.contained_in(&bbox([0.0; 3], [2.0; 3])).unwrap());
    assert!(!cloud.contained_in(&bbox([0.0; 3], [1.5; 3])).unwrap());
    assert!(cloud.intersects(&bbox([0.0; 3], [1.5; 3])).unwrap());
    assert!(point([2.0; 3]).contained_in(&cloud).unwrap());
}

#[test]
fn test_whole_brain_relations() {
    let wb = Location::from(WholeBrain::new(SPACE));
    let p = point([1.0, 2.0, 3.0]);
    assert!(p.contained_in(&wb).unwrap());
    assert!(wb.contains(&p).unwrap());
    assert!(wb.intersects(&p).unwrap());
    assert!(!wb.contained_in(&p).unwrap());
}

#[test]
fn test_space_mismatch_is_an_error() {
    let a = point([0.0; 3]);
    let b = Location::from(Point::new([0.0; 3], "colin27"));
    assert!(matches!(
        a.intersects(&b),
        Err(LocationError::IncompatibleSpace { .. })
    ));
}

// ═══════════════════════════════════════════════════════════
// Location vs mask
// ═══════════════════════════════════════════════════════════

#[test]
fn test_point_inside_and_outside_mask() {
    let mask = block_mask();
    assert!(point([5.0, 5.0, 5.0]).intersects_mask(&mask).unwrap());
    assert!(point([5.0, 5.0, 5.0]).contained_in_mask(&mask).unwrap());
    // rounds to voxel (6, 6, 6)
    assert!(point([6.4, 5.6, 6.2]).intersects_mask(&mask).unwrap());
    assert!(!point([1.0, 1.0, 1.0]).intersects_mask(&mask).unwrap());
    assert!(!point([-50.0, 5.0, 5.0]).intersects_mask(&mask).unwrap());
}

#[test]
fn test_box_mask_lower_bound_is_exclusive() {
    let mask = block_mask();
    // upper bound touches the first set voxel: counts
    assert!(bbox([0.0; 3], [4.0; 3]).intersects_mask(&mask).unwrap());
    // lower bound touches the last set voxel: does not count
    assert!(!bbox([6.0; 3], [9.0; 3]).intersects_mask(&mask).unwrap());
}

#[test]
fn test_degenerate_box_behaves_like_point() {
    let mask = block_mask();
    let inside = BoundingBox::new([5.0; 3], [5.0; 3], SPACE);
    assert_eq!(inside.volume(), 0.0);
    assert!(Location::from(inside).intersects_mask(&mask).unwrap());
    // a half-open test would reject this box even though its point is set
    let on_voxel = bbox([4.0; 3], [4.0; 3]);
    assert!(on_voxel.intersects_mask(&mask).unwrap());
    assert!(!bbox([0.0; 3], [0.0; 3]).intersects_mask(&mask).unwrap());
}

#[test]
fn test_box_containment_against_mask() {
    let mask = block_mask();
    assert!(bbox([4.0; 3], [6.0; 3]).contained_in_mask(&mask).unwrap());
    assert!(!bbox([3.0; 3], [6.0; 3]).contained_in_mask(&mask).unwrap());
    assert!(bbox([3.0; 3], [7.0; 3]).contains_mask(&mask).unwrap());
    assert!(!bbox([5.0; 3], [7.0; 3]).contains_mask(&mask).unwrap());
}

#[test]
fn test_empty_mask_matches_nothing() {
    let empty = VoxelMask::new(
        Array3::from_elem((4, 4, 4), false),
        Affine::identity(),
        Some(SpaceId::from(SPACE)),
    )
    .unwrap();
    let wb = Location::from(WholeBrain::new(SPACE));
    assert!(!wb.intersects_mask(&empty).unwrap());
    assert!(!wb.contains_mask(&empty).unwrap());
    assert!(!point([1.0; 3]).contained_in_mask(&empty).unwrap());
}

#[test]
fn test_mask_space_mismatch_is_an_error() {
    let mask = block_mask();
    let p = Location::from(Point::new([5.0; 3], "colin27"));
    assert!(p.intersects_mask(&mask).is_err());
}

#[test]
fn test_box_from_mask_round_trip() {
    let mask = block_mask();
    let extent = BoundingBox::from_mask(&mask).unwrap();
    assert_eq!(extent.minpoint(), [4.0; 3]);
    assert_eq!(extent.maxpoint(), [7.0; 3]);
    assert!(Location::from(extent).contains_mask(&mask).unwrap());
}

// ═══════════════════════════════════════════════════════════
// Self-union
// ═══════════════════════════════════════════════════════════

fn coordinate() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-100.0f64..100.0)
}

proptest! {
    #[test]
    fn prop_point_self_union_is_identity(c in coordinate()) {
        let p = point(c);
        prop_assert_eq!(union(&p, &p).unwrap(), p);
    }

    #[test]
    fn prop_cloud_self_union_is_identity(coords in prop::collection::vec(coordinate(), 1..20)) {
        let cloud = Location::from(PointCloud::new(coords, SPACE));
        prop_assert_eq!(union(&cloud, &cloud).unwrap(), cloud);
    }

    #[test]
    fn prop_box_self_union_is_identity(a in coordinate(), b in coordinate()) {
        let bb = bbox(a, b);
        prop_assert_eq!(union(&bb, &bb).unwrap(), bb);
    }

    #[test]
    fn prop_union_contains_both_operands(a in coordinate(), b in coordinate(), c in coordinate()) {
        let left = bbox(a, b);
        let right = point(c);
        let merged = union(&left, &right).unwrap();
        prop_assert!(left.contained_in(&merged).unwrap());
        prop_assert!(right.contained_in(&merged).unwrap());
    }
}
