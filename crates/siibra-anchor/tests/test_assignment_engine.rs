// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Assignment Engine Tests
//!
//! Pairwise qualification of regions and locations, memoization, mask
//! caching and batch assignment.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::{colin, fixture, mni, single_voxel_fixture, HUMAN, RAT};
use siibra_anchor::{AnchorError, AssignedStructure, Qualification};
use siibra_locations::{BoundingBox, Location, LocationError, Point};
use siibra_regions::RegionError;

fn mni_point(c: [f64; 3]) -> Location {
    Location::from(Point::new(c, mni()))
}

fn mni_box(min: [f64; 3], max: [f64; 3]) -> Location {
    Location::from(BoundingBox::new(min, max, mni()))
}

fn species(name: &str) -> BTreeSet<String> {
    BTreeSet::from([name.to_string()])
}

// ═══════════════════════════════════════════════════════════════
// Region vs region
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_every_region_matches_itself_exactly() {
    let fx = fixture();
    for region in fx.human.regions() {
        let result = fx.engine.match_regions(&region, &region).expect("self match");
        assert_eq!(result.qualification, Qualification::Exact);
        assert_eq!(result.assigned_structure, AssignedStructure::Region(region.clone()));
    }
}

#[test]
fn test_region_hierarchy_qualifications() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let lobe = fx.region("occipital cortex");
    let sibling = fx.region("hoc1 right");

    let down = fx.engine.match_regions(&leaf, &lobe).unwrap();
    assert_eq!(down.qualification, Qualification::Contained);
    assert_eq!(down.assigned_structure, AssignedStructure::Region(lobe.clone()));

    assert_eq!(
        fx.engine.match_regions(&lobe, &leaf).unwrap().qualification,
        Qualification::Contains
    );
    assert!(fx.engine.match_regions(&leaf, &sibling).is_none());

    let rat_v1 = fx.rat.get_region("primary visual").unwrap();
    assert!(fx.engine.match_regions(&leaf, &rat_v1).is_none());
}

#[test]
fn test_region_match_is_memoized_by_identity() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let lobe = fx.region("occipital cortex");
    let first = fx.engine.match_regions(&leaf, &lobe).unwrap();
    let second = fx.engine.match_regions(&leaf, &lobe).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fx.engine.stats().region_matches, 1);
}

// ═══════════════════════════════════════════════════════════════
// Location vs location
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_flat_slabs_sharing_a_plane_overlap() {
    let fx = fixture();
    let floor = mni_box([0.0, 0.0, 0.0], [10.0, 10.0, 0.0]);
    let wall = mni_box([0.0, 0.0, 0.0], [0.0, 10.0, 10.0]);
    let result = fx.engine.match_locations(&floor, &wall).unwrap().unwrap();
    assert_eq!(result.qualification, Qualification::Overlaps);
}

#[test]
fn test_disjoint_boxes_do_not_match() {
    let fx = fixture();
    let a = mni_box([0.0; 3], [1.0; 3]);
    let b = mni_box([5.0; 3], [6.0; 3]);
    assert!(fx.engine.match_locations(&a, &b).unwrap().is_none());
}

#[test]
fn test_location_qualifications() {
    let fx = fixture();
    let outer = mni_box([0.0; 3], [4.0; 3]);
    let inner = mni_box([1.0; 3], [2.0; 3]);
    let p = mni_point([1.0, 1.0, 1.0]);

    assert_eq!(
        fx.engine.match_locations(&outer, &outer).unwrap().unwrap().qualification,
        Qualification::Exact
    );
    assert_eq!(
        fx.engine.match_locations(&inner, &outer).unwrap().unwrap().qualification,
        Qualification::Contained
    );
    assert_eq!(
        fx.engine.match_locations(&outer, &inner).unwrap().unwrap().qualification,
        Qualification::Contains
    );
    let point_in_box = fx.engine.match_locations(&p, &outer).unwrap().unwrap();
    assert_eq!(point_in_box.qualification, Qualification::Contained);
    assert_eq!(point_in_box.assigned_structure, AssignedStructure::Location(outer.clone()));
}

#[test]
fn test_locations_in_different_spaces_are_warped_first() {
    let fx = fixture();
    // 11 mm in Colin 27 is 1 mm in MNI 152
    let in_colin = Location::from(Point::new([11.0, 1.0, 1.0], colin()));
    let target = mni_box([0.0; 3], [2.0; 3]);
    let result = fx.engine.match_locations(&in_colin, &target).unwrap().unwrap();
    assert_eq!(result.qualification, Qualification::Contained);
    assert_eq!(fx.transport.calls(), 1);

    fx.engine.match_locations(&in_colin, &target).unwrap();
    assert_eq!(fx.transport.calls(), 1);
}

#[test]
fn test_spaceless_location_is_rejected() {
    let fx = fixture();
    let loose = Location::from(Point::spaceless([0.0; 3]));
    let err = fx.engine.match_locations(&loose, &mni_point([0.0; 3])).unwrap_err();
    assert_eq!(err, AnchorError::Location(LocationError::MissingSpace));
}

// ═══════════════════════════════════════════════════════════════
// Location vs region mask
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_point_inside_mask_is_contained() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let result = fx
        .engine
        .match_location_to_region(&mni_point([1.0, 1.0, 1.0]), &leaf)
        .unwrap()
        .unwrap();
    assert_eq!(result.qualification, Qualification::Contained);
    assert_eq!(result.assigned_structure, AssignedStructure::Region(leaf));
    assert!(result.explanation.contains("was compared with the mask"));
}

#[test]
fn test_point_far_outside_mask_is_unassigned() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let far = mni_point([50.0, 50.0, 50.0]);
    assert!(fx.engine.match_location_to_region(&far, &leaf).unwrap().is_none());
    let near_miss = mni_point([5.0, 1.0, 1.0]);
    assert!(fx.engine.match_location_to_region(&near_miss, &leaf).unwrap().is_none());
}

#[test]
fn test_box_qualifications_against_mask() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let qualify = |loc: Location| {
        fx.engine
            .match_location_to_region(&loc, &leaf)
            .unwrap()
            .map(|a| a.qualification)
    };

    // a box covering exactly the mask is still contained in it
    assert_eq!(qualify(mni_box([0.0; 3], [2.0; 3])), Some(Qualification::Contained));
    assert_eq!(qualify(mni_box([-1.0; 3], [3.0; 3])), Some(Qualification::Contains));
    assert_eq!(qualify(mni_box([0.0; 3], [1.0; 3])), Some(Qualification::Contained));
    assert_eq!(qualify(mni_box([1.0; 3], [5.0; 3])), Some(Qualification::Overlaps));
    assert_eq!(qualify(mni_box([4.0; 3], [5.0; 3])), None);
}

#[test]
fn test_point_in_single_voxel_mask_is_contained() {
    let (engine, tiny) = single_voxel_fixture();
    let result = engine
        .match_location_to_region(&mni_point([1.0, 1.0, 1.0]), &tiny)
        .unwrap()
        .unwrap();
    assert_eq!(result.qualification, Qualification::Contained);

    let neighbour = mni_point([0.0, 1.0, 1.0]);
    assert!(engine.match_location_to_region(&neighbour, &tiny).unwrap().is_none());
}

#[test]
fn test_mask_comparison_never_yields_exact() {
    let (engine, tiny) = single_voxel_fixture();
    let candidates = [
        mni_point([1.0, 1.0, 1.0]),
        mni_box([0.5; 3], [1.5; 3]),
        mni_box([0.0; 3], [2.0; 3]),
        mni_box([1.0; 3], [1.0; 3]),
    ];
    for loc in candidates {
        if let Some(result) = engine.match_location_to_region(&loc, &tiny).unwrap() {
            assert_ne!(result.qualification, Qualification::Exact, "{loc}");
        }
    }
}

#[test]
fn test_location_in_unmapped_space_is_warped_to_mask_space() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let in_colin = Location::from(Point::new([11.0, 1.0, 1.0], colin()));
    let result = fx.engine.match_location_to_region(&in_colin, &leaf).unwrap().unwrap();
    assert_eq!(result.qualification, Qualification::Contained);
    assert!(result.explanation.contains("was warped from MNI Colin 27"));
    assert_eq!(fx.transport.calls(), 1);
}

#[test]
fn test_region_without_mask_yields_none() {
    let fx = fixture();
    let empty = fx.region("hoc2 right");
    assert!(fx
        .engine
        .match_location_to_region(&mni_point([1.0, 1.0, 1.0]), &empty)
        .unwrap()
        .is_none());

    let rat_v1 = fx.rat.get_region("primary visual").unwrap();
    assert!(fx
        .engine
        .match_location_to_region(&mni_point([1.0, 1.0, 1.0]), &rat_v1)
        .unwrap()
        .is_none());
}

#[test]
fn test_mask_match_is_memoized_without_rebuilding_masks() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let p = mni_point([1.0, 1.0, 1.0]);

    let first = fx.engine.match_location_to_region(&p, &leaf).unwrap().unwrap();
    let builds = fx.masks.builds();
    assert_eq!(builds, 1);

    let second = fx.engine.match_location_to_region(&p, &leaf).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fx.masks.builds(), builds);

    // a different location reuses the cached mask
    fx.engine.match_location_to_region(&mni_point([2.0, 2.0, 2.0]), &leaf).unwrap();
    assert_eq!(fx.masks.builds(), builds);
    assert_eq!(fx.engine.stats().mask_builds, builds);
}

// ═══════════════════════════════════════════════════════════════
// Batch assignment
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_assign_to_parcellation() {
    let fx = fixture();
    let p = mni_point([1.0, 1.0, 1.0]);
    let assignments = fx.engine.assign_to_parcellation(&p, &fx.human).unwrap();

    let names: Vec<String> = assignments
        .iter()
        .map(|a| a.assigned_structure.to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "Julich-Brain 2.9",
            "occipital cortex",
            "Area hOc1 (V1, 17, CalcS)",
            "Area hOc1 (V1, 17, CalcS) left",
        ]
    );
    assert!(assignments.iter().all(|a| a.qualification == Qualification::Contained));

    let builds = fx.masks.builds();
    fx.engine.assign_to_parcellation(&mni_point([7.0, 1.0, 1.0]), &fx.human).unwrap();
    assert_eq!(fx.masks.builds(), builds);

    assert!(fx.engine.assign_to_parcellation(&p, &fx.rat).unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════
// Specification decoding
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_resolve_spec_single_leaf() {
    let fx = fixture();
    let regions = fx.engine.resolve_spec("hoc1 left", &species(HUMAN)).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].1, Qualification::Exact);
}

#[test]
fn test_resolve_spec_adds_aliases_and_is_shared() {
    let fx = fixture();
    let regions = fx.engine.resolve_spec("hoc1", &species(HUMAN)).unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].0.name(), "Area hOc1 (V1, 17, CalcS)");
    assert_eq!(regions[0].1, Qualification::Exact);
    assert_eq!(regions[1].0.species(), RAT);
    assert_eq!(regions[1].1, Qualification::Overlaps);

    let again = fx.engine.resolve_spec("hoc1", &species(HUMAN)).unwrap();
    assert!(Arc::ptr_eq(&regions, &again));
}

#[test]
fn test_resolve_invalid_spec() {
    let fx = fixture();
    let err = fx.engine.resolve_spec("/(/", &species(HUMAN)).unwrap_err();
    assert!(matches!(err, AnchorError::Region(RegionError::InvalidSpec { .. })));
    assert_eq!(fx.engine.stats().resolved_specs, 0);
}

// ═══════════════════════════════════════════════════════════════
// Stats and clearing
// ═══════════════════════════════════════════════════════════════

#[test]
fn test_clear_drops_cached_results() {
    let fx = fixture();
    let leaf = fx.region("hoc1 left");
    let p = mni_point([1.0, 1.0, 1.0]);
    let first = fx.engine.match_location_to_region(&p, &leaf).unwrap().unwrap();
    fx.engine.resolve_spec("hoc1", &species(HUMAN)).unwrap();

    let stats = fx.engine.stats();
    assert_eq!(stats.location_region_matches, 1);
    assert_eq!(stats.resolved_specs, 1);
    assert_eq!(stats.cached_masks, 1);

    fx.engine.clear();
    let cleared = fx.engine.stats();
    assert_eq!(cleared.location_region_matches, 0);
    assert_eq!(cleared.resolved_specs, 0);
    assert_eq!(cleared.cached_masks, 0);
    assert_eq!(cleared.mask_builds, 1);

    let recomputed = fx.engine.match_location_to_region(&p, &leaf).unwrap().unwrap();
    assert!(!Arc::ptr_eq(&first, &recomputed));
    assert_eq!(*first, *recomputed);
    assert_eq!(fx.masks.builds(), 2);
}
