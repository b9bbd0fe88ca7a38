// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared fixture: a small occipital parcellation with a labelled map in
//! MNI 152, a rat parcellation without maps, and an in-memory warp service
//! that shifts x by 10 mm between MNI 152 and Colin 27.

#![allow(dead_code)]

use ndarray::Array3;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use siibra_anchor::{AliasTable, AssignmentEngine, Qualification};
use siibra_config::DEFAULT_WARP_SPACES;
use siibra_locations::{Affine, SpaceId, VoxelMask};
use siibra_regions::{
    LabelledMap, MapType, MaskProvider, Parcellation, ParcellationRegistry, Region, RegionDefinition,
    RegionResult, Space,
};
use siibra_warp::{SpaceWarper, WarpResult, WarpTransport};

pub const HUMAN: &str = "Homo sapiens";
pub const RAT: &str = "Rattus norvegicus";

pub fn mni() -> SpaceId {
    SpaceId::from(DEFAULT_WARP_SPACES[0].0)
}

pub fn colin() -> SpaceId {
    SpaceId::from(DEFAULT_WARP_SPACES[1].0)
}

/// Mask provider that counts how often a mask is actually built.
pub struct CountingMaskProvider {
    inner: LabelledMap,
    builds: AtomicUsize,
}

impl CountingMaskProvider {
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl MaskProvider for CountingMaskProvider {
    fn supported_spaces(&self) -> Vec<Space> {
        self.inner.supported_spaces()
    }

    fn build_mask(&self, region: &Region, space: &SpaceId, maptype: MapType) -> RegionResult<Option<VoxelMask>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.inner.build_mask(region, space, maptype)
    }
}

/// Adds 10 mm to x from MNI 152 to Colin 27 and subtracts it on the way back.
#[derive(Default)]
pub struct ShiftTransport {
    calls: AtomicUsize,
}

impl ShiftTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn shift(source: &str, target: &str) -> f64 {
        let (mni, colin) = (DEFAULT_WARP_SPACES[0].1, DEFAULT_WARP_SPACES[1].1);
        if source == mni && target == colin {
            10.0
        } else if source == colin && target == mni {
            -10.0
        } else {
            0.0
        }
    }
}

impl WarpTransport for ShiftTransport {
    fn transform_point(&self, source: &str, target: &str, c: [f64; 3]) -> WarpResult<[f64; 3]> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok([c[0] + Self::shift(source, target), c[1], c[2]])
    }

    fn transform_points(&self, source: &str, target: &str, cs: &[[f64; 3]]) -> WarpResult<Vec<[f64; 3]>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let dx = Self::shift(source, target);
        Ok(cs.iter().map(|c| [c[0] + dx, c[1], c[2]]).collect())
    }
}

pub struct Fixture {
    pub engine: AssignmentEngine,
    pub human: Parcellation,
    pub rat: Parcellation,
    pub masks: Arc<CountingMaskProvider>,
    pub transport: Arc<ShiftTransport>,
}

impl Fixture {
    pub fn region(&self, spec: &str) -> Region {
        self.human.get_region(spec).expect("region in fixture")
    }
}

/// 10x10x10 volume, 1 mm voxels, voxel index == MNI coordinate.
///
/// - label 1 (hOc1 left): x, y, z in 0..=2
/// - label 2 (hOc1 right): x in 6..=8, y, z in 0..=2
/// - label 3 (hOc2 left): x in 0..=2, y in 6..=8, z in 0..=2
/// - label 4 (hOc2 right): no voxels
fn labelled_volume() -> Array3<u32> {
    let mut labels = Array3::<u32>::zeros((10, 10, 10));
    for a in 0..3 {
        for b in 0..3 {
            for c in 0..3 {
                labels[[a, b, c]] = 1;
                labels[[a + 6, b, c]] = 2;
                labels[[a, b + 6, c]] = 3;
            }
        }
    }
    labels
}

pub fn fixture() -> Fixture {
    let map = LabelledMap::new()
        .with_volume(
            Space::new(mni(), DEFAULT_WARP_SPACES[0].1),
            labelled_volume(),
            Affine::identity(),
        )
        .expect("labelled map");
    let masks = Arc::new(CountingMaskProvider {
        inner: map,
        builds: AtomicUsize::new(0),
    });

    let occipital = RegionDefinition::new("occipital cortex").with_children(vec![
        RegionDefinition::new("Area hOc1 (V1, 17, CalcS)").with_children(vec![
            RegionDefinition::labelled("Area hOc1 (V1, 17, CalcS) left", 1),
            RegionDefinition::labelled("Area hOc1 (V1, 17, CalcS) right", 2),
        ]),
        RegionDefinition::new("Area hOc2 (V2, 18)").with_children(vec![
            RegionDefinition::labelled("Area hOc2 (V2, 18) left", 3),
            RegionDefinition::labelled("Area hOc2 (V2, 18) right", 4),
        ]),
    ]);
    let human = Parcellation::from_definitions("jba29", "Julich-Brain 2.9", HUMAN, &[occipital])
        .expect("human tree")
        .build_with_maps(masks.clone());

    let rat = Parcellation::from_definitions(
        "whs4",
        "Waxholm Space rat brain atlas v4",
        RAT,
        &[RegionDefinition::new("Primary visual area")],
    )
    .expect("rat tree")
    .build();

    let registry = ParcellationRegistry::new()
        .with_space(Space::new(mni(), DEFAULT_WARP_SPACES[0].1))
        .with_space(Space::new(colin(), DEFAULT_WARP_SPACES[1].1))
        .with_parcellation(human.clone())
        .with_parcellation(rat.clone());

    let transport = Arc::new(ShiftTransport::default());
    let warper = SpaceWarper::new(transport.clone());
    let aliases = AliasTable::new().with_alias(HUMAN, "hoc1", RAT, "Primary visual area", Qualification::Overlaps);
    let engine = AssignmentEngine::new(Arc::new(registry), Arc::new(warper)).with_aliases(aliases);

    Fixture {
        engine,
        human,
        rat,
        masks,
        transport,
    }
}

/// 3x3x3 volume in MNI 152 whose only labelled voxel is (1, 1, 1), mapped
/// to a parcellation with the single leaf "tiny area".
pub fn single_voxel_fixture() -> (AssignmentEngine, Region) {
    let mut labels = Array3::<u32>::zeros((3, 3, 3));
    labels[[1, 1, 1]] = 1;
    let map = LabelledMap::new()
        .with_volume(Space::new(mni(), DEFAULT_WARP_SPACES[0].1), labels, Affine::identity())
        .expect("labelled map");

    let tiny = Parcellation::from_definitions(
        "tiny",
        "Single voxel atlas",
        HUMAN,
        &[RegionDefinition::labelled("tiny area", 1)],
    )
    .expect("tiny tree")
    .build_with_maps(Arc::new(map));

    let registry = ParcellationRegistry::new()
        .with_space(Space::new(mni(), DEFAULT_WARP_SPACES[0].1))
        .with_parcellation(tiny.clone());
    let warper = SpaceWarper::new(Arc::new(ShiftTransport::default()));
    let engine = AssignmentEngine::new(Arc::new(registry), Arc::new(warper));
    let region = tiny.get_region("tiny area").expect("tiny area");
    (engine, region)
}
