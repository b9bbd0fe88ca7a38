// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pairwise qualification of locations and regions.
//!
//! Every comparison is memoized on the engine. Results are shared as
//! `Arc`s, so asking the same question twice returns the same object.
//! Nothing is evicted until [`AssignmentEngine::clear`] is called.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use siibra_config::SiibraConfig;
use siibra_locations::{Location, LocationKey, SpaceId, VoxelMask};
use siibra_regions::{MapType, Parcellation, ParcellationRegistry, Region, RegionSpec};
use siibra_warp::SpaceWarper;

use crate::alias::AliasTable;
use crate::assignment::AnatomicalAssignment;
use crate::error::{AnchorError, AnchorResult};
use crate::memo::OnceMap;
use crate::qualification::Qualification;

/// Outcome of one pairwise comparison; `None` means unrelated.
pub type Match = Option<Arc<AnatomicalAssignment>>;

/// Regions a specification decodes to, each tagged with how it relates to
/// the specification (`Exact`, or the alias qualification).
pub type ResolvedRegions = Arc<Vec<(Region, Qualification)>>;

/// Cache sizes and counters of an [`AssignmentEngine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub region_matches: usize,
    pub location_matches: usize,
    pub location_region_matches: usize,
    pub resolved_specs: usize,
    pub cached_masks: usize,
    pub cached_warps: usize,
    /// Total mask builds since the engine was created.
    pub mask_builds: usize,
}

struct MaskSite {
    mask: Arc<VoxelMask>,
    space: SpaceId,
    warped: bool,
}

pub struct AssignmentEngine {
    registry: Arc<ParcellationRegistry>,
    warper: Arc<SpaceWarper>,
    aliases: AliasTable,
    region_memo: OnceMap<(Region, Region), Match>,
    location_memo: OnceMap<(LocationKey, LocationKey), Match>,
    location_region_memo: OnceMap<(LocationKey, Region), Match>,
    spec_cache: OnceMap<(String, BTreeSet<String>), ResolvedRegions>,
    mask_cache: OnceMap<(Region, SpaceId), Option<Arc<VoxelMask>>>,
    warp_cache: OnceMap<(LocationKey, SpaceId), Arc<Location>>,
    mask_builds: AtomicUsize,
}

impl AssignmentEngine {
    pub fn new(registry: Arc<ParcellationRegistry>, warper: Arc<SpaceWarper>) -> Self {
        Self {
            registry,
            warper,
            aliases: AliasTable::default(),
            region_memo: OnceMap::new(),
            location_memo: OnceMap::new(),
            location_region_memo: OnceMap::new(),
            spec_cache: OnceMap::new(),
            mask_cache: OnceMap::new(),
            warp_cache: OnceMap::new(),
            mask_builds: AtomicUsize::new(0),
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// HTTP warper and optional alias table from configuration.
    pub fn from_config(config: &SiibraConfig, registry: Arc<ParcellationRegistry>) -> AnchorResult<Self> {
        let warper = SpaceWarper::from_config(&config.warp)?;
        let engine = Self::new(registry, Arc::new(warper));
        match &config.assignment.alias_table {
            Some(path) => {
                let aliases = AliasTable::from_path(path)?;
                info!(path = %path.display(), "loaded region alias table");
                Ok(engine.with_aliases(aliases))
            }
            None => Ok(engine),
        }
    }

    pub fn registry(&self) -> &ParcellationRegistry {
        &self.registry
    }

    pub fn warper(&self) -> &SpaceWarper {
        &self.warper
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// EXACT if equal, CONTAINED if `r1` lies below `r2`, CONTAINS if above.
    pub fn match_regions(&self, r1: &Region, r2: &Region) -> Match {
        self.region_memo
            .get_or_try_init((r1.clone(), r2.clone()), || {
                let qualification = if r1 == r2 {
                    Some(Qualification::Exact)
                } else if r1.is_descendant_of(r2) {
                    Some(Qualification::Contained)
                } else if r1.is_ancestor_of(r2) {
                    Some(Qualification::Contains)
                } else {
                    None
                };
                Ok::<_, std::convert::Infallible>(
                    qualification.map(|q| Arc::new(AnatomicalAssignment::new(r2.clone(), q))),
                )
            })
            .unwrap_or_else(|never| match never {})
    }

    /// Qualify `l1` against `l2`, warping `l1` into the space of `l2` first
    /// when they differ.
    pub fn match_locations(&self, l1: &Location, l2: &Location) -> AnchorResult<Match> {
        self.location_memo.get_or_try_init((l1.key(), l2.key()), || -> AnchorResult<Match> {
            let warped;
            let candidate = if l1.space_id() != l2.space_id() {
                l1.require_space()?;
                warped = self.warp(l1, l2.require_space()?)?;
                warped.as_ref()
            } else {
                l1
            };

            let qualification = if candidate == l2 {
                Some(Qualification::Exact)
            } else if candidate.contained_in(l2)? {
                Some(Qualification::Contained)
            } else if candidate.contains(l2)? {
                Some(Qualification::Contains)
            } else if candidate.intersects(l2)? {
                Some(Qualification::Overlaps)
            } else {
                None
            };
            Ok(qualification.map(|q| Arc::new(AnatomicalAssignment::new(l2.clone(), q))))
        })
    }

    /// Qualify `location` against the labelled mask of `region`.
    ///
    /// The mask is taken in the location's own space when the region has
    /// maps there. Otherwise the first non-surface space with a mask is
    /// used and the location is warped into it. `Ok(None)` when no mask
    /// exists or the location misses it.
    pub fn match_location_to_region(&self, location: &Location, region: &Region) -> AnchorResult<Match> {
        self.location_region_memo.get_or_try_init((location.key(), region.clone()), || -> AnchorResult<Match> {
            let source = location.require_space()?;
            let Some(site) = self.locate_mask(source, region)? else {
                warn!(
                    region = region.name(),
                    %location,
                    "region provides no mask in a space the location can be compared in"
                );
                return Ok(None);
            };

            let warped;
            let (subject, explanation) = if site.warped {
                warped = self.warp(location, &site.space)?;
                let explanation = format!(
                    "{location} was warped from {} to {} and compared with the mask of query region '{}'",
                    self.space_name(source),
                    self.space_name(&site.space),
                    region.name()
                );
                (warped.as_ref(), explanation)
            } else {
                let explanation = format!(
                    "{location} was compared with the mask of query region '{}' in {}",
                    region.name(),
                    self.space_name(source)
                );
                (location, explanation)
            };

            match qualify_against_mask(subject, &site.mask)? {
                Some(q) => Ok(Some(Arc::new(
                    AnatomicalAssignment::new(region.clone(), q).with_explanation(explanation),
                ))),
                None => {
                    debug!(region = region.name(), %location, space = %site.space, "location misses region mask");
                    Ok(None)
                }
            }
        })
    }

    /// Match `location` against every region of `parcellation`.
    ///
    /// Regions without any usable mask are skipped. Results are sorted by
    /// qualification rank.
    pub fn assign_to_parcellation(
        &self,
        location: &Location,
        parcellation: &Parcellation,
    ) -> AnchorResult<Vec<Arc<AnatomicalAssignment>>> {
        let source = location.require_space()?;
        let mut assignments = Vec::new();
        let mut skipped = 0usize;
        for region in parcellation.regions() {
            if self.locate_mask(source, &region)?.is_none() {
                skipped += 1;
                continue;
            }
            if let Some(assignment) = self.match_location_to_region(location, &region)? {
                assignments.push(assignment);
            }
        }
        if skipped > 0 {
            debug!(parcellation = parcellation.id(), skipped, "regions without masks skipped");
        }
        assignments.sort_by(|a, b| a.rank_cmp(b));
        Ok(assignments)
    }

    /// Decode a region specification for a set of species.
    ///
    /// Direct matches (parents only) are tagged `Exact`. Aliases of the
    /// specification add homologous regions of other species tagged with
    /// the alias qualification. An empty species set searches every
    /// parcellation. The decoded list is computed once per
    /// `(spec, species)` and shared afterwards.
    pub fn resolve_spec(&self, spec: &str, species: &BTreeSet<String>) -> AnchorResult<ResolvedRegions> {
        self.spec_cache.get_or_try_init((spec.to_string(), species.clone()), || -> AnchorResult<ResolvedRegions> {
            let parsed = RegionSpec::parse(spec)?;
            let mut regions: Vec<(Region, Qualification)> = self
                .registry
                .find_regions(&parsed, species, true)
                .into_iter()
                .map(|r| (r, Qualification::Exact))
                .collect();

            for own_species in self.alias_species(species) {
                for alias in self.aliases.aliases(&own_species, spec) {
                    let alias_spec = RegionSpec::parse(alias.spec)?;
                    let target = BTreeSet::from([alias.species.to_string()]);
                    for region in self.registry.find_regions(&alias_spec, &target, true) {
                        if regions.iter().any(|(r, _)| r == &region) {
                            continue;
                        }
                        info!(
                            region = region.name(),
                            species = alias.species,
                            spec,
                            qualification = %alias.qualification,
                            "adding region from alias"
                        );
                        regions.push((region, alias.qualification));
                    }
                }
            }
            debug!(spec, found = regions.len(), "decoded region specification");
            Ok(Arc::new(regions))
        })
    }

    /// `spec` parsed, followed by every alias specification of it.
    pub fn spec_variants(&self, spec: &str, species: &BTreeSet<String>) -> AnchorResult<Vec<RegionSpec>> {
        let mut variants = vec![RegionSpec::parse(spec)?];
        for own_species in self.alias_species(species) {
            for alias in self.aliases.aliases(&own_species, spec) {
                variants.push(RegionSpec::parse(alias.spec)?);
            }
        }
        Ok(variants)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            region_matches: self.region_memo.len(),
            location_matches: self.location_memo.len(),
            location_region_matches: self.location_region_memo.len(),
            resolved_specs: self.spec_cache.len(),
            cached_masks: self.mask_cache.len(),
            cached_warps: self.warp_cache.len(),
            mask_builds: self.mask_builds.load(Ordering::Relaxed),
        }
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.region_memo.clear();
        self.location_memo.clear();
        self.location_region_memo.clear();
        self.spec_cache.clear();
        self.mask_cache.clear();
        self.warp_cache.clear();
        debug!("assignment caches cleared");
    }

    fn alias_species(&self, species: &BTreeSet<String>) -> BTreeSet<String> {
        if species.is_empty() {
            self.registry.species()
        } else {
            species.clone()
        }
    }

    fn locate_mask(&self, source: &SpaceId, region: &Region) -> AnchorResult<Option<MaskSite>> {
        let supported = region.supported_spaces();
        if supported.iter().any(|s| &s.id == source) {
            return Ok(self.mask(region, source)?.map(|mask| MaskSite {
                mask,
                space: source.clone(),
                warped: false,
            }));
        }
        for space in supported.iter().filter(|s| !s.is_surface) {
            if let Some(mask) = self.mask(region, &space.id)? {
                return Ok(Some(MaskSite {
                    mask,
                    space: space.id.clone(),
                    warped: true,
                }));
            }
        }
        Ok(None)
    }

    fn mask(&self, region: &Region, space: &SpaceId) -> AnchorResult<Option<Arc<VoxelMask>>> {
        self.mask_cache.get_or_try_init((region.clone(), space.clone()), || {
            self.mask_builds.fetch_add(1, Ordering::Relaxed);
            let mask = region.build_mask(space, MapType::Labelled)?;
            Ok::<_, AnchorError>(mask.map(Arc::new))
        })
    }

    fn warp(&self, location: &Location, target: &SpaceId) -> AnchorResult<Arc<Location>> {
        self.warp_cache.get_or_try_init((location.key(), target.clone()), || {
            Ok::<_, AnchorError>(Arc::new(self.warper.warp(location, target)?))
        })
    }

    fn space_name(&self, id: &SpaceId) -> String {
        self.registry
            .space(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// Geometric relation between a location and a mask in the same space.
///
/// Never `Exact`: containment in the mask takes precedence, so a point in a
/// single-voxel mask is `Contained`.
fn qualify_against_mask(location: &Location, mask: &VoxelMask) -> AnchorResult<Option<Qualification>> {
    if location.contained_in_mask(mask)? {
        return Ok(Some(Qualification::Contained));
    }
    if location.contains_mask(mask)? {
        return Ok(Some(Qualification::Contains));
    }
    if location.intersects_mask(mask)? {
        return Ok(Some(Qualification::Overlaps));
    }
    Ok(None)
}
