// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use siibra_locations::{Location, SpaceId};
use siibra_regions::{Parcellation, Region, RegionSpec};

use crate::assignment::AnatomicalAssignment;
use crate::concept::{Concept, ConceptKey};
use crate::engine::{AssignmentEngine, ResolvedRegions};
use crate::error::AnchorResult;
use crate::qualification::Qualification;

/// Assignments of an anchor to one concept, best rank first.
pub type Assignments = Arc<Vec<Arc<AnatomicalAssignment>>>;

/// Anatomical anchoring of some data: a location, a region specification
/// (or already resolved region), or both, for a set of species.
///
/// Regions are decoded on first use through an [`AssignmentEngine`] and
/// kept for the lifetime of the anchor, as are per-concept assignments.
pub struct AnatomicalAnchor {
    location: Option<Location>,
    region_spec: Option<String>,
    species: BTreeSet<String>,
    regions: OnceCell<ResolvedRegions>,
    spec_variants: OnceCell<Arc<Vec<RegionSpec>>>,
    assignments: Mutex<AHashMap<ConceptKey, Assignments>>,
    last_matched: Mutex<Option<ConceptKey>>,
}

impl AnatomicalAnchor {
    pub fn new<S: Into<String>>(
        location: Option<Location>,
        region_spec: Option<String>,
        species: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            location,
            region_spec,
            species: species.into_iter().map(Into::into).collect(),
            regions: OnceCell::new(),
            spec_variants: OnceCell::new(),
            assignments: Mutex::new(AHashMap::new()),
            last_matched: Mutex::new(None),
        }
    }

    pub fn from_location<S: Into<String>>(location: Location, species: impl IntoIterator<Item = S>) -> Self {
        Self::new(Some(location), None, species)
    }

    pub fn from_region_spec<S: Into<String>>(spec: impl Into<String>, species: impl IntoIterator<Item = S>) -> Self {
        Self::new(None, Some(spec.into()), species)
    }

    /// Anchor to a region that is already resolved; no decoding happens.
    pub fn from_region(region: Region) -> Self {
        Self {
            location: None,
            region_spec: None,
            species: BTreeSet::from([region.species().to_string()]),
            regions: OnceCell::with_value(Arc::new(vec![(region, Qualification::Exact)])),
            spec_variants: OnceCell::new(),
            assignments: Mutex::new(AHashMap::new()),
            last_matched: Mutex::new(None),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn region_spec(&self) -> Option<&str> {
        self.region_spec.as_deref()
    }

    pub fn species(&self) -> &BTreeSet<String> {
        &self.species
    }

    pub fn space(&self) -> Option<&SpaceId> {
        self.location.as_ref().and_then(Location::space_id)
    }

    /// Regions this anchor refers to, with their qualification relative to
    /// the specification. Alias expansion may add regions that are not
    /// `Exact`.
    pub fn regions(&self, engine: &AssignmentEngine) -> AnchorResult<ResolvedRegions> {
        self.regions
            .get_or_try_init(|| match &self.region_spec {
                Some(spec) => engine.resolve_spec(spec, &self.species),
                None => Ok(Arc::new(Vec::new())),
            })
            .cloned()
    }

    /// Distinct parcellations of the resolved regions, in first-seen order.
    pub fn parcellations(&self, engine: &AssignmentEngine) -> AnchorResult<Vec<Parcellation>> {
        let mut parcellations: Vec<Parcellation> = Vec::new();
        for (region, _) in self.regions(engine)?.iter() {
            if !parcellations.contains(region.parcellation()) {
                parcellations.push(region.parcellation().clone());
            }
        }
        Ok(parcellations)
    }

    /// Qualified relations of this anchor to `concept`.
    ///
    /// Computed once per concept; later calls return the same list.
    pub fn assign(&self, engine: &AssignmentEngine, concept: &Concept) -> AnchorResult<Assignments> {
        let key = concept.key();
        let cached = self.assignments.lock().get(&key).cloned();
        let assignments = match cached {
            Some(found) => found,
            None => {
                let mut matches = self.compute_matches(engine, concept)?;
                matches.sort_by(|a, b| a.rank_cmp(b));
                debug!(anchor = %self, %concept, found = matches.len(), "assigned anchor");
                self.assignments
                    .lock()
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(matches))
                    .clone()
            }
        };

        *self.last_matched.lock() = if assignments.is_empty() { None } else { Some(key) };
        Ok(assignments)
    }

    pub fn matches(&self, engine: &AssignmentEngine, concept: &Concept) -> AnchorResult<bool> {
        Ok(!self.assign(engine, concept)?.is_empty())
    }

    /// Assignments of the last concept that produced any.
    pub fn last_match_result(&self) -> Option<Assignments> {
        let key = self.last_matched.lock().clone()?;
        self.assignments.lock().get(&key).cloned()
    }

    pub fn last_match_description(&self) -> Option<String> {
        let result = self.last_match_result()?;
        let parts: Vec<String> = result.iter().map(|a| a.to_string()).collect();
        Some(format!("{self} {}", parts.join(" and ")))
    }

    fn compute_matches(&self, engine: &AssignmentEngine, concept: &Concept) -> AnchorResult<Vec<Arc<AnatomicalAssignment>>> {
        let mut matches = Vec::new();
        match concept {
            Concept::Space(space) => {
                if self.space() == Some(&space.id) {
                    matches.push(Arc::new(AnatomicalAssignment::new(space.clone(), Qualification::Exact)));
                }
            }
            Concept::Region(region) => {
                if self.may_refer_to(engine, region)? {
                    for (own, qualification) in self.regions(engine)?.iter() {
                        if let Some(found) = engine.match_regions(own, region) {
                            matches.push(self.with_alias_note(found, own, *qualification));
                        }
                    }
                }
                if let Some(location) = &self.location {
                    matches.extend(engine.match_location_to_region(location, region)?);
                }
            }
            Concept::Location(location) => {
                if let Some(own) = &self.location {
                    matches.extend(engine.match_locations(own, location)?);
                }
                for (own, _) in self.regions(engine)?.iter() {
                    if let Some(found) = engine.match_location_to_region(location, own)? {
                        matches.push(Arc::new(found.invert()));
                    }
                }
            }
        }
        Ok(matches)
    }

    /// Cheap pre-check before decoding the specification: does any region
    /// of the concept's subtree match the spec or one of its aliases?
    fn may_refer_to(&self, engine: &AssignmentEngine, region: &Region) -> AnchorResult<bool> {
        if self.region_spec.is_none() {
            return Ok(true);
        }
        let variants = self.spec_variants.get_or_try_init(|| {
            let spec = self.region_spec.as_deref().unwrap_or_default();
            engine.spec_variants(spec, &self.species).map(Arc::new)
        })?;
        Ok(region.iter().any(|r| variants.iter().any(|spec| r.matches(spec))))
    }

    /// Regions pulled in through an alias keep the structural qualification
    /// but say so in the explanation.
    fn with_alias_note(
        &self,
        found: Arc<AnatomicalAssignment>,
        own: &Region,
        qualification: Qualification,
    ) -> Arc<AnatomicalAssignment> {
        match (&self.region_spec, qualification) {
            (Some(spec), q) if q != Qualification::Exact => Arc::new(found.as_ref().clone().with_explanation(format!(
                "'{}' is a {} alias of '{}'",
                own.name(),
                q,
                spec
            ))),
            _ => found,
        }
    }
}

impl fmt::Display for AnatomicalAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let region = match (&self.region_spec, self.regions.get()) {
            (Some(spec), _) => spec.clone(),
            (None, Some(resolved)) => resolved
                .iter()
                .map(|(r, _)| r.name())
                .collect::<Vec<_>>()
                .join(", "),
            (None, None) => String::new(),
        };
        let location = self.location.as_ref().map(|l| l.to_string()).unwrap_or_default();
        let separator = if region.is_empty() || location.is_empty() { "" } else { " " };
        write!(f, "{region}{separator}{location}")
    }
}

impl fmt::Debug for AnatomicalAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnatomicalAnchor")
            .field("location", &self.location)
            .field("region_spec", &self.region_spec)
            .field("species", &self.species)
            .finish()
    }
}
