// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use tracing::{debug, warn};

use siibra_locations::SpaceId;

use crate::error::{RegionError, RegionResult};
use crate::parcellation::Parcellation;
use crate::region::Region;
use crate::space::Space;
use crate::spec::RegionSpec;

/// Known reference spaces and parcellations.
#[derive(Debug, Clone, Default)]
pub struct ParcellationRegistry {
    spaces: Vec<Space>,
    parcellations: Vec<Parcellation>,
}

impl ParcellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_space(mut self, space: Space) -> Self {
        self.add_space(space);
        self
    }

    pub fn with_parcellation(mut self, parcellation: Parcellation) -> Self {
        self.add_parcellation(parcellation);
        self
    }

    pub fn add_space(&mut self, space: Space) {
        self.spaces.retain(|s| s.id != space.id);
        self.spaces.push(space);
    }

    /// Register a parcellation, replacing one with the same id.
    pub fn add_parcellation(&mut self, parcellation: Parcellation) {
        if let Some(existing) = self.parcellations.iter_mut().find(|p| p.id() == parcellation.id()) {
            warn!(parcellation = parcellation.id(), "replacing registered parcellation");
            *existing = parcellation;
        } else {
            self.parcellations.push(parcellation);
        }
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn space(&self, id: &SpaceId) -> Option<&Space> {
        self.spaces.iter().find(|s| &s.id == id)
    }

    pub fn get_space(&self, id: &SpaceId) -> RegionResult<&Space> {
        self.space(id).ok_or_else(|| RegionError::UnknownSpace(id.clone()))
    }

    pub fn parcellations(&self) -> &[Parcellation] {
        &self.parcellations
    }

    pub fn parcellation(&self, id: &str) -> Option<&Parcellation> {
        self.parcellations.iter().find(|p| p.id() == id)
    }

    pub fn species(&self) -> BTreeSet<String> {
        self.parcellations.iter().map(|p| p.species().to_string()).collect()
    }

    /// Regions matching `spec` across all parcellations of the given
    /// species. An empty species set searches every parcellation.
    ///
    /// With `parents_only`, a match whose parent also matched is dropped.
    pub fn find_regions(&self, spec: &RegionSpec, species: &BTreeSet<String>, parents_only: bool) -> Vec<Region> {
        let matches: Vec<Region> = self
            .parcellations
            .iter()
            .filter(|p| species.is_empty() || species.contains(p.species()))
            .flat_map(|p| p.find(spec))
            .collect();
        debug!(spec = %spec, found = matches.len(), "registry region search");

        if !parents_only {
            return matches;
        }
        matches
            .iter()
            .filter(|r| r.parent().map_or(true, |p| !matches.contains(&p)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parcellation::ParcellationBuilder;

    fn registry() -> ParcellationRegistry {
        let mut human = Parcellation::builder("jba", "Julich-Brain", "Homo sapiens");
        let v1 = human.add_region(ParcellationBuilder::ROOT, "Area hOc1 (V1, 17, CalcS)", None).unwrap();
        human.add_region(v1, "Area hOc1 (V1, 17, CalcS) left", Some(1)).unwrap();
        human.add_region(v1, "Area hOc1 (V1, 17, CalcS) right", Some(2)).unwrap();

        let mut rat = Parcellation::builder("whs", "Waxholm", "Rattus norvegicus");
        rat.add_region(ParcellationBuilder::ROOT, "Primary visual area V1", Some(1)).unwrap();

        ParcellationRegistry::new()
            .with_space(Space::new("mni152", "MNI 152"))
            .with_parcellation(human.build())
            .with_parcellation(rat.build())
    }

    #[test]
    fn test_find_regions_parents_only() {
        let reg = registry();
        let spec = RegionSpec::parse("hoc1").unwrap();
        assert_eq!(reg.find_regions(&spec, &BTreeSet::new(), false).len(), 3);
        let parents = reg.find_regions(&spec, &BTreeSet::new(), true);
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].name(), "Area hOc1 (V1, 17, CalcS)");
    }

    #[test]
    fn test_find_regions_species_filter() {
        let reg = registry();
        let spec = RegionSpec::parse("v1").unwrap();
        let all = reg.find_regions(&spec, &BTreeSet::new(), true);
        assert_eq!(all.len(), 2);

        let rat: BTreeSet<String> = ["Rattus norvegicus".to_string()].into();
        let found = reg.find_regions(&spec, &rat, true);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].species(), "Rattus norvegicus");
    }

    #[test]
    fn test_unknown_space() {
        let reg = registry();
        assert!(reg.get_space(&SpaceId::from("mni152")).is_ok());
        assert!(matches!(
            reg.get_space(&SpaceId::from("colin27")),
            Err(RegionError::UnknownSpace(_))
        ));
    }

    #[test]
    fn test_species_listing() {
        assert_eq!(registry().species().len(), 2);
    }
}
