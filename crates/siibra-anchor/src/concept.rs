// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use siibra_locations::{Location, LocationKey, SpaceId};
use siibra_regions::{Region, Space};
use std::fmt;

/// Anything an anchor can be assigned to.
#[derive(Debug, Clone)]
pub enum Concept {
    Space(Space),
    Region(Region),
    Location(Location),
}

/// Hashable identity of a [`Concept`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConceptKey {
    Space(SpaceId),
    Region(Region),
    Location(LocationKey),
}

impl Concept {
    pub fn key(&self) -> ConceptKey {
        match self {
            Concept::Space(s) => ConceptKey::Space(s.id.clone()),
            Concept::Region(r) => ConceptKey::Region(r.clone()),
            Concept::Location(l) => ConceptKey::Location(l.key()),
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concept::Space(s) => s.fmt(f),
            Concept::Region(r) => r.fmt(f),
            Concept::Location(l) => l.fmt(f),
        }
    }
}

impl From<Space> for Concept {
    fn from(value: Space) -> Self {
        Concept::Space(value)
    }
}

impl From<Region> for Concept {
    fn from(value: Region) -> Self {
        Concept::Region(value)
    }
}

impl From<Location> for Concept {
    fn from(value: Location) -> Self {
        Concept::Location(value)
    }
}
