// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use siibra_locations::Location;
use siibra_regions::{Region, Space};
use std::cmp::Ordering;
use std::fmt;

use crate::qualification::Qualification;

/// The atlas concept an assignment points at.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignedStructure {
    Space(Space),
    Region(Region),
    Location(Location),
}

impl fmt::Display for AssignedStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignedStructure::Space(s) => s.fmt(f),
            AssignedStructure::Region(r) => r.fmt(f),
            AssignedStructure::Location(l) => l.fmt(f),
        }
    }
}

impl From<Region> for AssignedStructure {
    fn from(value: Region) -> Self {
        AssignedStructure::Region(value)
    }
}

impl From<Location> for AssignedStructure {
    fn from(value: Location) -> Self {
        AssignedStructure::Location(value)
    }
}

impl From<Space> for AssignedStructure {
    fn from(value: Space) -> Self {
        AssignedStructure::Space(value)
    }
}

/// A qualified relation to an atlas concept, with an optional
/// explanation of how it was computed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnatomicalAssignment {
    pub assigned_structure: AssignedStructure,
    pub qualification: Qualification,
    pub explanation: String,
}

impl AnatomicalAssignment {
    pub fn new(assigned_structure: impl Into<AssignedStructure>, qualification: Qualification) -> Self {
        Self {
            assigned_structure: assigned_structure.into(),
            qualification,
            explanation: String::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl AsRef<str>) -> Self {
        self.explanation = explanation.as_ref().trim().to_string();
        self
    }

    pub fn is_exact(&self) -> bool {
        self.qualification == Qualification::Exact
    }

    /// Same structure and explanation, inverted qualification.
    pub fn invert(&self) -> Self {
        Self {
            assigned_structure: self.assigned_structure.clone(),
            qualification: self.qualification.invert(),
            explanation: self.explanation.clone(),
        }
    }

    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.qualification.cmp(&other.qualification)
    }
}

impl fmt::Display for AnatomicalAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.qualification.verb(), self.assigned_structure)?;
        if !self.explanation.is_empty() {
            write!(f, " ({}).", self.explanation)?;
        }
        Ok(())
    }
}
