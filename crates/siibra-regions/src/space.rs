// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use siibra_locations::SpaceId;
use std::fmt;

/// A brain reference space.
///
/// Surface spaces (meshes) are never chosen as a fallback space for
/// voxel mask lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    #[serde(default)]
    pub is_surface: bool,
}

impl Space {
    pub fn new(id: impl Into<SpaceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_surface: false,
        }
    }

    pub fn surface(id: impl Into<SpaceId>, name: impl Into<String>) -> Self {
        Self {
            is_surface: true,
            ..Self::new(id, name)
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Kind of parcellation map a mask is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Labelled,
    Continuous,
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapType::Labelled => f.write_str("labelled"),
            MapType::Continuous => f.write_str("continuous"),
        }
    }
}
