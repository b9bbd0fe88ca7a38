// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cross-species region aliases.
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "Homo sapiens": {
//!     "hoc1": {
//!       "Rattus norvegicus": { "Primary visual area": "OVERLAPS" }
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AnchorError, AnchorResult};
use crate::qualification::Qualification;

type Homologs = BTreeMap<String, BTreeMap<String, Qualification>>;

/// `species -> region spec -> {other species -> {alias spec -> qualification}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(BTreeMap<String, BTreeMap<String, Homologs>>);

/// One alias entry of a region specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias<'a> {
    pub species: &'a str,
    pub spec: &'a str,
    pub qualification: Qualification,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> AnchorResult<Self> {
        serde_json::from_str(text).map_err(|e| AnchorError::InvalidAliasTable {
            origin: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> AnchorResult<Self> {
        let path = path.as_ref();
        let invalid = |reason: String| AnchorError::InvalidAliasTable {
            origin: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))
    }

    pub fn insert(
        &mut self,
        species: impl Into<String>,
        spec: impl Into<String>,
        alias_species: impl Into<String>,
        alias_spec: impl Into<String>,
        qualification: Qualification,
    ) {
        self.0
            .entry(species.into())
            .or_default()
            .entry(spec.into())
            .or_default()
            .entry(alias_species.into())
            .or_default()
            .insert(alias_spec.into(), qualification);
    }

    pub fn with_alias(
        mut self,
        species: impl Into<String>,
        spec: impl Into<String>,
        alias_species: impl Into<String>,
        alias_spec: impl Into<String>,
        qualification: Qualification,
    ) -> Self {
        self.insert(species, spec, alias_species, alias_spec, qualification);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Aliases of `spec` as written for `species`.
    pub fn aliases<'a>(&'a self, species: &str, spec: &str) -> impl Iterator<Item = Alias<'a>> + 'a {
        self.0
            .get(species)
            .and_then(|specs| specs.get(spec))
            .into_iter()
            .flat_map(|homologs| {
                homologs.iter().flat_map(|(alias_species, specs)| {
                    specs.iter().map(move |(alias_spec, &qualification)| Alias {
                        species: alias_species,
                        spec: alias_spec,
                        qualification,
                    })
                })
            })
    }
}
