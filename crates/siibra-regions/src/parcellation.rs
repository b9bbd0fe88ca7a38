// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parcellations and their region trees.
//!
//! A parcellation owns its region tree as an arena of nodes. Regions are
//! cheap handles (parcellation + node index), so parent/child navigation
//! never needs shared mutable links.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{RegionError, RegionResult};
use crate::maps::MaskProvider;
use crate::region::Region;
use crate::spec::RegionSpec;

#[derive(Debug, Clone)]
pub(crate) struct RegionNode {
    pub(crate) name: String,
    pub(crate) label: Option<u32>,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

pub(crate) struct ParcellationData {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) species: String,
    pub(crate) nodes: Vec<RegionNode>,
    pub(crate) maps: Option<Arc<dyn MaskProvider>>,
}

/// Serializable nested description of a region tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RegionDefinition>,
}

impl RegionDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            children: Vec::new(),
        }
    }

    pub fn labelled(name: impl Into<String>, label: u32) -> Self {
        Self {
            label: Some(label),
            ..Self::new(name)
        }
    }

    pub fn with_children(mut self, children: Vec<RegionDefinition>) -> Self {
        self.children = children;
        self
    }
}

/// Incremental construction of a parcellation tree.
///
/// The root node is named after the parcellation and has index
/// [`ParcellationBuilder::ROOT`].
pub struct ParcellationBuilder {
    id: String,
    name: String,
    species: String,
    nodes: Vec<RegionNode>,
}

impl ParcellationBuilder {
    pub const ROOT: usize = 0;

    pub fn new(id: impl Into<String>, name: impl Into<String>, species: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            species: species.into(),
            nodes: vec![RegionNode {
                name: name.clone(),
                label: None,
                parent: None,
                children: Vec::new(),
            }],
            name,
        }
    }

    /// Add a region below `parent` and return its node index.
    ///
    /// Sibling names must be unique.
    pub fn add_region(&mut self, parent: usize, name: impl Into<String>, label: Option<u32>) -> RegionResult<usize> {
        let name = name.into();
        let parent_node = self
            .nodes
            .get(parent)
            .ok_or(RegionError::UnknownParent { index: parent })?;
        if parent_node.children.iter().any(|&c| self.nodes[c].name == name) {
            return Err(RegionError::DuplicateRegion {
                name,
                parent: parent_node.name.clone(),
            });
        }

        let index = self.nodes.len();
        self.nodes.push(RegionNode {
            name,
            label,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        Ok(index)
    }

    /// Add a nested definition (and all of its children) below `parent`.
    pub fn add_definition(&mut self, parent: usize, definition: &RegionDefinition) -> RegionResult<usize> {
        let index = self.add_region(parent, definition.name.clone(), definition.label)?;
        for child in &definition.children {
            self.add_definition(index, child)?;
        }
        Ok(index)
    }

    pub fn build(self) -> Parcellation {
        self.finish(None)
    }

    pub fn build_with_maps(self, maps: Arc<dyn MaskProvider>) -> Parcellation {
        self.finish(Some(maps))
    }

    fn finish(self, maps: Option<Arc<dyn MaskProvider>>) -> Parcellation {
        debug!(
            parcellation = %self.id,
            regions = self.nodes.len(),
            has_maps = maps.is_some(),
            "built parcellation"
        );
        Parcellation(Arc::new(ParcellationData {
            id: self.id,
            name: self.name,
            species: self.species,
            nodes: self.nodes,
            maps,
        }))
    }
}

/// A named region tree for one species, optionally backed by maps.
#[derive(Clone)]
pub struct Parcellation(pub(crate) Arc<ParcellationData>);

impl Parcellation {
    pub fn builder(id: impl Into<String>, name: impl Into<String>, species: impl Into<String>) -> ParcellationBuilder {
        ParcellationBuilder::new(id, name, species)
    }

    /// Build a parcellation whose top level regions are `regions`.
    pub fn from_definitions(
        id: impl Into<String>,
        name: impl Into<String>,
        species: impl Into<String>,
        regions: &[RegionDefinition],
    ) -> RegionResult<ParcellationBuilder> {
        let mut builder = ParcellationBuilder::new(id, name, species);
        for region in regions {
            builder.add_definition(ParcellationBuilder::ROOT, region)?;
        }
        Ok(builder)
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn species(&self) -> &str {
        &self.0.species
    }

    pub fn maps(&self) -> Option<&Arc<dyn MaskProvider>> {
        self.0.maps.as_ref()
    }

    /// Number of regions including the root.
    pub fn len(&self) -> usize {
        self.0.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.nodes.is_empty()
    }

    pub fn root(&self) -> Region {
        Region::new(self.clone(), ParcellationBuilder::ROOT)
    }

    /// All regions in pre-order, root first.
    pub fn regions(&self) -> impl Iterator<Item = Region> {
        self.root().iter()
    }

    pub fn find(&self, spec: &RegionSpec) -> Vec<Region> {
        self.root().find(spec)
    }

    pub fn region_with_label(&self, label: u32) -> Option<Region> {
        self.regions().find(|r| r.label() == Some(label))
    }

    /// Resolve `spec` to exactly one region.
    ///
    /// Matches whose parent also matched are dropped. If several remain,
    /// a candidate whose name words all appear in the query wins.
    pub fn get_region(&self, spec: &str) -> RegionResult<Region> {
        let parsed = RegionSpec::parse(spec)?;
        let matches = self.find(&parsed);
        let mut candidates: Vec<Region> = matches
            .iter()
            .filter(|r| r.parent().map_or(true, |p| !matches.contains(&p)))
            .cloned()
            .collect();

        if candidates.len() > 1 {
            if let Some(full) = candidates.iter().find(|c| parsed.covers_name(c.name())) {
                debug!(spec, winner = full.name(), "full word match overrides other candidates");
                candidates = vec![full.clone()];
            }
        }

        match candidates.len() {
            0 => Err(RegionError::Resolution {
                spec: spec.to_string(),
                reason: format!("matches no region in '{}'", self.name()),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(RegionError::Resolution {
                spec: spec.to_string(),
                reason: format!(
                    "matches multiple regions: {}",
                    candidates.iter().map(Region::name).collect::<Vec<_>>().join(", ")
                ),
            }),
        }
    }

    pub(crate) fn node(&self, index: usize) -> &RegionNode {
        &self.0.nodes[index]
    }
}

impl PartialEq for Parcellation {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Parcellation {}

impl fmt::Debug for Parcellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parcellation")
            .field("id", &self.0.id)
            .field("species", &self.0.species)
            .field("regions", &self.0.nodes.len())
            .finish()
    }
}

impl fmt::Display for Parcellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
