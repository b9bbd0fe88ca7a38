// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use siibra_locations::{SpaceId, VoxelMask};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::error::RegionResult;
use crate::parcellation::Parcellation;
use crate::space::{MapType, Space};
use crate::spec::RegionSpec;

/// Handle to one node of a parcellation's region tree.
///
/// Two handles are equal when they point at the same node of the same
/// parcellation.
#[derive(Clone)]
pub struct Region {
    parcellation: Parcellation,
    index: usize,
}

impl Region {
    pub(crate) fn new(parcellation: Parcellation, index: usize) -> Self {
        Self { parcellation, index }
    }

    pub fn name(&self) -> &str {
        &self.parcellation.node(self.index).name
    }

    /// Label index in the parcellation's labelled maps, if any.
    pub fn label(&self) -> Option<u32> {
        self.parcellation.node(self.index).label
    }

    pub fn parcellation(&self) -> &Parcellation {
        &self.parcellation
    }

    pub fn species(&self) -> &str {
        self.parcellation.species()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    pub fn parent(&self) -> Option<Region> {
        self.parcellation
            .node(self.index)
            .parent
            .map(|p| Region::new(self.parcellation.clone(), p))
    }

    pub fn children(&self) -> impl Iterator<Item = Region> + '_ {
        self.parcellation
            .node(self.index)
            .children
            .iter()
            .map(move |&c| Region::new(self.parcellation.clone(), c))
    }

    pub fn is_leaf(&self) -> bool {
        self.parcellation.node(self.index).children.is_empty()
    }

    /// Strict descendant test; a region is not its own descendant.
    pub fn is_descendant_of(&self, other: &Region) -> bool {
        if self.parcellation != other.parcellation {
            return false;
        }
        let mut current = self.parcellation.node(self.index).parent;
        while let Some(index) = current {
            if index == other.index {
                return true;
            }
            current = self.parcellation.node(index).parent;
        }
        false
    }

    pub fn is_ancestor_of(&self, other: &Region) -> bool {
        other.is_descendant_of(self)
    }

    /// This region and everything below it, in pre-order.
    pub fn iter(&self) -> RegionIter {
        RegionIter {
            parcellation: self.parcellation.clone(),
            stack: vec![self.index],
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = Region> {
        self.iter().filter(Region::is_leaf)
    }

    pub fn matches(&self, spec: &RegionSpec) -> bool {
        spec.matches(self.name())
    }

    /// All regions of this subtree (including this one) matching `spec`.
    pub fn find(&self, spec: &RegionSpec) -> Vec<Region> {
        self.iter().filter(|r| r.matches(spec)).collect()
    }

    /// Spaces in which the parcellation's maps can produce masks.
    pub fn supported_spaces(&self) -> Vec<Space> {
        self.parcellation
            .maps()
            .map(|maps| maps.supported_spaces())
            .unwrap_or_default()
    }

    pub fn supports_space(&self, space: &SpaceId) -> bool {
        self.supported_spaces().iter().any(|s| &s.id == space)
    }

    /// Binary mask of this region in `space`.
    ///
    /// `Ok(None)` when no map covers this region in that space.
    pub fn build_mask(&self, space: &SpaceId, maptype: MapType) -> RegionResult<Option<VoxelMask>> {
        match self.parcellation.maps() {
            Some(maps) => maps.build_mask(self, space, maptype),
            None => {
                debug!(region = self.name(), "parcellation has no maps");
                Ok(None)
            }
        }
    }

    /// Render the subtree as an indented tree.
    pub fn tree_to_string(&self) -> String {
        let mut lines = vec![self.name().to_string()];
        render_children(self, "", &mut lines);
        lines.join("\n")
    }
}

fn render_children(region: &Region, prefix: &str, lines: &mut Vec<String>) {
    let children: Vec<Region> = region.children().collect();
    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{branch}{}", child.name()));
        let extension = if last { "    " } else { "│   " };
        render_children(child, &format!("{prefix}{extension}"), lines);
    }
}

/// Pre-order walk over a subtree.
pub struct RegionIter {
    parcellation: Parcellation,
    stack: Vec<usize>,
}

impl Iterator for RegionIter {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        let index = self.stack.pop()?;
        let node = self.parcellation.node(index);
        self.stack.extend(node.children.iter().rev());
        Some(Region::new(self.parcellation.clone(), index))
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.parcellation == other.parcellation
    }
}

impl Eq for Region {}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parcellation.id().hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region({} / {})", self.parcellation.id(), self.name())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
