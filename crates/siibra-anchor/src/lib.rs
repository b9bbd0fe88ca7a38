// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# siibra-anchor

Anatomical anchoring and qualified spatial assignment.

An [`AnatomicalAnchor`] ties data to a location, a region specification,
or both. Assigning it to a [`Concept`] (a space, a region or another
location) yields [`AnatomicalAssignment`]s qualified as
[`Qualification::Exact`], `Overlaps`, `Contained` or `Contains`.

The [`AssignmentEngine`] does the pairwise work:

- region vs region through the parcellation tree
- location vs location through geometric predicates, warping into a common
  space when needed
- location vs region through the region's labelled mask

All of it is memoized on the engine instance, so repeated questions return
the same `Arc` and never rebuild masks or repeat warps. Call
[`AssignmentEngine::clear`] to start over.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod alias;
mod anchor;
mod assignment;
mod concept;
mod engine;
mod error;
mod memo;
mod qualification;

pub use alias::{Alias, AliasTable};
pub use anchor::{AnatomicalAnchor, Assignments};
pub use assignment::{AnatomicalAssignment, AssignedStructure};
pub use concept::{Concept, ConceptKey};
pub use engine::{AssignmentEngine, EngineStats, Match, ResolvedRegions};
pub use error::{AnchorError, AnchorResult};
pub use memo::OnceMap;
pub use qualification::Qualification;
