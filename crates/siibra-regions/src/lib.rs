// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # siibra-regions
//!
//! Reference spaces, parcellations and their region trees.
//!
//! A [`Parcellation`] owns an ordered region tree for one species.
//! [`Region`] values are lightweight handles into that tree and compare
//! by identity. Parcellations may be backed by a [`MaskProvider`] (for
//! example a [`LabelledMap`]) that turns regions into voxel masks.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
mod maps;
mod parcellation;
mod region;
mod registry;
mod space;
mod spec;

pub use error::{RegionError, RegionResult};
pub use maps::{LabelledMap, LabelledVolume, MaskProvider};
pub use parcellation::{Parcellation, ParcellationBuilder, RegionDefinition};
pub use region::{Region, RegionIter};
pub use registry::ParcellationRegistry;
pub use space::{MapType, Space};
pub use spec::RegionSpec;
