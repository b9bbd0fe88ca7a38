// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # siibra - spatial assignment for brain atlases
//!
//! Relates measurements in brain reference spaces (points, point clouds,
//! bounding boxes, voxel masks) to anatomical regions of parcellations and
//! to each other, with qualified results such as "is contained in" or
//! "overlaps with".
//!
//! ## Crates
//!
//! - [`locations`]: geometry primitives, voxel masks and spatial predicates
//! - [`warp`]: client for the coordinate warping service
//! - [`regions`]: reference spaces, parcellations, region trees and maps
//! - [`anchor`]: anatomical anchors and the memoizing assignment engine
//! - [`config`]: TOML configuration with environment and CLI overrides
//! - [`observability`]: logging setup and per-crate debug flags
//!
//! ## Feature Flags
//!
//! - **`parallel-warp`**: request point cloud chunks concurrently
//! - **`file-logging`**: rolling JSON log files next to console output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use siibra::prelude::*;
//!
//! let config = siibra::config::load_config(None, None).expect("configuration");
//! let registry = Arc::new(ParcellationRegistry::new());
//! let engine = AssignmentEngine::from_config(&config, registry).expect("engine");
//!
//! let anchor = AnatomicalAnchor::from_region_spec("hoc1 left", ["Homo sapiens"]);
//! let regions = anchor.regions(&engine).expect("decoded regions");
//! println!("{anchor} refers to {} region(s)", regions.len());
//! ```

pub use siibra_anchor as anchor;
pub use siibra_config as config;
pub use siibra_locations as locations;
pub use siibra_observability as observability;
pub use siibra_regions as regions;
pub use siibra_warp as warp;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::anchor::{
        AnatomicalAnchor, AnatomicalAssignment, AnchorError, AssignedStructure, AssignmentEngine, Concept,
        Qualification,
    };
    pub use crate::locations::{BoundingBox, Location, Point, PointCloud, SpaceId, VoxelMask, WholeBrain};
    pub use crate::regions::{
        LabelledMap, MapType, MaskProvider, Parcellation, ParcellationRegistry, Region, RegionSpec, Space,
    };
    pub use crate::warp::{SpaceWarper, WarpTransport};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let p = Location::from(Point::new([0.0; 3], "mni152"));
        assert_eq!(p.space_id(), Some(&SpaceId::from("mni152")));
        assert_eq!(Qualification::Contained.invert(), Qualification::Contains);
    }
}
