// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # siibra-observability
//!
//! Logging setup shared by all siibra crates, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: rolling JSON log files next to console output

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;
pub use siibra_config::{LogFormat, LoggingConfig};

/// Known siibra crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "siibra",
    "siibra-config",
    "siibra-locations",
    "siibra-warp",
    "siibra-regions",
    "siibra-anchor",
];
