// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `siibra_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Public endpoint of the spatial transformation service.
pub const DEFAULT_WARP_URL: &str = "https://hbp-spatial-backend.apps.hbp.eu/v1";

/// Points per request when warping point clouds.
pub const DEFAULT_WARP_CHUNK_SIZE: usize = 1000;

/// Reference spaces known to the warp service, keyed by space id, with the
/// name the service expects.
pub const DEFAULT_WARP_SPACES: &[(&str, &str)] = &[
    (
        "minds/core/referencespace/v1.0.0/dafcffc5-4826-4bf1-8ff6-46b8a31ff8e2",
        "MNI 152 ICBM 2009c Nonlinear Asymmetric",
    ),
    (
        "minds/core/referencespace/v1.0.0/7f39f7be-445b-47c0-9791-e971c0b6d992",
        "MNI Colin 27",
    ),
    (
        "minds/core/referencespace/v1.0.0/a1655b99-82f1-420f-a3c2-fe80fd4c8588",
        "Big Brain (Histology)",
    ),
];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SiibraConfig {
    pub warp: WarpConfig,
    pub assignment: AssignmentConfig,
    pub logging: LoggingConfig,
}

/// Coordinate warping service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WarpConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub chunk_size: usize,
    /// Concurrent chunk requests when built with the `parallel` feature
    pub parallel_requests: usize,
    /// Space id -> service space name
    pub spaces: BTreeMap<String, String>,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WARP_URL.to_string(),
            timeout_secs: 30,
            chunk_size: DEFAULT_WARP_CHUNK_SIZE,
            parallel_requests: 4,
            spaces: DEFAULT_WARP_SPACES
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        }
    }
}

/// Anatomical assignment configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// JSON alias table for cross-species region specs
    pub alias_table: Option<PathBuf>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    /// Directory for rolling log files (requires the `file-logging` feature)
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
        }
    }
}
