// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, LogFormat, SiibraConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "siibra_configuration.toml";

/// Find the siibra configuration file
///
/// Search order:
/// 1. `SIIBRA_CONFIG_PATH` environment variable
/// 2. Current working directory: `./siibra_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SIIBRA_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SIIBRA_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet SIIBRA_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Validation is a separate step, see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SiibraConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SiibraConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SIIBRA_WARP_URL` -> `warp.base_url`
/// - `SIIBRA_WARP_TIMEOUT_SECS` -> `warp.timeout_secs`
/// - `SIIBRA_WARP_CHUNK_SIZE` -> `warp.chunk_size`
/// - `SIIBRA_LOG_LEVEL` -> `logging.level`
/// - `SIIBRA_ALIAS_TABLE` -> `assignment.alias_table`
///
/// Unparseable numeric values are ignored.
pub fn apply_environment_overrides(config: &mut SiibraConfig) {
    if let Ok(value) = env::var("SIIBRA_WARP_URL") {
        config.warp.base_url = value;
    }
    if let Ok(value) = env::var("SIIBRA_WARP_TIMEOUT_SECS") {
        if let Ok(secs) = value.parse::<u64>() {
            config.warp.timeout_secs = secs;
        }
    }
    if let Ok(value) = env::var("SIIBRA_WARP_CHUNK_SIZE") {
        if let Ok(size) = value.parse::<usize>() {
            config.warp.chunk_size = size;
        }
    }
    if let Ok(value) = env::var("SIIBRA_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("SIIBRA_ALIAS_TABLE") {
        config.assignment.alias_table = Some(PathBuf::from(value));
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"warp_url": "http://localhost:8080", "log_format": "json"}`)
pub fn apply_cli_overrides(config: &mut SiibraConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("warp_url") {
        config.warp.base_url = value.clone();
    }
    if let Some(value) = cli_args.get("warp_timeout_secs") {
        if let Ok(secs) = value.parse::<u64>() {
            config.warp.timeout_secs = secs;
        }
    }
    if let Some(value) = cli_args.get("warp_chunk_size") {
        if let Ok(size) = value.parse::<usize>() {
            config.warp.chunk_size = size;
        }
    }
    if let Some(value) = cli_args.get("warp_parallel_requests") {
        if let Ok(n) = value.parse::<usize>() {
            config.warp.parallel_requests = n;
        }
    }
    if let Some(value) = cli_args.get("alias_table") {
        config.assignment.alias_table = Some(PathBuf::from(value));
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        match value.to_lowercase().as_str() {
            "json" => config.logging.format = LogFormat::Json,
            "text" => config.logging.format = LogFormat::Text,
            _ => {}
        }
    }
    if let Some(value) = cli_args.get("log_dir") {
        config.logging.log_dir = Some(PathBuf::from(value));
    }
}
