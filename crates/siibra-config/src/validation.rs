// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that values are within valid ranges before any network client
//! or cache is built from them.

use crate::{ConfigError, ConfigResult, SiibraConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - A non-empty http(s) warp service URL
/// - Positive timeout, chunk size and request parallelism
/// - Non-empty service names in the warp space table
/// - A known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SiibraConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_warp(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_warp(config: &SiibraConfig, errors: &mut Vec<ConfigValidationError>) {
    let warp = &config.warp;

    if warp.base_url.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "warp.base_url".to_string(),
        });
    } else if !(warp.base_url.starts_with("http://") || warp.base_url.starts_with("https://")) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "warp.base_url".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    if warp.timeout_secs == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "warp.timeout_secs".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if warp.chunk_size == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "warp.chunk_size".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if warp.parallel_requests == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "warp.parallel_requests".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    for (space_id, name) in &warp.spaces {
        if name.trim().is_empty() {
            errors.push(ConfigValidationError::InvalidValue {
                field: format!("warp.spaces.\"{}\"", space_id),
                reason: "service name must not be empty".to_string(),
            });
        }
    }
}

fn validate_logging(config: &SiibraConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SiibraConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut config = SiibraConfig::default();
        config.warp.chunk_size = 0;

        let result = validate_config(&config);
        assert!(result.is_err());

        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("warp.chunk_size"));
        }
    }

    #[test]
    fn test_bad_url_scheme() {
        let mut config = SiibraConfig::default();
        config.warp.base_url = "ftp://example.org".to_string();

        if let Err(ConfigError::ValidationError(msg)) = validate_config(&config) {
            assert!(msg.contains("warp.base_url"));
            assert!(msg.contains("http"));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SiibraConfig::default();
        config.warp.base_url = String::new();
        config.warp.timeout_secs = 0;
        config.logging.level = "loud".to_string();
        config
            .warp
            .spaces
            .insert("some/space".to_string(), " ".to_string());

        let Err(ConfigError::ValidationError(msg)) = validate_config(&config) else {
            panic!("expected validation error");
        };
        assert!(msg.contains("warp.base_url"));
        assert!(msg.contains("warp.timeout_secs"));
        assert!(msg.contains("logging.level"));
        assert!(msg.contains("some/space"));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = SiibraConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
