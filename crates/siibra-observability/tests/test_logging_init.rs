// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Global subscriber installation. Lives in its own test binary because the
//! subscriber can only be set once per process.

use siibra_observability::{init_logging, CrateDebugFlags, LoggingConfig};

#[test]
fn test_init_logging_once() {
    let flags = CrateDebugFlags::from_args(vec!["--debug-siibra-anchor".to_string()]);
    let config = LoggingConfig::default();

    let guard = init_logging(&flags, &config).expect("first initialization succeeds");
    assert!(guard.log_dir().is_none());
    tracing::info!("logging initialized");

    assert!(init_logging(&flags, &config).is_err());
}
