// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # siibra-warp
//!
//! Moves locations between brain reference spaces using a remote
//! nonlinear registration service.
//!
//! ```rust,no_run
//! use siibra_config::WarpConfig;
//! use siibra_locations::{Location, Point, SpaceId};
//! use siibra_warp::SpaceWarper;
//!
//! let config = WarpConfig::default();
//! let warper = SpaceWarper::from_config(&config).expect("HTTP client");
//! let (mni, colin) = (config.spaces.keys().next().unwrap(), config.spaces.keys().nth(1).unwrap());
//! let p = Location::from(Point::new([0.0, -20.0, 10.0], mni.as_str()));
//! let warped = warper.warp(&p, &SpaceId::from(colin.as_str())).expect("warp");
//! println!("{warped}");
//! ```
//!
//! ## Features
//! - `parallel`: request point cloud chunks concurrently on a bounded pool

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
mod transport;
mod warper;

pub use error::{WarpError, WarpResult};
pub use transport::{HttpWarpTransport, WarpTransport};
pub use warper::SpaceWarper;
