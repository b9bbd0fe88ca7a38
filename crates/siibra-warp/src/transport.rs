// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Network boundary of the warp client.
//!
//! Transports speak in service space names and raw coordinates. Null
//! coordinates in a response come back as `NaN`; validating them is the
//! caller's job.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{WarpError, WarpResult};

/// Request/response access to a coordinate warping service.
pub trait WarpTransport: Send + Sync {
    fn transform_point(&self, source: &str, target: &str, coordinate: [f64; 3]) -> WarpResult<[f64; 3]>;

    /// Transform many coordinates in one request, preserving order.
    fn transform_points(
        &self,
        source: &str,
        target: &str,
        coordinates: &[[f64; 3]],
    ) -> WarpResult<Vec<[f64; 3]>>;
}

#[derive(Serialize)]
struct TransformPointsRequest<'a> {
    source_space: &'a str,
    target_space: &'a str,
    source_points: &'a [[f64; 3]],
}

#[derive(Deserialize)]
struct TransformPointResponse {
    target_point: [Option<f64>; 3],
}

#[derive(Deserialize)]
struct TransformPointsResponse {
    target_points: Vec<[Option<f64>; 3]>,
}

fn nan_for_null(raw: [Option<f64>; 3]) -> [f64; 3] {
    raw.map(|v| v.unwrap_or(f64::NAN))
}

/// Blocking HTTP transport for the spatial transformation REST API.
///
/// - `GET {base}/transform-point?source_space&target_space&x&y&z` -> `{"target_point": [x, y, z]}`
/// - `POST {base}/transform-points` with `{source_space, target_space, source_points}` ->
///   `{"target_points": [[x, y, z], ...]}`
///
/// Do not call from inside an async runtime worker; the blocking client
/// owns its own runtime.
pub struct HttpWarpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpWarpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> WarpResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WarpError::Transport(format!("HTTP client init failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl WarpTransport for HttpWarpTransport {
    fn transform_point(&self, source: &str, target: &str, coordinate: [f64; 3]) -> WarpResult<[f64; 3]> {
        let url = format!("{}/transform-point", self.base_url);
        debug!(%url, source, target, "warp single point");
        let [x, y, z] = coordinate.map(|v| v.to_string());
        let response = self
            .client
            .get(&url)
            .query(&[
                ("source_space", source),
                ("target_space", target),
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("z", z.as_str()),
            ])
            .send()?
            .error_for_status()?;
        let body: TransformPointResponse = response.json()?;
        Ok(nan_for_null(body.target_point))
    }

    fn transform_points(
        &self,
        source: &str,
        target: &str,
        coordinates: &[[f64; 3]],
    ) -> WarpResult<Vec<[f64; 3]>> {
        let url = format!("{}/transform-points", self.base_url);
        debug!(%url, source, target, count = coordinates.len(), "warp point batch");
        let response = self
            .client
            .post(&url)
            .json(&TransformPointsRequest {
                source_space: source,
                target_space: target,
                source_points: coordinates,
            })
            .send()?
            .error_for_status()?;
        let body: TransformPointsResponse = response.json()?;
        Ok(body.target_points.into_iter().map(nan_for_null).collect())
    }
}
