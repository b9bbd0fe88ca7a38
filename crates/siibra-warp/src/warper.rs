// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use ahash::AHashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use siibra_config::WarpConfig;
use siibra_locations::{BoundingBox, Location, Point, PointCloud, SpaceId, WholeBrain};

use crate::error::{WarpError, WarpResult};
use crate::transport::{HttpWarpTransport, WarpTransport};

/// Warps locations between reference spaces through a [`WarpTransport`].
///
/// Only spaces listed in the space table are accepted; anything else fails
/// with [`WarpError::UnsupportedSpace`] before a request is made. Point
/// clouds are sent in chunks and reassembled in their original order.
#[derive(Clone)]
pub struct SpaceWarper {
    transport: Arc<dyn WarpTransport>,
    service_names: AHashMap<SpaceId, String>,
    chunk_size: usize,
    parallel_requests: usize,
}

impl SpaceWarper {
    pub fn new(transport: Arc<dyn WarpTransport>) -> Self {
        Self::with_config(transport, &WarpConfig::default())
    }

    /// Use `transport` with the space table and batching settings of `config`.
    pub fn with_config(transport: Arc<dyn WarpTransport>, config: &WarpConfig) -> Self {
        Self {
            transport,
            service_names: config
                .spaces
                .iter()
                .map(|(id, name)| (SpaceId::from(id.as_str()), name.clone()))
                .collect(),
            chunk_size: config.chunk_size.max(1),
            parallel_requests: config.parallel_requests.max(1),
        }
    }

    /// HTTP client against `config.base_url`.
    pub fn from_config(config: &WarpConfig) -> WarpResult<Self> {
        let transport = HttpWarpTransport::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::with_config(Arc::new(transport), config))
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Register an extra space under the name the service knows it by.
    pub fn with_space(mut self, space: impl Into<SpaceId>, service_name: impl Into<String>) -> Self {
        self.service_names.insert(space.into(), service_name.into());
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn parallel_requests(&self) -> usize {
        self.parallel_requests
    }

    pub fn supports(&self, space: &SpaceId) -> bool {
        self.service_names.contains_key(space)
    }

    pub fn supported_spaces(&self) -> impl Iterator<Item = &SpaceId> {
        self.service_names.keys()
    }

    fn service_name(&self, space: &SpaceId) -> WarpResult<&str> {
        self.service_names
            .get(space)
            .map(String::as_str)
            .ok_or_else(|| WarpError::UnsupportedSpace {
                space: space.clone(),
            })
    }

    /// Express `location` in `target`.
    ///
    /// Returns an unchanged copy when the location already lives in `target`.
    pub fn warp(&self, location: &Location, target: &SpaceId) -> WarpResult<Location> {
        let source = location.require_space()?;
        if source == target {
            return Ok(location.clone());
        }
        let source_name = self.service_name(source)?;
        let target_name = self.service_name(target)?;

        let warped = match location {
            Location::Point(p) => {
                let raw = self
                    .transport
                    .transform_point(source_name, target_name, p.coordinate())
                    .map_err(|e| e.for_pair(source, target))?;
                let coordinate = checked(raw, 0, source, target)?;
                Location::Point(Point::new(coordinate, target.clone()).with_sigma(p.sigma()))
            }
            Location::PointCloud(pc) => {
                Location::PointCloud(self.warp_cloud(pc, source, target, source_name, target_name)?)
            }
            Location::BoundingBox(bb) => {
                let corners = self.warp_cloud(&bb.corners(), source, target, source_name, target_name)?;
                Location::BoundingBox(BoundingBox::enclosing(&corners)?)
            }
            Location::WholeBrain(_) => Location::WholeBrain(WholeBrain::new(target.clone())),
        };
        Ok(warped)
    }

    fn warp_cloud(
        &self,
        cloud: &PointCloud,
        source: &SpaceId,
        target: &SpaceId,
        source_name: &str,
        target_name: &str,
    ) -> WarpResult<PointCloud> {
        let coordinates = cloud.coordinates();
        if coordinates.len() > self.chunk_size {
            info!(
                count = coordinates.len(),
                chunks = coordinates.len().div_ceil(self.chunk_size),
                "warping large point cloud"
            );
        }
        let chunks: Vec<&[[f64; 3]]> = coordinates.chunks(self.chunk_size).collect();
        let results = self.request_chunks(&chunks, source_name, target_name);

        let mut warped = Vec::with_capacity(coordinates.len());
        for (chunk, result) in chunks.iter().zip(results) {
            let raw = result.map_err(|e| e.for_pair(source, target))?;
            if raw.len() != chunk.len() {
                return Err(WarpError::WarpingFailed {
                    source_space: source.clone(),
                    target_space: target.clone(),
                    reason: format!("expected {} points, service returned {}", chunk.len(), raw.len()),
                });
            }
            for coordinate in raw {
                let index = warped.len();
                warped.push(checked(coordinate, index, source, target)?);
            }
        }
        debug!(count = warped.len(), %source, %target, "warped point cloud");
        Ok(cloud.with_coordinates(warped, Some(target.clone()))?)
    }

    #[cfg(not(feature = "parallel"))]
    fn request_chunks(
        &self,
        chunks: &[&[[f64; 3]]],
        source_name: &str,
        target_name: &str,
    ) -> Vec<WarpResult<Vec<[f64; 3]>>> {
        chunks
            .iter()
            .map(|chunk| self.transport.transform_points(source_name, target_name, chunk))
            .collect()
    }

    /// Chunks are requested on a bounded pool; results keep chunk order.
    #[cfg(feature = "parallel")]
    fn request_chunks(
        &self,
        chunks: &[&[[f64; 3]]],
        source_name: &str,
        target_name: &str,
    ) -> Vec<WarpResult<Vec<[f64; 3]>>> {
        use rayon::prelude::*;

        let request = |chunk: &&[[f64; 3]]| self.transport.transform_points(source_name, target_name, chunk);
        if chunks.len() < 2 {
            return chunks.iter().map(request).collect();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallel_requests)
            .build()
        {
            Ok(pool) => pool.install(|| chunks.par_iter().map(request).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "warp thread pool unavailable, requesting chunks sequentially");
                chunks.iter().map(request).collect()
            }
        }
    }
}

fn checked(raw: [f64; 3], index: usize, source: &SpaceId, target: &SpaceId) -> WarpResult<[f64; 3]> {
    if raw.iter().all(|v| v.is_finite()) {
        Ok(raw)
    } else {
        Err(WarpError::WarpingFailed {
            source_space: source.clone(),
            target_space: target.clone(),
            reason: format!("service returned an invalid coordinate at index {index}: {raw:?}"),
        })
    }
}
