// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LocationError, LocationResult};

/// Identifier of a reference space (e.g. an EBRAINS reference space id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(String);

impl SpaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpaceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SpaceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SpaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fail with [`LocationError::IncompatibleSpace`] unless both spaces are equal.
///
/// Two space-less entities are considered compatible.
pub fn ensure_same_space(left: Option<&SpaceId>, right: Option<&SpaceId>) -> LocationResult<()> {
    if left == right {
        Ok(())
    } else {
        Err(LocationError::IncompatibleSpace {
            left: left.cloned(),
            right: right.cloned(),
        })
    }
}
