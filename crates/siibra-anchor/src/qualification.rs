// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an anchor relates to an atlas concept.
///
/// Variants are declared in rank order; sorting assignments puts the
/// strongest relation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Qualification {
    Exact,
    Overlaps,
    Contained,
    Contains,
}

impl Qualification {
    pub const ALL: [Qualification; 4] = [
        Qualification::Exact,
        Qualification::Overlaps,
        Qualification::Contained,
        Qualification::Contains,
    ];

    /// The relation seen from the other side.
    pub fn invert(self) -> Self {
        match self {
            Qualification::Contained => Qualification::Contains,
            Qualification::Contains => Qualification::Contained,
            other => other,
        }
    }

    /// Verb phrase for human readable assignment messages.
    pub fn verb(self) -> &'static str {
        match self {
            Qualification::Exact => "coincides with",
            Qualification::Overlaps => "overlaps with",
            Qualification::Contained => "is contained in",
            Qualification::Contains => "contains",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Qualification::Exact => "EXACT",
            Qualification::Overlaps => "OVERLAPS",
            Qualification::Contained => "CONTAINED",
            Qualification::Contains => "CONTAINS",
        }
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_inversion_is_identity() {
        for q in Qualification::ALL {
            assert_eq!(q.invert().invert(), q);
        }
        assert_eq!(Qualification::Contained.invert(), Qualification::Contains);
        assert_eq!(Qualification::Overlaps.invert(), Qualification::Overlaps);
    }

    #[test]
    fn test_rank_order() {
        let mut qs = vec![
            Qualification::Contains,
            Qualification::Exact,
            Qualification::Contained,
            Qualification::Overlaps,
        ];
        qs.sort();
        assert_eq!(qs, Qualification::ALL.to_vec());
    }

    #[test]
    fn test_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Qualification::Contained).unwrap(), "\"CONTAINED\"");
        let q: Qualification = serde_json::from_str("\"OVERLAPS\"").unwrap();
        assert_eq!(q, Qualification::Overlaps);
    }
}
