// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Region specification language.
//!
//! - `hoc1 left`: every whitespace separated word must occur in the
//!   region name, ignoring case
//! - `/^Area 4[ap]/i`: regular expression searched in the name; the
//!   only supported flag is `i`
//! - [`RegionSpec::exact`]: the full name, case-sensitive

use regex::{Regex, RegexBuilder};
use std::fmt;
use std::str::FromStr;

use crate::error::{RegionError, RegionResult};

#[derive(Debug, Clone)]
pub enum RegionSpec {
    Words { text: String, words: Vec<String> },
    Pattern { text: String, regex: Regex },
    Exact(String),
}

impl RegionSpec {
    pub fn parse(text: &str) -> RegionResult<Self> {
        let trimmed = text.trim();
        if let Some((pattern, flags)) = split_pattern(trimmed) {
            return Self::pattern(trimmed, pattern, flags);
        }

        let words: Vec<String> = trimmed.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Err(RegionError::InvalidSpec {
                spec: text.to_string(),
                reason: "empty specification".to_string(),
            });
        }
        Ok(RegionSpec::Words {
            text: trimmed.to_string(),
            words,
        })
    }

    pub fn exact(name: impl Into<String>) -> Self {
        RegionSpec::Exact(name.into())
    }

    fn pattern(text: &str, pattern: &str, flags: &str) -> RegionResult<Self> {
        let invalid = |reason: String| RegionError::InvalidSpec {
            spec: text.to_string(),
            reason,
        };
        if let Some(flag) = flags.chars().find(|c| *c != 'i') {
            return Err(invalid(format!("unsupported regex flag '{flag}'")));
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.contains('i'))
            .build()
            .map_err(|e| invalid(e.to_string()))?;
        Ok(RegionSpec::Pattern {
            text: text.to_string(),
            regex,
        })
    }

    /// The specification as written.
    pub fn as_str(&self) -> &str {
        match self {
            RegionSpec::Words { text, .. } | RegionSpec::Pattern { text, .. } => text,
            RegionSpec::Exact(name) => name,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            RegionSpec::Words { words, .. } => {
                let name = name.to_lowercase();
                words.iter().all(|w| name.contains(w.as_str()))
            }
            RegionSpec::Pattern { regex, .. } => regex.is_match(name),
            RegionSpec::Exact(exact) => exact == name,
        }
    }

    /// True if every word of `name` also appears in this specification.
    ///
    /// Used to pick a single winner among several matching candidates.
    pub fn covers_name(&self, name: &str) -> bool {
        let query: Vec<String> = self.as_str().split_whitespace().map(str::to_lowercase).collect();
        name.split_whitespace()
            .map(str::to_lowercase)
            .all(|w| query.contains(&w))
    }
}

/// Split `/pattern/flags` into its parts.
fn split_pattern(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('/')?;
    let end = body.rfind('/')?;
    Some((&body[..end], &body[end + 1..]))
}

impl FromStr for RegionSpec {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionSpec::parse(s)
    }
}

impl PartialEq for RegionSpec {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other) && self.as_str() == other.as_str()
    }
}

impl Eq for RegionSpec {}

impl fmt::Display for RegionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
