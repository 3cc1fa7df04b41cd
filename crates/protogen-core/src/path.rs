//! Grouping-path policies
//!
//! A grouping path places a message's artifact in a sub-directory of the
//! output root. Every policy is a pure function of the protocol id, so the
//! same id always lands in the same directory across regenerations.

use crate::error::{GenerateError, GenerateResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Maps a protocol id to a relative directory (empty for the output root).
pub trait GroupingPath: Send + Sync {
    fn grouping_path(&self, protocol_id: u16) -> String;
}

/// Every artifact at the output root.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPath;

impl GroupingPath for FlatPath {
    fn grouping_path(&self, _protocol_id: u16) -> String {
        String::new()
    }
}

/// Fixed-size id ranges, e.g. ids 100..=199 in `p100` for a size of 100.
#[derive(Debug, Clone, Copy)]
pub struct BucketPath {
    size: u16,
}

impl BucketPath {
    pub fn new(size: u16) -> GenerateResult<Self> {
        if size == 0 {
            return Err(GenerateError::Config(
                "grouping bucket size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { size })
    }
}

impl GroupingPath for BucketPath {
    fn grouping_path(&self, protocol_id: u16) -> String {
        format!("p{}", (protocol_id / self.size) * self.size)
    }
}

/// Explicit per-id directories with a fallback policy for the rest.
pub struct ExplicitPaths {
    paths: HashMap<u16, String>,
    fallback: Box<dyn GroupingPath>,
}

impl ExplicitPaths {
    pub fn new(fallback: Box<dyn GroupingPath>) -> Self {
        Self {
            paths: HashMap::new(),
            fallback,
        }
    }

    pub fn with_path(mut self, protocol_id: u16, path: impl Into<String>) -> Self {
        self.paths.insert(protocol_id, normalize(&path.into()));
        self
    }
}

impl GroupingPath for ExplicitPaths {
    fn grouping_path(&self, protocol_id: u16) -> String {
        match self.paths.get(&protocol_id) {
            Some(path) => path.clone(),
            None => self.fallback.grouping_path(protocol_id),
        }
    }
}

/// Strip leading/trailing separators and unify on `/`.
fn normalize(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Serializable choice of grouping policy.
///
/// In TOML: `grouping = "flat"` or `grouping = { bucket = 100 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingPolicy {
    #[default]
    Flat,
    Bucket(u16),
}

impl GroupingPolicy {
    /// Instantiate the policy.
    pub fn build(self) -> GenerateResult<Box<dyn GroupingPath>> {
        Ok(match self {
            GroupingPolicy::Flat => Box::new(FlatPath),
            GroupingPolicy::Bucket(size) => Box::new(BucketPath::new(size)?),
        })
    }
}

impl FromStr for GroupingPolicy {
    type Err = GenerateError;

    /// Parse `flat` or `bucket:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("flat") {
            return Ok(GroupingPolicy::Flat);
        }
        if let Some(size) = s.strip_prefix("bucket:") {
            let size = size
                .trim()
                .parse::<u16>()
                .map_err(|_| GenerateError::Config(format!("invalid bucket size in '{s}'")))?;
            return Ok(GroupingPolicy::Bucket(size));
        }
        Err(GenerateError::Config(format!(
            "unknown grouping policy '{s}' (expected 'flat' or 'bucket:N')"
        )))
    }
}

#[cfg(test)]
#[path = "path/path_tests.rs"]
mod path_tests;
