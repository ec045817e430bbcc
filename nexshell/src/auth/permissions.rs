//! Permission evaluation.
//!
//! Permission codes are opaque dot-segmented strings (e.g. `"crm.customers.read"`).
//! Membership is exact-match only: `"crm.read"` does not imply
//! `"crm.customers.read"`. There are no wildcards and no hierarchy.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An unordered set of granted permission codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match membership test.
    pub fn grants(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(codes: Vec<String>) -> Self {
        codes.into_iter().collect()
    }
}
