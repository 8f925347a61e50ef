//! Opaque identifier types for ledger entities
//!
//! Freshly minted ids are backed by UUID v7 for time-sortable ordering.
//! Imported ledgers keep whatever ids they arrived with: the id is an
//! opaque string, unique within one ledger, used as the stat map key.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a ledger entry
///
/// Opaque and stable: the engine never interprets its contents, only uses
/// it as the key for per-entry stats. `Ord` so it can key a `BTreeMap`
/// with deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Mint a new EntryId with an embedded timestamp (UUID v7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wrap an externally supplied id verbatim (imports keep their ids)
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
