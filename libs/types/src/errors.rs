//! Error taxonomy for the calculator suite
//!
//! Validation issues are advisory data, never raised: the guard returns
//! them as a list and the engine stays defined on invalid input. Only the
//! session codec has a hard error path (malformed or future-version JSON).

use rust_decimal::Decimal;
use thiserror::Error;

/// A single validation violation, rendered for the user via `Display`
///
/// Indexes are 1-based positions in the ledger as the user sees the rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("At least one enabled entry with both price and quantity is required")]
    NoParticipatingEntries,

    #[error("Entry {index}: price and quantity must both be set or both be left empty")]
    HalfSpecifiedEntry { index: usize },

    #[error(
        "Entry {index}: allocated margin {used} exceeds available capital {capital} by {excess}"
    )]
    CapitalExceeded {
        index: usize,
        used: Decimal,
        capital: Decimal,
        excess: Decimal,
    },

    #[error(
        "Entry {index}: close quantity {requested} exceeds current holdings {available} by {shortfall}"
    )]
    OverClose {
        index: usize,
        requested: Decimal,
        available: Decimal,
        shortfall: Decimal,
    },
}

/// Session codec errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported session version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
