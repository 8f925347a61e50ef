//! Position side
//!
//! A ledger is either long or short as a whole; the side flips the sign of
//! realized PnL attribution and of reported holdings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position side enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    /// Long position - profit when price increases
    LONG,
    /// Short position - profit when price decreases
    SHORT,
}

impl PositionSide {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            PositionSide::LONG => PositionSide::SHORT,
            PositionSide::SHORT => PositionSide::LONG,
        }
    }

    /// Attribution sign: +1 for LONG, −1 for SHORT.
    ///
    /// Multiplies close PnL deltas and reported holdings.
    pub fn sign(&self) -> Decimal {
        match self {
            PositionSide::LONG => Decimal::ONE,
            PositionSide::SHORT => -Decimal::ONE,
        }
    }
}
