//! Ledger entry model
//!
//! A ledger is an ordered sequence of `PositionEntry` instructions. Order is
//! significant: it defines the replay sequence and therefore average cost
//! and PnL attribution. The engine never re-sorts; reordering is a caller
//! (UI) concern.
//!
//! The four numeric fields are linked (price × quantity = notional;
//! notional ÷ leverage = margin). Edits arrive as `FieldUpdate` commands so
//! each field's legal value type and side effects are checked at compile
//! time rather than through a stringly-typed update path.

use crate::ids::EntryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry kind: open adds to holdings, close retires them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    /// Opens (adds to) the position
    OPEN,
    /// Closes (retires) part or all of the position
    CLOSE,
}

/// One ledger instruction
///
/// `notional_quote` is stored rather than recomputed on read: the UI lets
/// the user edit it directly, and `apply` keeps it consistent with
/// price × quantity. The engine treats it as derived, never authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    /// Unit price in quote currency, > 0 when the entry participates
    pub price: Decimal,
    /// Base-asset quantity, > 0 when the entry participates
    pub quantity: Decimal,
    /// quantity × price, in quote currency
    pub notional_quote: Decimal,
    /// Margin allocated to this entry (only meaningful for OPEN)
    pub margin_quote: Decimal,
    /// Disabled entries are skipped by every computation but keep their slot
    pub enabled: bool,
}

/// A single field edit, one variant per editable field
///
/// Precedence of derived-field recomputation:
/// - price or quantity changed → notional = price × quantity, then margin
/// - notional changed → quantity = notional ÷ price (price > 0), then margin
/// - margin changed → stored as-is (manual override, OPEN only)
/// - kind changed to CLOSE → margin zeroed (margin is an open-side concept)
/// - enabled toggled → flag only, numbers untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    SetPrice(Decimal),
    SetQuantity(Decimal),
    SetNotional(Decimal),
    SetMargin(Decimal),
    SetKind(EntryKind),
    SetEnabled(bool),
}

impl PositionEntry {
    /// Create a zero-valued entry of the given kind
    pub fn new(kind: EntryKind) -> Self {
        Self {
            id: EntryId::new(),
            kind,
            price: Decimal::ZERO,
            quantity: Decimal::ZERO,
            notional_quote: Decimal::ZERO,
            margin_quote: Decimal::ZERO,
            enabled: true,
        }
    }

    /// Seed OPEN row for a freshly constructed ledger
    pub fn open_seed() -> Self {
        Self::new(EntryKind::OPEN)
    }

    /// Seed CLOSE row for a freshly constructed ledger
    pub fn close_seed() -> Self {
        Self::new(EntryKind::CLOSE)
    }

    /// Create a fully populated entry (notional derived from price × quantity)
    pub fn with_values(
        kind: EntryKind,
        price: Decimal,
        quantity: Decimal,
        margin_quote: Decimal,
    ) -> Self {
        Self {
            id: EntryId::new(),
            kind,
            price,
            quantity,
            notional_quote: price * quantity,
            margin_quote,
            enabled: true,
        }
    }

    /// Whether this entry takes part in computation:
    /// enabled with both price and quantity set
    pub fn is_participating(&self) -> bool {
        self.enabled && self.price > Decimal::ZERO && self.quantity > Decimal::ZERO
    }

    /// Apply a field edit, recomputing linked fields per the documented
    /// precedence. `leverage` is the ledger-wide setting used to derive
    /// margin from notional.
    pub fn apply(&mut self, update: FieldUpdate, leverage: u8) {
        match update {
            FieldUpdate::SetPrice(price) => {
                self.price = price;
                self.recompute_notional(leverage);
            }
            FieldUpdate::SetQuantity(quantity) => {
                self.quantity = quantity;
                self.recompute_notional(leverage);
            }
            FieldUpdate::SetNotional(notional) => {
                self.notional_quote = notional;
                if self.price > Decimal::ZERO {
                    self.quantity = notional / self.price;
                }
                self.recompute_margin(leverage);
            }
            FieldUpdate::SetMargin(margin) => {
                // Manual override; margin has no meaning on CLOSE rows
                if self.kind == EntryKind::OPEN {
                    self.margin_quote = margin;
                }
            }
            FieldUpdate::SetKind(kind) => {
                self.kind = kind;
                if kind == EntryKind::CLOSE {
                    self.margin_quote = Decimal::ZERO;
                }
            }
            FieldUpdate::SetEnabled(enabled) => {
                self.enabled = enabled;
            }
        }
    }

    /// notional = price × quantity, then margin
    fn recompute_notional(&mut self, leverage: u8) {
        self.notional_quote = self.price * self.quantity;
        self.recompute_margin(leverage);
    }

    /// margin = notional ÷ leverage (OPEN only)
    fn recompute_margin(&mut self, leverage: u8) {
        if self.kind == EntryKind::OPEN {
            self.margin_quote = self.notional_quote / Decimal::from(leverage.max(1));
        }
    }
}
