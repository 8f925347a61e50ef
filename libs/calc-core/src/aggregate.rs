//! Aggregate PnL Calculator — List-level summary
//!
//! Computed independently from the replay engine, using only list-level
//! sums. The formula scales total open notional by the fraction of open
//! quantity that was closed, i.e. it assumes closes are proportionally
//! representative of the blended open cost basis.
//!
//! For ledgers with interleaved opens and closes at varying prices this
//! total can legitimately differ from the replay engine's sequential
//! average-cost total. Both outputs are preserved; neither is authoritative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::entry::{EntryKind, PositionEntry};
use types::side::PositionSide;

/// Aggregate summary over one ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnLResult {
    /// Ratio-scaled blended-cost realized PnL
    pub total_pnl: Decimal,
    /// Sum of open notionals
    pub total_investment: Decimal,
    /// Investment plus PnL
    pub total_return: Decimal,
    /// Return on equity: PnL ÷ total open margin × 100; 0 without margin
    pub roe: Decimal,
    /// Participating OPEN entries used for the sums
    pub open_entries: Vec<PositionEntry>,
    /// Participating CLOSE entries used for the sums
    pub close_entries: Vec<PositionEntry>,
}

/// Summarize the ledger in one pass of list-level sums.
pub fn aggregate(ledger: &[PositionEntry], side: PositionSide) -> PnLResult {
    let (open_entries, close_entries): (Vec<_>, Vec<_>) = ledger
        .iter()
        .filter(|entry| entry.is_participating())
        .cloned()
        .partition(|entry| entry.kind == EntryKind::OPEN);

    let total_open_notional: Decimal =
        open_entries.iter().map(|e| e.price * e.quantity).sum();
    let total_open_qty: Decimal = open_entries.iter().map(|e| e.quantity).sum();
    let total_open_margin: Decimal = open_entries.iter().map(|e| e.margin_quote).sum();

    let total_close_notional: Decimal =
        close_entries.iter().map(|e| e.price * e.quantity).sum();
    let total_close_qty: Decimal = close_entries.iter().map(|e| e.quantity).sum();

    let quantity_ratio = if total_open_qty == Decimal::ZERO {
        Decimal::ZERO
    } else {
        total_close_qty / total_open_qty
    };

    let scaled_open = total_open_notional * quantity_ratio;
    let total_pnl = match side {
        PositionSide::LONG => total_close_notional - scaled_open,
        PositionSide::SHORT => scaled_open - total_close_notional,
    };

    let roe = if total_open_margin > Decimal::ZERO {
        total_pnl / total_open_margin * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    PnLResult {
        total_pnl,
        total_investment: total_open_notional,
        total_return: total_open_notional + total_pnl,
        roe,
        open_entries,
        close_entries,
    }
}
