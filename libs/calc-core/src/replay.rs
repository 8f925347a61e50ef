//! Ledger Replay Engine — Sequential position accounting
//!
//! A single left-to-right fold over the ledger, carrying the running state
//! and emitting one `PositionStat` per entry, keyed by entry id. The output
//! map is a `BTreeMap` so iteration order is deterministic across runs.
//!
//! The replay never fails: skipped entries produce inactive stats, a close
//! requesting more than is held is silently capped (the validation guard is
//! the layer that surfaces that to the user), and every division is guarded.

use crate::liquidation::liquidation_price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::entry::{EntryKind, PositionEntry};
use types::ids::EntryId;
use types::numeric::clamp_dust;
use types::side::PositionSide;

// ---------------------------------------------------------------------------
// Per-entry stat
// ---------------------------------------------------------------------------

/// Snapshot of the position immediately after one entry is replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStat {
    /// Net open quantity, signed by ledger side (negative for SHORT)
    pub holdings: Decimal,
    /// Cost-basis-weighted average price; `None` when holdings are zero
    pub average_price: Option<Decimal>,
    /// Realized PnL accumulated up to and including this entry
    pub cumulative_pnl: Decimal,
    /// False for disabled or half-specified entries
    pub is_active: bool,
    /// Margin allocated to currently-open quantity
    pub used_margin: Decimal,
    /// used_margin ÷ capital; 0 when capital is unset
    pub margin_usage_ratio: Decimal,
    /// Estimated liquidation price; only present on active OPEN entries
    pub liquidation_price: Option<Decimal>,
}

impl PositionStat {
    /// Stat for an entry that did not participate: everything blanked.
    fn inactive() -> Self {
        Self {
            holdings: Decimal::ZERO,
            average_price: None,
            cumulative_pnl: Decimal::ZERO,
            is_active: false,
            used_margin: Decimal::ZERO,
            margin_usage_ratio: Decimal::ZERO,
            liquidation_price: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Running state
// ---------------------------------------------------------------------------

/// Engine-internal state carried through the fold.
#[derive(Debug, Clone, Default)]
struct RunningState {
    /// Unsigned net open quantity (sign is applied on output)
    current_quantity: Decimal,
    /// Cost basis of current holdings
    total_cost: Decimal,
    /// Realized PnL so far
    cumulative_pnl: Decimal,
    /// Margin allocated to open quantity
    used_margin: Decimal,
    /// Open quantity remaining from OPEN entries (for proportional release)
    total_open_quantity: Decimal,
    /// Open margin remaining from OPEN entries (for proportional release)
    total_open_margin: Decimal,
    /// Price of the last active entry (informational, per-step volatility)
    last_price: Decimal,
}

impl RunningState {
    /// Collapse sub-ε residues left by proportional release arithmetic.
    fn clamp(&mut self) {
        self.current_quantity = clamp_dust(self.current_quantity);
        self.total_open_quantity = clamp_dust(self.total_open_quantity);
        self.total_open_margin = clamp_dust(self.total_open_margin);
        self.used_margin = clamp_dust(self.used_margin);
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Replay the ledger in order, producing one stat per entry.
///
/// `capital ≤ 0` means no capital was set (usage ratio reported as 0).
/// `leverage` only feeds the liquidation estimate on OPEN entries.
pub fn replay(
    ledger: &[PositionEntry],
    side: PositionSide,
    capital: Decimal,
    leverage: u8,
) -> BTreeMap<EntryId, PositionStat> {
    let mut state = RunningState::default();
    let mut stats = BTreeMap::new();

    for entry in ledger {
        if !entry.is_participating() {
            stats.insert(entry.id.clone(), PositionStat::inactive());
            continue;
        }

        let liq = match entry.kind {
            EntryKind::OPEN => {
                apply_open(&mut state, entry);
                Some(liquidation_price(entry.price, leverage, side))
            }
            EntryKind::CLOSE => {
                apply_close(&mut state, entry, side);
                None
            }
        };

        state.clamp();
        state.last_price = entry.price;

        stats.insert(entry.id.clone(), snapshot(&state, side, capital, liq));
    }

    stats
}

/// OPEN: grow cost basis, holdings, and both margin pools.
fn apply_open(state: &mut RunningState, entry: &PositionEntry) {
    state.total_cost += entry.price * entry.quantity;
    state.current_quantity += entry.quantity;
    state.used_margin += entry.margin_quote;
    state.total_open_quantity += entry.quantity;
    state.total_open_margin += entry.margin_quote;
}

/// CLOSE: realize PnL at the running average, release margin proportionally.
fn apply_close(state: &mut RunningState, entry: &PositionEntry, side: PositionSide) {
    // Average cost; the close's own price when flat (keeps PnL delta at 0)
    let avg_price = if state.current_quantity > Decimal::ZERO {
        state.total_cost / state.current_quantity
    } else {
        entry.price
    };

    // Executable quantity is capped at what is actually held
    let executed = entry.quantity.min(state.current_quantity);

    state.cumulative_pnl += (entry.price - avg_price) * executed * side.sign();
    state.total_cost -= avg_price * executed;
    state.current_quantity -= executed;

    // Release margin in proportion to the open quantity being retired
    let released = if state.total_open_quantity > Decimal::ZERO {
        state.total_open_margin * (executed / state.total_open_quantity)
    } else {
        Decimal::ZERO
    };
    state.used_margin = (state.used_margin - released).max(Decimal::ZERO);
    state.total_open_quantity -= executed;
    state.total_open_margin = (state.total_open_margin - released).max(Decimal::ZERO);
}

/// Emit the post-entry stat for an active entry.
fn snapshot(
    state: &RunningState,
    side: PositionSide,
    capital: Decimal,
    liquidation: Option<Decimal>,
) -> PositionStat {
    let average_price = if state.current_quantity > Decimal::ZERO {
        Some(state.total_cost / state.current_quantity)
    } else {
        None
    };
    let margin_usage_ratio = if capital > Decimal::ZERO {
        state.used_margin / capital
    } else {
        Decimal::ZERO
    };

    PositionStat {
        holdings: side.sign() * state.current_quantity,
        average_price,
        cumulative_pnl: state.cumulative_pnl,
        is_active: true,
        used_margin: state.used_margin,
        margin_usage_ratio,
        liquidation_price: liquidation,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use types::entry::FieldUpdate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn open(price: u64, qty: u64, margin: u64) -> PositionEntry {
        PositionEntry::with_values(
            EntryKind::OPEN,
            Decimal::from(price),
            Decimal::from(qty),
            Decimal::from(margin),
        )
    }

    fn close(price: u64, qty: u64) -> PositionEntry {
        PositionEntry::with_values(
            EntryKind::CLOSE,
            Decimal::from(price),
            Decimal::from(qty),
            Decimal::ZERO,
        )
    }

    #[test]
    fn test_single_open_simple_average() {
        // Open 10 @ 100, margin 100, leverage 10, LONG
        let ledger = vec![open(100, 10, 100)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);

        let stat = &stats[&ledger[0].id];
        assert!(stat.is_active);
        assert_eq!(stat.holdings, Decimal::from(10));
        assert_eq!(stat.average_price, Some(Decimal::from(100)));
        assert_eq!(stat.cumulative_pnl, Decimal::ZERO);
        assert_eq!(stat.used_margin, Decimal::from(100));
        // mmr = 1/10 − 0.02 = 0.08 → 100 × 0.92 = 92
        assert_eq!(stat.liquidation_price, Some(dec("92")));
    }

    #[test]
    fn test_full_close_with_profit() {
        // Open 10 @ 100, close 10 @ 120 → (120 − 100) × 10 = 200
        let ledger = vec![open(100, 10, 100), close(120, 10)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);

        let stat = &stats[&ledger[1].id];
        assert_eq!(stat.holdings, Decimal::ZERO);
        assert_eq!(stat.average_price, None);
        assert_eq!(stat.cumulative_pnl, Decimal::from(200));
        assert_eq!(stat.used_margin, Decimal::ZERO);
        assert_eq!(stat.liquidation_price, None);
    }

    #[test]
    fn test_short_side_sign_flip() {
        // Short: open 10 @ 100, close 10 @ 90 → (90 − 100) × 10 × (−1) = 100
        let ledger = vec![open(100, 10, 100), close(90, 10)];
        let stats = replay(&ledger, PositionSide::SHORT, Decimal::ZERO, 10);

        let stat = &stats[&ledger[1].id];
        assert_eq!(stat.cumulative_pnl, Decimal::from(100));
    }

    #[test]
    fn test_short_holdings_are_negative() {
        let ledger = vec![open(100, 10, 100)];
        let stats = replay(&ledger, PositionSide::SHORT, Decimal::ZERO, 10);
        assert_eq!(stats[&ledger[0].id].holdings, Decimal::from(-10));
    }

    #[test]
    fn test_over_close_is_capped_not_negative() {
        // Close 15 against holdings of 10: executed is exactly 10
        let ledger = vec![open(100, 10, 100), close(120, 15)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);

        let stat = &stats[&ledger[1].id];
        assert_eq!(stat.holdings, Decimal::ZERO);
        // PnL reflects only the executable 10
        assert_eq!(stat.cumulative_pnl, Decimal::from(200));
    }

    #[test]
    fn test_close_while_flat_is_a_no_op() {
        // Average falls back to the close's own price → delta 0
        let ledger = vec![close(120, 10)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);

        let stat = &stats[&ledger[0].id];
        assert!(stat.is_active);
        assert_eq!(stat.holdings, Decimal::ZERO);
        assert_eq!(stat.cumulative_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_partial_close_releases_margin_proportionally() {
        // Open 10 @ 100 (margin 100), close 5 @ 110
        let ledger = vec![open(100, 10, 100), close(110, 5)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);

        let stat = &stats[&ledger[1].id];
        assert_eq!(stat.holdings, Decimal::from(5));
        assert_eq!(stat.average_price, Some(Decimal::from(100)));
        assert_eq!(stat.cumulative_pnl, Decimal::from(50));
        // Half the open quantity retired → half the margin released
        assert_eq!(stat.used_margin, Decimal::from(50));
    }

    #[test]
    fn test_blended_average_across_two_opens() {
        // Open 10 @ 100 then 10 @ 200 → avg 150; close 10 @ 150 → PnL 0
        let ledger = vec![open(100, 10, 100), open(200, 10, 200), close(150, 10)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);

        let after_close = &stats[&ledger[2].id];
        assert_eq!(after_close.cumulative_pnl, Decimal::ZERO);
        assert_eq!(after_close.holdings, Decimal::from(10));
        assert_eq!(after_close.average_price, Some(Decimal::from(150)));
        // Half of 300 total open margin released
        assert_eq!(after_close.used_margin, Decimal::from(150));
    }

    #[test]
    fn test_margin_conservation_without_closes() {
        let ledger = vec![open(100, 10, 100), open(120, 5, 60), open(90, 2, 18)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);
        let last = &stats[&ledger[2].id];
        assert_eq!(last.used_margin, Decimal::from(178));
    }

    #[test]
    fn test_disabled_entry_is_neutral() {
        let mut disabled = open(999, 99, 9999);
        disabled.apply(FieldUpdate::SetEnabled(false), 10);

        let with_disabled = vec![open(100, 10, 100), disabled, close(120, 10)];
        let without = vec![with_disabled[0].clone(), with_disabled[2].clone()];

        let stats_a = replay(&with_disabled, PositionSide::LONG, Decimal::ZERO, 10);
        let stats_b = replay(&without, PositionSide::LONG, Decimal::ZERO, 10);

        // Disabled stat is blanked
        let skipped = &stats_a[&with_disabled[1].id];
        assert!(!skipped.is_active);
        assert_eq!(skipped.holdings, Decimal::ZERO);
        assert_eq!(skipped.average_price, None);
        assert_eq!(skipped.liquidation_price, None);

        // Remaining entries identical to a ledger without the disabled row
        assert_eq!(stats_a[&with_disabled[0].id], stats_b[&without[0].id]);
        assert_eq!(stats_a[&with_disabled[2].id], stats_b[&without[1].id]);
    }

    #[test]
    fn test_half_specified_entry_is_inactive() {
        let mut entry = PositionEntry::open_seed();
        entry.apply(FieldUpdate::SetPrice(Decimal::from(100)), 10);
        // quantity still zero → does not participate
        let ledger = vec![entry];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);
        assert!(!stats[&ledger[0].id].is_active);
    }

    #[test]
    fn test_margin_usage_ratio() {
        let ledger = vec![open(100, 10, 100)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::from(1000), 10);
        assert_eq!(stats[&ledger[0].id].margin_usage_ratio, dec("0.1"));
    }

    #[test]
    fn test_margin_usage_ratio_zero_without_capital() {
        let ledger = vec![open(100, 10, 100)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);
        assert_eq!(stats[&ledger[0].id].margin_usage_ratio, Decimal::ZERO);
    }

    #[test]
    fn test_residue_clamped_after_fractional_close() {
        // Close all but 0.00001 of the position: the leftover quantity and
        // margin are below ε and must clamp to exactly zero
        let mut fractional = close(100, 0);
        fractional.apply(FieldUpdate::SetQuantity(dec("0.99999")), 10);
        let ledger = vec![open(100, 1, 1), fractional];

        let stats = replay(&ledger, PositionSide::LONG, Decimal::ZERO, 10);
        let stat = &stats[&ledger[1].id];
        assert_eq!(stat.holdings, Decimal::ZERO);
        assert_eq!(stat.average_price, None);
        assert_eq!(stat.used_margin, Decimal::ZERO);
    }

    #[test]
    fn test_replay_is_idempotent() {
        let ledger = vec![open(100, 10, 100), open(200, 5, 100), close(180, 12)];
        let a = replay(&ledger, PositionSide::LONG, Decimal::from(500), 10);
        let b = replay(&ledger, PositionSide::LONG, Decimal::from(500), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_ledger() {
        let stats = replay(&[], PositionSide::LONG, Decimal::ZERO, 10);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_stat_serialization_wire_names() {
        let ledger = vec![open(100, 10, 100)];
        let stats = replay(&ledger, PositionSide::LONG, Decimal::from(1000), 10);
        let json = serde_json::to_string(&stats[&ledger[0].id]).unwrap();
        assert!(json.contains("\"averagePrice\""));
        assert!(json.contains("\"cumulativePnl\""));
        assert!(json.contains("\"marginUsageRatio\""));
        assert!(json.contains("\"liquidationPrice\""));
    }
}
