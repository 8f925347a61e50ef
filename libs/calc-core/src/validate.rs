//! Validation Guard — Advisory ledger checks
//!
//! Pure inspection of an entry list plus an optional capital ceiling,
//! returning human-readable violations as data. Nothing is thrown: the
//! replay engine and aggregate calculator stay defined on invalid ledgers,
//! and callers gate trust in those results on this guard's output.
//!
//! The guard walks the ledger with its own holdings counter, mirroring but
//! independent from the replay engine, so a bug in one cannot mask a bug
//! in the other.

use rust_decimal::Decimal;
use types::entry::{EntryKind, PositionEntry};
use types::errors::ValidationIssue;
use types::numeric::exceeds;

/// Validate a ledger against an optional capital ceiling (`capital ≤ 0`
/// means no ceiling). Returns all violations in rule order; empty = valid.
pub fn validate(ledger: &[PositionEntry], capital: Decimal) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // Rule 1: something must actually participate, otherwise nothing else
    // is worth reporting
    if !ledger.iter().any(PositionEntry::is_participating) {
        issues.push(ValidationIssue::NoParticipatingEntries);
        return issues;
    }

    // Rule 2: an enabled entry with only one of price/quantity set is a
    // half-finished row, not a zero row
    for (i, entry) in ledger.iter().enumerate() {
        if !entry.enabled {
            continue;
        }
        let has_price = entry.price > Decimal::ZERO;
        let has_quantity = entry.quantity > Decimal::ZERO;
        if has_price != has_quantity {
            issues.push(ValidationIssue::HalfSpecifiedEntry { index: i + 1 });
        }
    }

    // Rules 3 and 4: ordered walk with running holdings and used capital
    let mut holdings = Decimal::ZERO;
    let mut used_capital = Decimal::ZERO;

    for (i, entry) in ledger.iter().enumerate() {
        if !entry.is_participating() {
            continue;
        }
        match entry.kind {
            EntryKind::OPEN => {
                used_capital += entry.margin_quote;
                if capital > Decimal::ZERO && used_capital > capital {
                    issues.push(ValidationIssue::CapitalExceeded {
                        index: i + 1,
                        used: used_capital,
                        capital,
                        excess: used_capital - capital,
                    });
                }
                holdings += entry.quantity;
            }
            EntryKind::CLOSE => {
                if exceeds(entry.quantity, holdings) {
                    issues.push(ValidationIssue::OverClose {
                        index: i + 1,
                        requested: entry.quantity,
                        available: holdings,
                        shortfall: entry.quantity - holdings,
                    });
                }
                holdings -= entry.quantity.min(holdings);
            }
        }
    }

    issues
}
