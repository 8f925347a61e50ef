//! Liquidation Price Estimator
//!
//! Stateless maintenance-margin-rate model, invoked once per active OPEN
//! entry during replay. Never mutates state.
//!
//! ```text
//! mmr = 1/leverage − fee_rate
//! mmr ≤ 0            → 0 (undefined/unsafe at this leverage)
//! LONG:  entry × (1 − mmr)
//! SHORT: entry × (1 + mmr)
//! ```

use rust_decimal::Decimal;
use types::side::PositionSide;

/// Default fee rate folded into the maintenance margin rate.
const DEFAULT_FEE_RATE: &str = "0.02";

/// The default fee rate (2%) used when the caller does not override it.
pub fn default_fee_rate() -> Decimal {
    Decimal::from_str_exact(DEFAULT_FEE_RATE).unwrap()
}

/// Estimated liquidation price at the default fee rate.
pub fn liquidation_price(entry_price: Decimal, leverage: u8, side: PositionSide) -> Decimal {
    liquidation_price_with_fee(entry_price, leverage, side, default_fee_rate())
}

/// Estimated liquidation price with an explicit fee rate.
///
/// Returns 0 when the maintenance margin rate is not positive: at that
/// leverage the model has no safe price to report.
pub fn liquidation_price_with_fee(
    entry_price: Decimal,
    leverage: u8,
    side: PositionSide,
    fee_rate: Decimal,
) -> Decimal {
    if leverage == 0 {
        return Decimal::ZERO;
    }
    let mmr = Decimal::ONE / Decimal::from(leverage) - fee_rate;
    if mmr <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match side {
        PositionSide::LONG => entry_price * (Decimal::ONE - mmr),
        PositionSide::SHORT => entry_price * (Decimal::ONE + mmr),
    }
}
