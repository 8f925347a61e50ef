//! Tolerance-aware decimal helpers
//!
//! Every near-zero decision in the engine goes through this module so the
//! tolerance value stays single-sourced and testable. Proportional margin
//! release and cost-basis subtraction divide and multiply, leaving sub-ε
//! residues that would otherwise surface as negative holdings or dust.

use rust_decimal::Decimal;

/// Tolerance below which residues are treated as zero.
const EPSILON_STR: &str = "0.0001";

/// The fixed ε = 1e-4 tolerance used throughout the engine.
pub fn epsilon() -> Decimal {
    Decimal::from_str_exact(EPSILON_STR).unwrap()
}

/// True when |value| < ε.
pub fn is_dust(value: Decimal) -> bool {
    value.abs() < epsilon()
}

/// Collapse sub-ε residues to exactly zero; larger values pass through.
pub fn clamp_dust(value: Decimal) -> Decimal {
    if is_dust(value) {
        Decimal::ZERO
    } else {
        value
    }
}

/// True when `requested` exceeds `available` by more than ε.
///
/// Used for over-close detection: closing within ε of holdings is allowed.
pub fn exceeds(requested: Decimal, available: Decimal) -> bool {
    requested > available + epsilon()
}
