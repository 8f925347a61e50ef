//! Calc Core — Position Ledger & PnL Accounting Engine
//!
//! Provides deterministic, client-side computation for the multi-entry PnL
//! calculator:
//! - Ledger validation (advisory, user-facing messages)
//! - Sequential ledger replay producing per-entry position stats
//! - Aggregate PnL summary over the same ledger
//! - Liquidation price estimation for open entries
//! - JSON session codec for the host UI's import/export collaborator
//!
//! # Determinism
//! All computation paths are pure: no system time, no RNG, no external
//! calls. Uses `Decimal` (fixed-point) and `BTreeMap` (sorted iteration)
//! throughout. The one place wall-clock time appears is the session export
//! stamp, which sits at the boundary with the outside world.
//!
//! # Error posture
//! The engine never fails mid-computation: numeric degeneracies are guarded
//! and invalid ledgers still produce a best-effort result. Callers gate
//! usefulness behind `validate`.

pub mod validate;
pub mod replay;
pub mod aggregate;
pub mod liquidation;
pub mod session;

/// Crate version constant
pub const CALC_CORE_VERSION: &str = "1.0.0";
