//! Types library for the derivatives calculator suite
//!
//! This library provides the core type definitions shared by every calculator
//! in the suite, ensuring type safety and deterministic behavior across the
//! UI layer and the computation engine.
//!
//! # Modules
//! - `ids`: Opaque stable identifiers (EntryId)
//! - `numeric`: Tolerance-aware decimal helpers (single-sourced epsilon)
//! - `side`: Position side (LONG/SHORT)
//! - `entry`: Ledger entry model and derived-field update commands
//! - `errors`: Error taxonomy (validation issues, session codec errors)

// Public modules
pub mod ids;
pub mod numeric;
pub mod side;
pub mod entry;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::side::*;
    pub use crate::entry::*;
    pub use crate::errors::*;
}
