//! Session Codec — Persisted/exchanged ledger representation
//!
//! One codec for every import path (file, clipboard, browser persistence
//! collaborator), so a ledger round-trips identically no matter where it
//! was loaded from. The engine performs no schema validation beyond this
//! parse; semantic checks belong to the validation guard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::entry::PositionEntry;
use types::errors::SessionError;
use types::side::PositionSide;

/// Current session format version.
pub const SESSION_VERSION: u32 = 1;

/// Leverage bounds mirrored from the host UI's slider.
pub const MIN_LEVERAGE: u8 = 1;
pub const MAX_LEVERAGE: u8 = 125;

/// One exported calculator session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSession {
    pub side: PositionSide,
    /// Capital ceiling; 0 = unset
    pub capital: Decimal,
    pub leverage: u8,
    pub positions: Vec<PositionEntry>,
    pub exported_at: DateTime<Utc>,
    pub version: u32,
}

impl LedgerSession {
    /// Build a session stamped with the current time and format version.
    ///
    /// This is the one boundary where wall-clock time enters: the stamp is
    /// metadata for the outside world, not an input to any computation.
    pub fn export(
        side: PositionSide,
        capital: Decimal,
        leverage: u8,
        positions: Vec<PositionEntry>,
    ) -> Self {
        Self {
            side,
            capital,
            leverage: leverage.clamp(MIN_LEVERAGE, MAX_LEVERAGE),
            positions,
            exported_at: Utc::now(),
            version: SESSION_VERSION,
        }
    }

    /// Serialize to the wire JSON shape.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a session from JSON, accepting any version up to the current
    /// one and clamping leverage into the supported range.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let mut session: LedgerSession = serde_json::from_str(json)?;
        if session.version > SESSION_VERSION {
            return Err(SessionError::UnsupportedVersion {
                found: session.version,
                supported: SESSION_VERSION,
            });
        }
        session.leverage = session.leverage.clamp(MIN_LEVERAGE, MAX_LEVERAGE);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::entry::EntryKind;

    fn sample_session() -> LedgerSession {
        LedgerSession::export(
            PositionSide::LONG,
            Decimal::from(1000),
            10,
            vec![
                PositionEntry::with_values(
                    EntryKind::OPEN,
                    Decimal::from(100),
                    Decimal::from(10),
                    Decimal::from(100),
                ),
                PositionEntry::with_values(
                    EntryKind::CLOSE,
                    Decimal::from(120),
                    Decimal::from(10),
                    Decimal::ZERO,
                ),
            ],
        )
    }

    #[test]
    fn test_roundtrip() {
        let session = sample_session();
        let json = session.to_json().unwrap();
        let restored = LedgerSession::from_json(&json).unwrap();
        assert_eq!(session, restored);
    }

    #[test]
    fn test_wire_field_names() {
        let json = sample_session().to_json().unwrap();
        assert!(json.contains("\"side\":\"LONG\""));
        assert!(json.contains("\"exportedAt\""));
        assert!(json.contains("\"positions\""));
        assert!(json.contains("\"version\":1"));
    }

    #[test]
    fn test_export_stamps_current_version() {
        assert_eq!(sample_session().version, SESSION_VERSION);
    }

    #[test]
    fn test_future_version_rejected() {
        let mut session = sample_session();
        session.version = SESSION_VERSION + 1;
        let json = session.to_json().unwrap();

        let err = LedgerSession::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnsupportedVersion { found, supported }
                if found == SESSION_VERSION + 1 && supported == SESSION_VERSION
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            LedgerSession::from_json("{not json"),
            Err(SessionError::Json(_))
        ));
    }

    #[test]
    fn test_leverage_clamped_on_export_and_import() {
        let session = LedgerSession::export(PositionSide::SHORT, Decimal::ZERO, 200, vec![]);
        assert_eq!(session.leverage, MAX_LEVERAGE);

        let mut low = sample_session();
        low.leverage = 0;
        let restored = LedgerSession::from_json(&low.to_json().unwrap()).unwrap();
        assert_eq!(restored.leverage, MIN_LEVERAGE);
    }

    #[test]
    fn test_imported_entries_keep_foreign_ids() {
        let json = r#"{
            "side": "LONG",
            "capital": "0",
            "leverage": 10,
            "positions": [
                {
                    "id": "row-1",
                    "kind": "OPEN",
                    "price": "100",
                    "quantity": "10",
                    "notionalQuote": "1000",
                    "marginQuote": "100",
                    "enabled": true
                }
            ],
            "exportedAt": "2026-08-01T00:00:00Z",
            "version": 1
        }"#;
        let session = LedgerSession::from_json(json).unwrap();
        assert_eq!(session.positions.len(), 1);
        assert_eq!(session.positions[0].id.as_str(), "row-1");
        assert_eq!(session.positions[0].quantity, Decimal::from(10));
    }
}
