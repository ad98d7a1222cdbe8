use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// The store's identifier format: a fixed-length hexadecimal token.
const RECORD_ID_LEN: usize = 24;

/// RecordId
///
/// A validated store identifier. Constructing one is only possible through
/// `parse` (external input) or `generate` (new records), which guarantees that
/// any `RecordId` reaching the store layer is well-formed. Malformed ids are
/// therefore rejected at the HTTP boundary and never turn into store lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// InvalidIdentifier
///
/// The single failure mode of the identifier codec. Kept distinct from the
/// store's own "not found" outcome so the two remain independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidIdentifier;

impl fmt::Display for InvalidIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed record id")
    }
}

impl std::error::Error for InvalidIdentifier {}

impl RecordId {
    /// parse
    ///
    /// Validates an externally supplied identifier. Accepts exactly 24 ASCII
    /// hex digits (either case) and normalizes to lowercase. Pure function of
    /// the input, no side effects.
    pub fn parse(raw: &str) -> Result<Self, InvalidIdentifier> {
        if raw.len() == RECORD_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidIdentifier)
        }
    }

    /// Produces a fresh identifier for a newly created record.
    pub fn generate() -> Self {
        // A v4 UUID yields 32 hex digits; the token keeps the first 24.
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..RECORD_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    /// Deserialization runs through the same format check as `parse`, so ids
    /// read back from storage are validated too.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RecordId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
