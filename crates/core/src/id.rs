//! Strongly-typed identifiers used across the pricing core.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PricingError;

/// Identifier of a product.
///
/// Products are keyed by short human-assigned codes (e.g. "P1001"), not
/// generated UUIDs, because the identifier travels through signal payloads
/// and must match whatever the upstream catalog uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id, rejecting empty or whitespace-only input.
    pub fn new(id: impl Into<String>) -> Result<Self, PricingError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PricingError::invalid_id("ProductId: empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of a recorded decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(Uuid);

impl DecisionId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for DecisionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<DecisionId> for Uuid {
    fn from(value: DecisionId) -> Self {
        value.0
    }
}

impl FromStr for DecisionId {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| PricingError::invalid_id(format!("DecisionId: {e}")))?;
        Ok(Self(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_rejects_empty_input() {
        assert!(ProductId::new("").is_err());
        assert!(ProductId::new("   ").is_err());
    }

    #[test]
    fn product_id_round_trips_through_serde() {
        let id = ProductId::new("P1001").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"P1001\"");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn decision_id_parses_from_uuid_string() {
        let id = DecisionId::new();
        let parsed: DecisionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
