//! Signal bus topics.

use serde::{Deserialize, Serialize};

/// A named channel on the signal bus.
///
/// Three inbound topics carry the freshest per-product payload for each
/// signal kind; one outbound topic carries completed price decisions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    CompetitorData,
    DemandScore,
    InventoryUpdate,
    PriceDecision,
}

impl Topic {
    /// The three inbound topics the decision cycle consumes.
    pub const INBOUND: [Topic; 3] = [
        Topic::CompetitorData,
        Topic::DemandScore,
        Topic::InventoryUpdate,
    ];

    /// Stable wire name for this topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::CompetitorData => "competitor_data",
            Topic::DemandScore => "demand_score",
            Topic::InventoryUpdate => "inventory_update",
            Topic::PriceDecision => "price_decision",
        }
    }
}

impl core::fmt::Display for Topic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
