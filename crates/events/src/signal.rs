//! Typed signal payloads.
//!
//! Each signal producer emits one of these per product update. They are
//! tagged structures rather than free-form maps so the correlator can route
//! on the variant and the decision function receives typed inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use priceflow_core::ProductId;

/// Which of the three inbound signal kinds a payload belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    CompetitorData,
    DemandScore,
    InventoryUpdate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::CompetitorData => "competitor_data",
            SignalKind::DemandScore => "demand_score",
            SignalKind::InventoryUpdate => "inventory_update",
        }
    }
}

/// Competitor price summary for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSignal {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    /// Observed competitor prices, most recent observation window.
    pub prices: Vec<f64>,
    pub observed_at: DateTime<Utc>,
}

impl CompetitorSignal {
    /// Average observed price, or `None` with no observations.
    pub fn average_price(&self) -> Option<f64> {
        if self.prices.is_empty() {
            return None;
        }
        Some(self.prices.iter().sum::<f64>() / self.prices.len() as f64)
    }
}

/// Demand score for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSignal {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    /// Composite demand score in [0, 1].
    pub score: f64,
    /// 7-day sales velocity (units/day) backing the score.
    pub velocity: f64,
    pub confidence: f64,
}

/// Inventory snapshot for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySignal {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    pub stock_level: i64,
    pub reorder_point: i64,
}

/// One of the three per-product signals the correlator joins.
///
/// Serialized untagged: the payload on the wire is the plain field map of
/// the inner struct, and the envelope's `type` field names the kind. The
/// three field sets are disjoint, so deserialization is unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Signal {
    Competitor(CompetitorSignal),
    Demand(DemandSignal),
    Inventory(InventorySignal),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Competitor(_) => SignalKind::CompetitorData,
            Signal::Demand(_) => SignalKind::DemandScore,
            Signal::Inventory(_) => SignalKind::InventoryUpdate,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        match self {
            Signal::Competitor(s) => &s.product_id,
            Signal::Demand(s) => &s.product_id,
            Signal::Inventory(s) => &s.product_id,
        }
    }
}
