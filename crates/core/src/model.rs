//! Shared data model records.
//!
//! These are plain read/write records exchanged with the metric store and the
//! decision sink. The store owns them; the core only reads them (and mutates
//! a product's price through `DecisionSink::update_product_price` after a
//! decision cycle). Sale events, competitor observations, decision records
//! and price changes are append-only facts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::id::{DecisionId, ProductId};

/// Where our price sits relative to observed competitor prices.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Lowest,
    Highest,
    Competitive,
}

/// A priced, stocked catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub current_price: f64,
    pub base_price: f64,
    pub cost_price: f64,
    pub stock_level: i64,
    pub demand_score: f64,
    pub sales_velocity: f64,
    /// Price sensitivity coefficient; more negative = more sensitive.
    pub price_elasticity: f64,
    pub market_position: Option<MarketPosition>,
    pub active: bool,
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Effective selling price: current price, falling back to base price
    /// when no price update has been applied yet.
    pub fn effective_price(&self) -> f64 {
        if self.current_price > 0.0 {
            self.current_price
        } else {
            self.base_price
        }
    }
}

/// A recorded sale. Immutable once recorded; append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub product_id: ProductId,
    pub quantity: i64,
    pub sale_price: f64,
    pub sold_at: DateTime<Utc>,
    /// Optional upstream demand annotation attached at ingest time.
    pub demand_signal: Option<f64>,
}

/// One observed competitor price point. Multiple observations per
/// product/competitor are retained as history, never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorObservation {
    pub product_id: ProductId,
    pub competitor: String,
    pub price: f64,
    pub observed_at: DateTime<Utc>,
    pub available: bool,
    pub rating: Option<f64>,
    /// Confidence in the observation, in [0, 1].
    pub confidence: f64,
}

/// A point-in-time stock reading. The most recent snapshot per product is
/// authoritative; history is retained for trend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub product_id: ProductId,
    pub stock_level: i64,
    pub reorder_point: i64,
    pub max_stock: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Audit record for one decision: causal inputs, outputs, and the ordered
/// reasoning trace. Append-only; never mutated or deleted, and it must
/// survive deactivation of the product it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: DecisionId,
    pub product_id: ProductId,
    pub agent: String,
    pub kind: String,
    pub inputs: JsonValue,
    pub outputs: JsonValue,
    pub confidence: f64,
    pub explanation: String,
    pub reasoning: Vec<String>,
    pub decided_at: DateTime<Utc>,
}

/// One applied price movement. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub product_id: ProductId,
    pub old_price: f64,
    pub new_price: f64,
    pub reason: String,
    pub source: String,
    pub confidence: f64,
    pub changed_at: DateTime<Utc>,
}

impl PriceChange {
    /// Signed percentage change, or 0.0 when there was no prior price.
    pub fn percent_change(&self) -> f64 {
        if self.old_price > 0.0 {
            (self.new_price - self.old_price) / self.old_price * 100.0
        } else {
            0.0
        }
    }
}
