//! Inventory health classification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use priceflow_core::{PricingError, PricingResult, ProductId};
use priceflow_store::MetricStore;

/// Window for the daily sales rate backing health classification (days).
pub const HEALTH_WINDOW_DAYS: i64 = 7;

/// Stock status buckets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    CriticalLow,
    Moderate,
    Healthy,
}

/// How urgently the status needs operator attention.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

/// Health view of one product's inventory posture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryHealth {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub max_stock: i64,
    pub daily_sales_rate: f64,
    /// Days until stock reaches zero at the current rate; `None` means the
    /// rate is zero (effectively infinite runway).
    pub days_remaining: Option<f64>,
    /// Monthly turnover: (daily rate × 30) / stock.
    pub turnover_rate: f64,
    pub status: StockStatus,
    pub urgency: Urgency,
    pub recommendations: Vec<String>,
    pub as_of: DateTime<Utc>,
}

/// Inventory Analyzer: stock status, reorder math, stockout forecasting.
#[derive(Debug)]
pub struct InventoryAnalyzer<S> {
    store: S,
}

impl<S> InventoryAnalyzer<S>
where
    S: MetricStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classify a product's inventory health.
    ///
    /// Requires an inventory snapshot and the product record (`NotFound`
    /// otherwise). Classification precedence: out of stock, then at/below
    /// reorder point, then runway thresholds.
    pub fn analyze_inventory_health(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<InventoryHealth> {
        let snapshot = self
            .store
            .get_latest_inventory(id)?
            .ok_or(PricingError::NotFound)?;
        let _product = self.store.get_product(id)?;

        let sales = self
            .store
            .get_sales(id, as_of - Duration::days(HEALTH_WINDOW_DAYS))?;
        let total_units: i64 = sales.iter().map(|s| s.quantity).sum();
        let daily_rate = total_units as f64 / HEALTH_WINDOW_DAYS as f64;

        let days_remaining = if daily_rate > 0.0 {
            Some(snapshot.stock_level as f64 / daily_rate)
        } else {
            None
        };

        let (status, urgency) =
            classify(snapshot.stock_level, snapshot.reorder_point, days_remaining);

        let turnover_rate = if snapshot.stock_level > 0 {
            daily_rate * 30.0 / snapshot.stock_level as f64
        } else {
            0.0
        };

        debug!(product_id = %id, ?status, ?urgency, "analyzed inventory health");

        Ok(InventoryHealth {
            product_id: id.clone(),
            current_stock: snapshot.stock_level,
            reorder_point: snapshot.reorder_point,
            max_stock: snapshot.max_stock,
            daily_sales_rate: round2(daily_rate),
            days_remaining: days_remaining.map(round1),
            turnover_rate: round2(turnover_rate),
            recommendations: recommend(status),
            status,
            urgency,
            as_of,
        })
    }
}

/// Status precedence is fixed: zero stock always wins, regardless of sales
/// velocity; reorder-point breach outranks runway thresholds.
fn classify(stock: i64, reorder_point: i64, days_remaining: Option<f64>) -> (StockStatus, Urgency) {
    if stock == 0 {
        return (StockStatus::OutOfStock, Urgency::Critical);
    }
    if stock <= reorder_point {
        return (StockStatus::LowStock, Urgency::High);
    }
    match days_remaining {
        Some(days) if days <= 7.0 => (StockStatus::CriticalLow, Urgency::High),
        Some(days) if days <= 14.0 => (StockStatus::Moderate, Urgency::Medium),
        _ => (StockStatus::Healthy, Urgency::Low),
    }
}

fn recommend(status: StockStatus) -> Vec<String> {
    let lines: [&str; 2] = match status {
        StockStatus::OutOfStock => ["Immediate restock required", "Consider expedited shipping"],
        StockStatus::LowStock => ["Place reorder immediately", "Monitor sales closely"],
        StockStatus::CriticalLow => ["Prepare for reorder", "Consider increasing reorder quantity"],
        StockStatus::Moderate => ["Monitor inventory levels", "Plan for next reorder cycle"],
        StockStatus::Healthy => ["Inventory levels are optimal", "Continue monitoring"],
    };
    lines.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
