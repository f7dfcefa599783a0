//! Aggregated inventory optimization recommendations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use priceflow_core::{PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::health::{InventoryAnalyzer, StockStatus, Urgency};
use crate::reorder::ReorderRecommendation;

/// Forecast horizon feeding the optimization view (days).
const OPTIMIZATION_HORIZON_DAYS: i64 = 30;

/// Turnover below this suggests carrying less stock.
const LOW_TURNOVER: f64 = 0.5;
/// Turnover above this suggests carrying more stock.
const HIGH_TURNOVER: f64 = 2.0;

/// Key metrics the recommendations were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    pub current_stock: i64,
    pub reorder_point: i64,
    pub turnover_rate: f64,
    pub days_remaining: Option<f64>,
}

/// Recommendation buckets by time horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryOptimization {
    pub product_id: ProductId,
    pub status: StockStatus,
    pub urgency: Urgency,
    pub immediate_actions: Vec<String>,
    pub short_term_actions: Vec<String>,
    pub long_term_actions: Vec<String>,
    pub metrics: OptimizationMetrics,
    pub as_of: DateTime<Utc>,
}

impl<S> InventoryAnalyzer<S>
where
    S: MetricStore,
{
    /// Combine health, reorder-point, and stockout analyses into
    /// immediate/short-term/long-term action buckets.
    ///
    /// Only `NotFound` propagates; a forecast that lacks history simply
    /// contributes no stockout warning.
    pub fn optimize_inventory_levels(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<InventoryOptimization> {
        let health = self.analyze_inventory_health(id, as_of)?;
        let reorder = self.calculate_reorder_point(id, as_of)?;
        let forecast = match self.forecast_inventory_needs(id, OPTIMIZATION_HORIZON_DAYS, as_of) {
            Ok(forecast) => Some(forecast),
            Err(err) if err.is_soft() => {
                debug!(product_id = %id, %err, "stockout forecast skipped");
                None
            }
            Err(err) => return Err(err),
        };

        let mut immediate = Vec::new();
        let mut short_term = Vec::new();
        let mut long_term = Vec::new();

        match health.urgency {
            Urgency::Critical => immediate.push("Emergency restock required".to_string()),
            Urgency::High => immediate.push("Place reorder immediately".to_string()),
            _ => {}
        }

        if reorder.recommendation == ReorderRecommendation::Update {
            short_term.push(format!(
                "Update reorder point to {}",
                reorder.calculated_reorder_point
            ));
        }

        if health.turnover_rate < LOW_TURNOVER {
            long_term.push("Consider reducing inventory levels - low turnover".to_string());
        } else if health.turnover_rate > HIGH_TURNOVER {
            long_term.push("Consider increasing inventory levels - high turnover".to_string());
        }

        if let Some(day) = forecast.and_then(|f| f.projected_stockout_day) {
            if day <= 7 {
                immediate.push(format!("Stockout predicted in {day} days"));
            }
        }

        Ok(InventoryOptimization {
            product_id: id.clone(),
            status: health.status,
            urgency: health.urgency,
            immediate_actions: immediate,
            short_term_actions: short_term,
            long_term_actions: long_term,
            metrics: OptimizationMetrics {
                current_stock: health.current_stock,
                reorder_point: health.reorder_point,
                turnover_rate: health.turnover_rate,
                days_remaining: health.days_remaining,
            },
            as_of,
        })
    }
}
