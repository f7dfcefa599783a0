//! Stockout forecasting by linear depletion.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use priceflow_core::{PricingError, PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::health::{round1, round2, InventoryAnalyzer, StockStatus};
use crate::reorder::{LEAD_TIME_DAYS, SAFETY_STOCK_DAYS};

use std::collections::BTreeMap;

/// Minimum distinct sale days required before forecasting.
pub const MIN_HISTORY_DAYS: usize = 7;

/// One projected inventory day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedDay {
    pub date: NaiveDate,
    pub projected_stock: f64,
    pub status: StockStatus,
}

/// Forward inventory projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryForecast {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub avg_daily_sales: f64,
    pub period_days: i64,
    /// First forward day (1-based) at which projected stock reaches zero;
    /// absent when no stockout falls within the horizon.
    pub projected_stockout_day: Option<i64>,
    /// Quantity covering lead time + safety stock + the full horizon.
    pub recommended_reorder_quantity: i64,
    pub series: Vec<ProjectedDay>,
    pub confidence: f64,
}

impl<S> InventoryAnalyzer<S>
where
    S: MetricStore,
{
    /// Deplete current stock linearly by the historical average daily rate.
    ///
    /// Requires a snapshot (`NotFound`) and at least 7 distinct sale days in
    /// the lookback window (`InsufficientData`, soft).
    pub fn forecast_inventory_needs(
        &self,
        id: &ProductId,
        days_ahead: i64,
        as_of: DateTime<Utc>,
    ) -> PricingResult<InventoryForecast> {
        let snapshot = self
            .store()
            .get_latest_inventory(id)?
            .ok_or(PricingError::NotFound)?;

        let lookback_days = (days_ahead * 2).max(60);
        let sales = self
            .store()
            .get_sales(id, as_of - Duration::days(lookback_days))?;

        let mut daily: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for sale in &sales {
            *daily.entry(sale.sold_at.date_naive()).or_insert(0) += sale.quantity;
        }
        if daily.len() < MIN_HISTORY_DAYS {
            return Err(PricingError::insufficient_data(
                MIN_HISTORY_DAYS,
                daily.len(),
            ));
        }

        // Average over days that actually sold, not calendar days: the rate
        // models what a selling day consumes.
        let avg_daily = daily.values().sum::<i64>() as f64 / daily.len() as f64;

        let today = as_of.date_naive();
        let mut series = Vec::with_capacity(days_ahead as usize);
        let mut stockout_day = None;
        for day in 1..=days_ahead {
            let projected = (snapshot.stock_level as f64 - avg_daily * day as f64).max(0.0);
            let status = if projected <= 0.0 {
                StockStatus::OutOfStock
            } else if projected <= snapshot.reorder_point as f64 {
                StockStatus::LowStock
            } else {
                StockStatus::Healthy
            };
            if stockout_day.is_none() && projected <= 0.0 {
                stockout_day = Some(day);
            }
            series.push(ProjectedDay {
                date: today + Duration::days(day),
                projected_stock: round1(projected),
                status,
            });
        }

        let coverage = avg_daily * (LEAD_TIME_DAYS + days_ahead) as f64
            + avg_daily * SAFETY_STOCK_DAYS as f64;

        Ok(InventoryForecast {
            product_id: id.clone(),
            current_stock: snapshot.stock_level,
            avg_daily_sales: round2(avg_daily),
            period_days: days_ahead,
            projected_stockout_day: stockout_day,
            recommended_reorder_quantity: coverage.ceil() as i64,
            series,
            confidence: 0.7,
        })
    }
}
