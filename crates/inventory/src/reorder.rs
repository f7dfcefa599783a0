//! Reorder point recommendation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use priceflow_core::{PricingError, PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::health::{round2, InventoryAnalyzer};

/// Sales window backing the reorder calculation (days).
pub const REORDER_WINDOW_DAYS: i64 = 30;
/// Assumed restock lead time (days).
pub const LEAD_TIME_DAYS: i64 = 7;
/// Safety stock horizon (days).
pub const SAFETY_STOCK_DAYS: i64 = 3;
/// Floor for any calculated reorder point (units).
pub const MIN_REORDER_POINT: i64 = 5;
/// Fallback when no sales history exists (units).
pub const DEFAULT_REORDER_POINT: i64 = 10;

/// Whether the stored reorder point should change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderRecommendation {
    Update,
    Maintain,
}

/// Recommended reorder point vs. the currently stored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPointAnalysis {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub current_reorder_point: i64,
    pub daily_sales_rate: f64,
    pub lead_time_days: i64,
    pub safety_stock_days: i64,
    pub calculated_reorder_point: i64,
    pub recommendation: ReorderRecommendation,
    pub confidence: f64,
}

impl<S> InventoryAnalyzer<S>
where
    S: MetricStore,
{
    /// Reorder point from 30-day average daily sales with a fixed 7-day
    /// lead time and 3-day safety stock, floored at 5 units.
    ///
    /// No sales history is a soft condition: the analysis falls back to a
    /// default of 10 units with zero confidence rather than failing, so the
    /// decision cycle always has a usable value.
    pub fn calculate_reorder_point(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<ReorderPointAnalysis> {
        let snapshot = self
            .store()
            .get_latest_inventory(id)?
            .ok_or(PricingError::NotFound)?;

        let sales = self
            .store()
            .get_sales(id, as_of - Duration::days(REORDER_WINDOW_DAYS))?;

        if sales.is_empty() {
            return Ok(ReorderPointAnalysis {
                product_id: id.clone(),
                current_stock: snapshot.stock_level,
                current_reorder_point: snapshot.reorder_point,
                daily_sales_rate: 0.0,
                lead_time_days: LEAD_TIME_DAYS,
                safety_stock_days: SAFETY_STOCK_DAYS,
                calculated_reorder_point: DEFAULT_REORDER_POINT,
                recommendation: ReorderRecommendation::Maintain,
                confidence: 0.0,
            });
        }

        let total_units: i64 = sales.iter().map(|s| s.quantity).sum();
        let daily_sales = total_units as f64 / REORDER_WINDOW_DAYS as f64;

        let coverage_days = (LEAD_TIME_DAYS + SAFETY_STOCK_DAYS) as f64;
        let calculated = (daily_sales * coverage_days).ceil() as i64;
        let calculated = calculated.max(MIN_REORDER_POINT);

        let recommendation = if (calculated - snapshot.reorder_point).abs() > 2 {
            ReorderRecommendation::Update
        } else {
            ReorderRecommendation::Maintain
        };

        Ok(ReorderPointAnalysis {
            product_id: id.clone(),
            current_stock: snapshot.stock_level,
            current_reorder_point: snapshot.reorder_point,
            daily_sales_rate: round2(daily_sales),
            lead_time_days: LEAD_TIME_DAYS,
            safety_stock_days: SAFETY_STOCK_DAYS,
            calculated_reorder_point: calculated,
            recommendation,
            confidence: 0.8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::health::tests::{seed_daily_sales, seed_product, seed_snapshot, test_id};
    use priceflow_store::InMemoryMetricStore;

    #[test]
    fn reorder_point_requires_snapshot() {
        let store = InMemoryMetricStore::new();
        let analyzer = InventoryAnalyzer::new(&store);
        assert_eq!(
            analyzer
                .calculate_reorder_point(&test_id(), Utc::now())
                .unwrap_err(),
            PricingError::NotFound
        );
    }

    #[test]
    fn seven_per_day_yields_reorder_point_seventy() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store);
        seed_snapshot(&store, 100, 70);
        // 210 units over the 30-day window: 7/day, ceil(7 × 10) = 70.
        for day in 0..30 {
            seed_daily_sales(&store, as_of, &[(day, 7)]);
        }
        let analyzer = InventoryAnalyzer::new(&store);

        let analysis = analyzer.calculate_reorder_point(&test_id(), as_of).unwrap();
        assert_eq!(analysis.daily_sales_rate, 7.0);
        assert_eq!(analysis.calculated_reorder_point, 70);
        assert_eq!(analysis.recommendation, ReorderRecommendation::Maintain);
        assert_eq!(analysis.confidence, 0.8);
    }

    #[test]
    fn delta_beyond_two_units_recommends_update() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store);
        seed_snapshot(&store, 100, 10);
        for day in 0..30 {
            seed_daily_sales(&store, as_of, &[(day, 7)]);
        }
        let analyzer = InventoryAnalyzer::new(&store);

        let analysis = analyzer.calculate_reorder_point(&test_id(), as_of).unwrap();
        assert_eq!(analysis.calculated_reorder_point, 70);
        assert_eq!(analysis.recommendation, ReorderRecommendation::Update);
    }

    #[test]
    fn no_sales_history_falls_back_to_default() {
        let store = InMemoryMetricStore::new();
        seed_product(&store);
        seed_snapshot(&store, 40, 12);
        let analyzer = InventoryAnalyzer::new(&store);

        let analysis = analyzer
            .calculate_reorder_point(&test_id(), Utc::now())
            .unwrap();
        assert_eq!(analysis.calculated_reorder_point, DEFAULT_REORDER_POINT);
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.recommendation, ReorderRecommendation::Maintain);
    }

    #[test]
    fn slow_movers_are_floored_at_five_units() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store);
        seed_snapshot(&store, 40, 5);
        // 3 units in 30 days: ceil(0.1 × 10) = 1, floored to 5.
        seed_daily_sales(&store, as_of, &[(5, 1), (15, 1), (25, 1)]);
        let analyzer = InventoryAnalyzer::new(&store);

        let analysis = analyzer.calculate_reorder_point(&test_id(), as_of).unwrap();
        assert_eq!(analysis.calculated_reorder_point, MIN_REORDER_POINT);
    }
}
