//! Short-horizon demand forecasting.
//!
//! A 7-day trailing moving average plus a linear per-day trend, projected
//! forward with confidence decaying toward a floor as the horizon extends.
//! Deliberately simple: the decision function needs direction and rough
//! magnitude, not a fitted model.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use priceflow_core::{PricingError, PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::scorer::DemandScorer;
use crate::series::{daily_totals, round1, round2};

/// Minimum distinct sale days required before forecasting.
pub const MIN_HISTORY_DAYS: usize = 7;

/// Trailing window length for the moving average.
const TRAILING_WINDOW: usize = 7;

/// Per-day confidence decay and its floor.
const CONFIDENCE_DECAY_PER_DAY: f64 = 0.02;
const CONFIDENCE_FLOOR: f64 = 0.3;

/// One projected day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub predicted_units: f64,
    pub confidence: f64,
}

/// Demand projection over a forward horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub product_id: ProductId,
    pub period_days: i64,
    pub total_forecast: f64,
    pub average_daily: f64,
    /// Linear per-day trend from the trailing window (units/day per day).
    pub trend: f64,
    pub series: Vec<DailyForecast>,
    pub confidence: f64,
}

impl<S> DemandScorer<S>
where
    S: MetricStore,
{
    /// Project demand `days_ahead` days forward.
    ///
    /// Requires at least 7 distinct days of aggregated sales in the lookback
    /// window (2× the horizon, at least 60 days); otherwise returns the
    /// typed `InsufficientData` soft failure for the caller to absorb.
    pub fn forecast_demand(
        &self,
        id: &ProductId,
        days_ahead: i64,
        as_of: DateTime<Utc>,
    ) -> PricingResult<DemandForecast> {
        let lookback_days = (days_ahead * 2).max(60);
        let sales = self
            .store()
            .get_sales(id, as_of - Duration::days(lookback_days))?;

        let daily = daily_totals(&sales);
        if daily.len() < MIN_HISTORY_DAYS {
            return Err(PricingError::insufficient_data(
                MIN_HISTORY_DAYS,
                daily.len(),
            ));
        }

        // Trailing window: the last 7 days that actually had sales.
        let recent: Vec<f64> = daily
            .values()
            .rev()
            .take(TRAILING_WINDOW)
            .rev()
            .map(|&units| units as f64)
            .collect();

        let average = recent.iter().sum::<f64>() / recent.len() as f64;
        let trend = (recent[recent.len() - 1] - recent[0]) / recent.len() as f64;

        let today = as_of.date_naive();
        let mut series = Vec::with_capacity(days_ahead as usize);
        for i in 0..days_ahead {
            let predicted = (average + trend * i as f64).max(0.0);
            let confidence = (1.0 - i as f64 * CONFIDENCE_DECAY_PER_DAY).max(CONFIDENCE_FLOOR);
            series.push(DailyForecast {
                date: today + Duration::days(i + 1),
                predicted_units: round1(predicted),
                confidence: round2(confidence),
            });
        }

        let total: f64 = series.iter().map(|d| d.predicted_units).sum();

        Ok(DemandForecast {
            product_id: id.clone(),
            period_days: days_ahead,
            total_forecast: round1(total),
            average_daily: round1(total / days_ahead as f64),
            trend: round2(trend),
            series,
            confidence: 0.7,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use priceflow_core::SaleEvent;
    use priceflow_store::InMemoryMetricStore;

    fn test_id() -> ProductId {
        ProductId::new("P1001").unwrap()
    }

    fn seed_daily_sales(store: &InMemoryMetricStore, as_of: DateTime<Utc>, daily: &[(i64, i64)]) {
        for &(days_ago, quantity) in daily {
            store
                .record_sale(SaleEvent {
                    product_id: test_id(),
                    quantity,
                    sale_price: 100.0,
                    sold_at: as_of - Duration::days(days_ago) - Duration::hours(1),
                    demand_signal: None,
                })
                .unwrap();
        }
    }

    #[test]
    fn forecast_needs_seven_distinct_days() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_daily_sales(&store, as_of, &[(1, 5), (2, 5), (3, 5)]);
        let scorer = DemandScorer::new(&store);

        let err = scorer.forecast_demand(&test_id(), 7, as_of).unwrap_err();
        assert_eq!(
            err,
            PricingError::InsufficientData {
                required: 7,
                available: 3
            }
        );
    }

    #[test]
    fn flat_history_projects_the_average() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_daily_sales(
            &store,
            as_of,
            &[(1, 6), (2, 6), (3, 6), (4, 6), (5, 6), (6, 6), (7, 6)],
        );
        let scorer = DemandScorer::new(&store);

        let forecast = scorer.forecast_demand(&test_id(), 5, as_of).unwrap();
        assert_eq!(forecast.trend, 0.0);
        for day in &forecast.series {
            assert_eq!(day.predicted_units, 6.0);
        }
        assert_eq!(forecast.total_forecast, 30.0);
        assert_eq!(forecast.average_daily, 6.0);
    }

    #[test]
    fn rising_history_projects_a_positive_trend() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        // Oldest day sold 2, newest sold 16: trend = (16 - 2) / 7 = 2.0.
        seed_daily_sales(
            &store,
            as_of,
            &[(7, 2), (6, 4), (5, 6), (4, 8), (3, 10), (2, 12), (1, 16)],
        );
        let scorer = DemandScorer::new(&store);

        let forecast = scorer.forecast_demand(&test_id(), 3, as_of).unwrap();
        assert_eq!(forecast.trend, 2.0);
        assert!(forecast.series[2].predicted_units > forecast.series[0].predicted_units);
    }

    #[test]
    fn confidence_decays_linearly_to_the_floor() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_daily_sales(
            &store,
            as_of,
            &[(1, 6), (2, 6), (3, 6), (4, 6), (5, 6), (6, 6), (7, 6)],
        );
        let scorer = DemandScorer::new(&store);

        let forecast = scorer.forecast_demand(&test_id(), 60, as_of).unwrap();
        assert_eq!(forecast.series[0].confidence, 1.0);
        assert_eq!(forecast.series[10].confidence, 0.8);
        // Far horizon bottoms out at the floor.
        assert_eq!(forecast.series[59].confidence, 0.3);
    }

    #[test]
    fn projection_never_goes_negative() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        // Steep decline: trend = (1 - 29) / 7 = -4.0.
        seed_daily_sales(
            &store,
            as_of,
            &[(7, 29), (6, 25), (5, 21), (4, 17), (3, 13), (2, 9), (1, 1)],
        );
        let scorer = DemandScorer::new(&store);

        let forecast = scorer.forecast_demand(&test_id(), 20, as_of).unwrap();
        assert!(forecast.series.iter().all(|d| d.predicted_units >= 0.0));
    }
}
