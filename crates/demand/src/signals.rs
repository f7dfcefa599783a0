//! Fused demand signal view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use priceflow_core::{PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::scorer::{DemandScorer, VELOCITY_WINDOW_DAYS};

/// Forecast horizon used for the short-term trend signal (days).
const SHORT_TERM_HORIZON_DAYS: i64 = 7;

/// Individual demand signal tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandSignalTag {
    HighDemandScore,
    LowDemandScore,
    HighSalesVelocity,
    LowSalesVelocity,
    IncreasingTrend,
    DecreasingTrend,
}

impl DemandSignalTag {
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            DemandSignalTag::HighDemandScore
                | DemandSignalTag::HighSalesVelocity
                | DemandSignalTag::IncreasingTrend
        )
    }

    pub fn is_negative(&self) -> bool {
        !self.is_positive()
    }
}

/// Categorical demand sentiment by majority vote of the signal tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Fused demand view: score, velocity, short-term forecast, and sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSignals {
    pub product_id: ProductId,
    pub demand_score: f64,
    pub sales_velocity: f64,
    /// Average daily units from the 7-day forecast; absent when history was
    /// too thin to forecast (soft degradation, not a failure).
    pub short_term_forecast: Option<f64>,
    pub tags: Vec<DemandSignalTag>,
    pub sentiment: Sentiment,
    pub as_of: DateTime<Utc>,
}

impl<S> DemandScorer<S>
where
    S: MetricStore,
{
    /// Fuse demand score, 7-day velocity, and 7-day forecast trend into a
    /// categorical sentiment. Only `NotFound` propagates; a failed forecast
    /// simply contributes no trend tags.
    pub fn analyze_demand_signals(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<DemandSignals> {
        let assessment = self.demand_score(id, as_of)?;
        let velocity = self.sales_velocity(id, VELOCITY_WINDOW_DAYS, as_of)?;

        let forecast = match self.forecast_demand(id, SHORT_TERM_HORIZON_DAYS, as_of) {
            Ok(forecast) => Some(forecast),
            Err(err) if err.is_soft() => {
                debug!(product_id = %id, %err, "forecast skipped in signal analysis");
                None
            }
            Err(err) => return Err(err),
        };

        let mut tags = Vec::new();
        if assessment.score > 0.8 {
            tags.push(DemandSignalTag::HighDemandScore);
        } else if assessment.score < 0.3 {
            tags.push(DemandSignalTag::LowDemandScore);
        }

        if velocity.velocity > 10.0 {
            tags.push(DemandSignalTag::HighSalesVelocity);
        } else if velocity.velocity < 1.0 {
            tags.push(DemandSignalTag::LowSalesVelocity);
        }

        if let Some(forecast) = &forecast {
            if forecast.trend > 0.5 {
                tags.push(DemandSignalTag::IncreasingTrend);
            } else if forecast.trend < -0.5 {
                tags.push(DemandSignalTag::DecreasingTrend);
            }
        }

        let positive = tags.iter().filter(|t| t.is_positive()).count();
        let negative = tags.iter().filter(|t| t.is_negative()).count();
        let sentiment = if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        Ok(DemandSignals {
            product_id: id.clone(),
            demand_score: assessment.score,
            sales_velocity: velocity.velocity,
            short_term_forecast: forecast.map(|f| f.average_daily),
            tags,
            sentiment,
            as_of,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use priceflow_core::{InventorySnapshot, Product, SaleEvent};
    use priceflow_store::InMemoryMetricStore;

    fn test_id() -> ProductId {
        ProductId::new("P1001").unwrap()
    }

    fn seed_product(store: &InMemoryMetricStore) {
        store
            .upsert_product(Product {
                id: test_id(),
                name: "Widget".to_string(),
                current_price: 100.0,
                base_price: 100.0,
                cost_price: 60.0,
                stock_level: 25,
                demand_score: 0.5,
                sales_velocity: 0.0,
                price_elasticity: -1.0,
                market_position: None,
                active: true,
                last_updated: Utc::now(),
            })
            .unwrap();
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
    fn strong_sales_produce_positive_sentiment() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store);
        store
            .record_snapshot(InventorySnapshot {
                product_id: test_id(),
                stock_level: 4,
                reorder_point: 10,
                max_stock: 100,
                recorded_at: as_of,
            })
            .unwrap();
        // Heavy and rising daily sales across a full week.
        seed_daily_sales(
            &store,
            as_of,
            &[(7, 60), (6, 70), (5, 80), (4, 90), (3, 100), (2, 110), (1, 130)],
        );
        let scorer = DemandScorer::new(&store);

        let signals = scorer.analyze_demand_signals(&test_id(), as_of).unwrap();
        assert!(signals.tags.contains(&DemandSignalTag::HighSalesVelocity));
        assert!(signals.tags.contains(&DemandSignalTag::IncreasingTrend));
        assert_eq!(signals.sentiment, Sentiment::Positive);
        assert!(signals.short_term_forecast.is_some());
    }

    #[test]
    fn no_sales_produce_negative_sentiment_without_forecast() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store);
        let scorer = DemandScorer::new(&store);

        let signals = scorer.analyze_demand_signals(&test_id(), as_of).unwrap();
        assert!(signals.tags.contains(&DemandSignalTag::LowSalesVelocity));
        assert!(signals.short_term_forecast.is_none());
        assert_eq!(signals.sentiment, Sentiment::Negative);
    }

    #[test]
    fn balanced_tags_read_as_neutral() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store);
        store
            .record_snapshot(InventorySnapshot {
                product_id: test_id(),
                stock_level: 50,
                reorder_point: 10,
                max_stock: 100,
                recorded_at: as_of,
            })
            .unwrap();
        // Busy week with a falling tail: high velocity but decreasing trend.
        seed_daily_sales(
            &store,
            as_of,
            &[(7, 130), (6, 120), (5, 110), (4, 100), (3, 90), (2, 80), (1, 70)],
        );
        let scorer = DemandScorer::new(&store);

        let signals = scorer.analyze_demand_signals(&test_id(), as_of).unwrap();
        assert!(signals.tags.contains(&DemandSignalTag::HighSalesVelocity));
        assert!(signals.tags.contains(&DemandSignalTag::DecreasingTrend));
        assert_eq!(signals.sentiment, Sentiment::Neutral);
    }
}
