//! Competitor price position analysis.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use priceflow_core::{MarketPosition, PricingError, PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::optimizer::round2;

/// Observation recency window (days).
pub const OBSERVATION_WINDOW_DAYS: i64 = 7;

/// Competitor count at which confidence saturates.
const FULL_CONFIDENCE_COUNT: f64 = 5.0;

/// What the competitor position suggests doing with our price.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorRecommendation {
    ConsiderPriceIncrease,
    ConsiderPriceDecrease,
    MaintainCurrentPrice,
}

/// Relative price position against recent competitor observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorAnalysis {
    pub product_id: ProductId,
    pub our_price: f64,
    pub competitor_avg: f64,
    pub competitor_min: f64,
    pub competitor_max: f64,
    pub position: MarketPosition,
    /// Distance to the nearest band edge when we are outside the band
    /// (below the minimum or above the maximum), else 0.
    pub price_advantage: f64,
    pub recommendation: CompetitorRecommendation,
    pub competitor_count: usize,
    pub confidence: f64,
    pub as_of: DateTime<Utc>,
}

/// Competitor Analyzer: min/max/average and our position in the band.
#[derive(Debug)]
pub struct CompetitorAnalyzer<S> {
    store: S,
}

impl<S> CompetitorAnalyzer<S>
where
    S: MetricStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Analyze our price against competitor observations from the last
    /// 7 days.
    ///
    /// `NotFound` without the product; `InsufficientData` without at least
    /// one recent observation (stale history does not count).
    pub fn analyze_competitor_pricing(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<CompetitorAnalysis> {
        let product = self.store.get_product(id)?;

        let observations = self.store.get_competitor_observations(
            id,
            as_of - Duration::days(OBSERVATION_WINDOW_DAYS),
        )?;
        if observations.is_empty() {
            return Err(PricingError::insufficient_data(1, 0));
        }

        let prices: Vec<f64> = observations.iter().map(|o| o.price).collect();
        let avg = prices.iter().sum::<f64>() / prices.len() as f64;
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let our_price = product.effective_price();

        let (position, advantage) = if our_price < min {
            (MarketPosition::Lowest, min - our_price)
        } else if our_price > max {
            (MarketPosition::Highest, our_price - max)
        } else {
            (MarketPosition::Competitive, 0.0)
        };

        let recommendation = match position {
            MarketPosition::Lowest if advantage > avg * 0.10 => {
                CompetitorRecommendation::ConsiderPriceIncrease
            }
            MarketPosition::Highest if advantage > avg * 0.15 => {
                CompetitorRecommendation::ConsiderPriceDecrease
            }
            _ => CompetitorRecommendation::MaintainCurrentPrice,
        };

        let confidence = (prices.len() as f64 / FULL_CONFIDENCE_COUNT).min(0.95);

        debug!(product_id = %id, ?position, ?recommendation, "analyzed competitor pricing");

        Ok(CompetitorAnalysis {
            product_id: id.clone(),
            our_price,
            competitor_avg: round2(avg),
            competitor_min: round2(min),
            competitor_max: round2(max),
            position,
            price_advantage: round2(advantage),
            recommendation,
            competitor_count: prices.len(),
            confidence: round2(confidence),
            as_of,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    use priceflow_core::{CompetitorObservation, Product};
    use priceflow_store::InMemoryMetricStore;

    pub(crate) fn test_id() -> ProductId {
        ProductId::new("P1001").unwrap()
    }

    pub(crate) fn seed_product(store: &InMemoryMetricStore, current_price: f64) {
        store
            .upsert_product(Product {
                id: test_id(),
                name: "Widget".to_string(),
                current_price,
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

    pub(crate) fn seed_observations(
        store: &InMemoryMetricStore,
        as_of: DateTime<Utc>,
        prices: &[f64],
    ) {
        for (i, &price) in prices.iter().enumerate() {
            store
                .record_observation(CompetitorObservation {
                    product_id: test_id(),
                    competitor: format!("competitor-{i}"),
                    price,
                    observed_at: as_of - Duration::hours(i as i64 + 1),
                    available: true,
                    rating: None,
                    confidence: 1.0,
                })
                .unwrap();
        }
    }

    #[test]
    fn stale_observations_do_not_count() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store, 100.0);
        store
            .record_observation(CompetitorObservation {
                product_id: test_id(),
                competitor: "competitor-0".to_string(),
                price: 95.0,
                observed_at: as_of - Duration::days(10),
                available: true,
                rating: None,
                confidence: 1.0,
            })
            .unwrap();
        let analyzer = CompetitorAnalyzer::new(&store);

        let err = analyzer
            .analyze_competitor_pricing(&test_id(), as_of)
            .unwrap_err();
        assert!(matches!(err, PricingError::InsufficientData { .. }));
    }

    #[test]
    fn deeply_undercut_price_suggests_increase() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store, 70.0);
        seed_observations(&store, as_of, &[95.0, 100.0, 105.0]);
        let analyzer = CompetitorAnalyzer::new(&store);

        let analysis = analyzer
            .analyze_competitor_pricing(&test_id(), as_of)
            .unwrap();
        assert_eq!(analysis.position, MarketPosition::Lowest);
        assert_eq!(analysis.price_advantage, 25.0);
        assert_eq!(
            analysis.recommendation,
            CompetitorRecommendation::ConsiderPriceIncrease
        );
    }

    #[test]
    fn slightly_lowest_price_is_left_alone() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        // Lowest, but only 5 below the minimum (< 10% of the average).
        seed_product(&store, 90.0);
        seed_observations(&store, as_of, &[95.0, 100.0, 105.0]);
        let analyzer = CompetitorAnalyzer::new(&store);

        let analysis = analyzer
            .analyze_competitor_pricing(&test_id(), as_of)
            .unwrap();
        assert_eq!(analysis.position, MarketPosition::Lowest);
        assert_eq!(
            analysis.recommendation,
            CompetitorRecommendation::MaintainCurrentPrice
        );
    }

    #[test]
    fn overpriced_product_suggests_decrease() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store, 130.0);
        seed_observations(&store, as_of, &[95.0, 100.0, 105.0]);
        let analyzer = CompetitorAnalyzer::new(&store);

        let analysis = analyzer
            .analyze_competitor_pricing(&test_id(), as_of)
            .unwrap();
        assert_eq!(analysis.position, MarketPosition::Highest);
        assert_eq!(analysis.price_advantage, 25.0);
        assert_eq!(
            analysis.recommendation,
            CompetitorRecommendation::ConsiderPriceDecrease
        );
    }

    #[test]
    fn confidence_scales_with_competitor_count() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store, 100.0);
        seed_observations(&store, as_of, &[98.0, 102.0]);
        let analyzer = CompetitorAnalyzer::new(&store);

        let analysis = analyzer
            .analyze_competitor_pricing(&test_id(), as_of)
            .unwrap();
        assert_eq!(analysis.position, MarketPosition::Competitive);
        assert_eq!(analysis.confidence, 0.4);

        seed_observations(&store, as_of, &[96.0, 99.0, 101.0, 104.0]);
        let analysis = analyzer
            .analyze_competitor_pricing(&test_id(), as_of)
            .unwrap();
        assert_eq!(analysis.competitor_count, 6);
        assert_eq!(analysis.confidence, 0.95);
    }
}
