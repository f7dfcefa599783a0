//! Aggregated pricing recommendation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use priceflow_core::{PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::competitor::{CompetitorAnalysis, CompetitorAnalyzer, CompetitorRecommendation};
use crate::elasticity::{ElasticityEstimate, ELASTICITY_WINDOW_DAYS};
use crate::optimizer::{OptimalPrice, PriceAction, PricingOptimizer};

/// Overall direction across all pricing analyses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallRecommendation {
    IncreasePrice,
    DecreasePrice,
    MaintainCurrentPrice,
}

/// Combined view of elasticity, competitor, and optimal-price analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecommendations {
    pub product_id: ProductId,
    pub elasticity: ElasticityEstimate,
    /// Absent when there is no recent competitor data.
    pub competitor: Option<CompetitorAnalysis>,
    pub optimal: OptimalPrice,
    pub overall: OverallRecommendation,
    pub reasoning: Vec<String>,
    pub confidence: f64,
    pub as_of: DateTime<Utc>,
}

impl<S> PricingOptimizer<S>
where
    S: MetricStore,
{
    /// Run all pricing analyses and fold them into one recommendation.
    /// The optimal-price direction leads; the competitor view only adds
    /// reasoning. Only `NotFound` (or an unreachable store) propagates.
    pub fn pricing_recommendations(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<PricingRecommendations> {
        let elasticity = self.estimate_price_elasticity(id, ELASTICITY_WINDOW_DAYS, as_of)?;
        let optimal = self.calculate_optimal_price(id, as_of)?;

        let competitor = match CompetitorAnalyzer::new(self.store())
            .analyze_competitor_pricing(id, as_of)
        {
            Ok(analysis) => Some(analysis),
            Err(err) if err.is_soft() => {
                debug!(product_id = %id, "no recent competitor data for recommendations");
                None
            }
            Err(err) => return Err(err),
        };

        let mut reasoning = Vec::new();
        let overall = match optimal.recommendation {
            PriceAction::Increase => {
                reasoning.push("Optimal price analysis suggests price increase".to_string());
                OverallRecommendation::IncreasePrice
            }
            PriceAction::Decrease => {
                reasoning.push("Optimal price analysis suggests price decrease".to_string());
                OverallRecommendation::DecreasePrice
            }
            PriceAction::Maintain => OverallRecommendation::MaintainCurrentPrice,
        };

        if let Some(analysis) = &competitor {
            match analysis.recommendation {
                CompetitorRecommendation::ConsiderPriceIncrease => reasoning
                    .push("Competitor analysis suggests potential price increase".to_string()),
                CompetitorRecommendation::ConsiderPriceDecrease => reasoning
                    .push("Competitor analysis suggests potential price decrease".to_string()),
                CompetitorRecommendation::MaintainCurrentPrice => {}
            }
        }

        Ok(PricingRecommendations {
            product_id: id.clone(),
            elasticity,
            competitor,
            optimal,
            overall,
            reasoning,
            confidence: 0.7,
            as_of,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::competitor::tests::{seed_observations, seed_product, test_id};
    use priceflow_core::Product;
    use priceflow_store::InMemoryMetricStore;

    #[test]
    fn maintain_when_everything_is_neutral() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        // Cost floor 102 against a current price of 100 with neutral
        // adjustments: optimal lands within ±2%.
        store
            .upsert_product(Product {
                id: test_id(),
                name: "Widget".to_string(),
                current_price: 100.0,
                base_price: 100.0,
                cost_price: 85.0,
                stock_level: 25,
                demand_score: 0.5,
                sales_velocity: 0.0,
                price_elasticity: -1.0,
                market_position: None,
                active: true,
                last_updated: Utc::now(),
            })
            .unwrap();
        seed_observations(&store, as_of, &[98.0, 100.0, 102.0]);
        let optimizer = PricingOptimizer::new(&store);

        let recommendations = optimizer
            .pricing_recommendations(&test_id(), as_of)
            .unwrap();
        assert_eq!(
            recommendations.overall,
            OverallRecommendation::MaintainCurrentPrice
        );
        assert!(recommendations.competitor.is_some());
    }

    #[test]
    fn decrease_direction_carries_reasoning() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        // Optimal far below current: cost floor 72 against a 100 price in a
        // cheap market.
        seed_product(&store, 100.0);
        seed_observations(&store, as_of, &[70.0, 72.0, 74.0]);
        let optimizer = PricingOptimizer::new(&store);

        let recommendations = optimizer
            .pricing_recommendations(&test_id(), as_of)
            .unwrap();
        assert_eq!(
            recommendations.overall,
            OverallRecommendation::DecreasePrice
        );
        assert!(recommendations
            .reasoning
            .contains(&"Optimal price analysis suggests price decrease".to_string()));
    }

    #[test]
    fn works_without_competitor_data() {
        let store = InMemoryMetricStore::new();
        let as_of = Utc::now();
        seed_product(&store, 100.0);
        let optimizer = PricingOptimizer::new(&store);

        let recommendations = optimizer
            .pricing_recommendations(&test_id(), as_of)
            .unwrap();
        assert!(recommendations.competitor.is_none());
        assert_eq!(recommendations.elasticity.elasticity, -1.0);
    }
}
