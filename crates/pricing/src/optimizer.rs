//! Optimal price from cost floor, demand, competition, and elasticity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use priceflow_core::{PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::competitor::CompetitorAnalyzer;

/// Minimum margin over cost (cost × 1.2).
const MIN_MARGIN_FACTOR: f64 = 1.2;
/// Cap relative to the competitor average (avg × 1.5).
const COMPETITOR_CAP_FACTOR: f64 = 1.5;
/// Demand swing: ±10% around a neutral 0.5 score.
const DEMAND_SWING: f64 = 0.2;

/// Directional tag for a computed price move.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceAction {
    Increase,
    Decrease,
    Maintain,
}

/// The four multiplicative components behind an optimal price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceFactors {
    /// Cost floor in currency units (cost × 1.2).
    pub cost_based: f64,
    pub demand_adjustment: f64,
    pub competition_adjustment: f64,
    pub elasticity_adjustment: f64,
}

/// Result of the optimal-price calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalPrice {
    pub product_id: ProductId,
    pub current_price: f64,
    pub optimal_price: f64,
    pub price_change_percent: f64,
    /// Cost-based floor the result can never go below.
    pub min_price: f64,
    pub factors: PriceFactors,
    pub recommendation: PriceAction,
    pub confidence: f64,
    pub as_of: DateTime<Utc>,
}

/// Pricing Optimizer: the unbounded "where should this price be" model,
/// as opposed to the bounded per-cycle decision in [`crate::decision`].
#[derive(Debug)]
pub struct PricingOptimizer<S> {
    store: S,
}

impl<S> PricingOptimizer<S>
where
    S: MetricStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Combine the cost floor with demand, competition, and elasticity
    /// adjustments applied multiplicatively.
    ///
    /// `NotFound` without the product. Missing recent competitor data is
    /// soft: the competition ratio falls back to neutral.
    pub fn calculate_optimal_price(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<OptimalPrice> {
        let product = self.store.get_product(id)?;

        let current_price = product.effective_price();
        let cost_floor = product.cost_price * MIN_MARGIN_FACTOR;

        let competitor_avg = match CompetitorAnalyzer::new(&self.store)
            .analyze_competitor_pricing(id, as_of)
        {
            Ok(analysis) => analysis.competitor_avg,
            Err(err) if err.is_soft() => {
                debug!(product_id = %id, "no recent competitor data, using neutral ratio");
                current_price
            }
            Err(err) => return Err(err),
        };

        let demand_adjustment = 1.0 + (product.demand_score - 0.5) * DEMAND_SWING;

        let competition_ratio = if current_price > 0.0 {
            competitor_avg / current_price
        } else {
            1.0
        };
        let competition_adjustment = competition_ratio.clamp(0.8, 1.2);

        let elasticity_adjustment = if product.price_elasticity < -1.5 {
            0.95
        } else if product.price_elasticity > -0.5 {
            1.05
        } else {
            1.0
        };

        let unbounded =
            cost_floor * demand_adjustment * competition_adjustment * elasticity_adjustment;
        let optimal = unbounded
            .max(cost_floor)
            .min(competitor_avg * COMPETITOR_CAP_FACTOR);

        let change_percent = if current_price > 0.0 {
            (optimal - current_price) / current_price * 100.0
        } else {
            0.0
        };

        let recommendation = if change_percent > 2.0 {
            PriceAction::Increase
        } else if change_percent < -2.0 {
            PriceAction::Decrease
        } else {
            PriceAction::Maintain
        };

        Ok(OptimalPrice {
            product_id: id.clone(),
            current_price: round2(current_price),
            optimal_price: round2(optimal),
            price_change_percent: round1(change_percent),
            min_price: round2(cost_floor),
            factors: PriceFactors {
                cost_based: round2(cost_floor),
                demand_adjustment: round3(demand_adjustment),
                competition_adjustment: round3(competition_adjustment),
                elasticity_adjustment: round3(elasticity_adjustment),
            },
            recommendation,
            confidence: 0.8,
            as_of,
        })
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
