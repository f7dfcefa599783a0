//! Price elasticity estimation from applied price changes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use priceflow_core::{PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::optimizer::{round2, PricingOptimizer};

/// Default lookback for elasticity estimation (days).
pub const ELASTICITY_WINDOW_DAYS: i64 = 30;

/// Assumed elasticity when history cannot support an estimate.
const DEFAULT_ELASTICITY: f64 = -1.0;

/// Elasticity estimate with its evidential basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticityEstimate {
    pub product_id: ProductId,
    /// Average quantity-change / price-change ratio; negative means demand
    /// falls when price rises.
    pub elasticity: f64,
    pub confidence: f64,
    /// Price-history rows inspected.
    pub data_points: usize,
    /// Pairs with a non-zero price move that entered the average.
    pub price_changes_used: usize,
}

impl<S> PricingOptimizer<S>
where
    S: MetricStore,
{
    /// Estimate elasticity from percentage changes between consecutive
    /// applied prices and the quantities sold alongside them.
    ///
    /// Thin history is soft: fewer than two price changes or two sale
    /// points yields the default elasticity of −1.0 at half confidence.
    pub fn estimate_price_elasticity(
        &self,
        id: &ProductId,
        days: i64,
        as_of: DateTime<Utc>,
    ) -> PricingResult<ElasticityEstimate> {
        let since = as_of - Duration::days(days);
        let price_history = self.store().get_price_changes(id, since)?;
        let sales = self.store().get_sales(id, since)?;

        if price_history.len() < 2 || sales.len() < 2 {
            return Ok(ElasticityEstimate {
                product_id: id.clone(),
                elasticity: DEFAULT_ELASTICITY,
                confidence: 0.5,
                data_points: price_history.len(),
                price_changes_used: 0,
            });
        }

        let pairs = price_history.len().min(sales.len());
        let mut ratios = Vec::new();
        for i in 1..pairs {
            let prev_price = price_history[i - 1].new_price;
            if prev_price <= 0.0 {
                continue;
            }
            let price_change = (price_history[i].new_price - prev_price) / prev_price;
            if price_change == 0.0 {
                continue;
            }

            let prev_quantity = sales[i - 1].quantity;
            let quantity_change = if prev_quantity > 0 {
                (sales[i].quantity - prev_quantity) as f64 / prev_quantity as f64
            } else {
                0.0
            };

            ratios.push(quantity_change / price_change);
        }

        if ratios.is_empty() {
            return Ok(ElasticityEstimate {
                product_id: id.clone(),
                elasticity: DEFAULT_ELASTICITY,
                confidence: 0.5,
                data_points: price_history.len(),
                price_changes_used: 0,
            });
        }

        let average = ratios.iter().sum::<f64>() / ratios.len() as f64;
        let confidence = (ratios.len() as f64 / 10.0).min(0.9);

        Ok(ElasticityEstimate {
            product_id: id.clone(),
            elasticity: round2(average),
            confidence: round2(confidence),
            data_points: price_history.len(),
            price_changes_used: ratios.len(),
        })
    }
}
