//! Sales velocity and the composite demand score.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use priceflow_core::{PricingResult, ProductId};
use priceflow_store::MetricStore;

use crate::series::{daily_totals, round2};

/// Default velocity window (days).
pub const VELOCITY_WINDOW_DAYS: i64 = 7;
/// Recent window used for trend comparison (days).
pub const TREND_RECENT_DAYS: i64 = 3;

/// Reorder point assumed when no inventory snapshot exists yet.
const DEFAULT_REORDER_POINT: i64 = 10;

/// Fixed weights for the composite score.
const WEIGHT_VELOCITY: f64 = 0.4;
const WEIGHT_TURNOVER: f64 = 0.3;
const WEIGHT_TREND: f64 = 0.2;
const WEIGHT_ELASTICITY: f64 = 0.1;

/// Average units/day over a window, with a consistency-based confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesVelocity {
    pub product_id: ProductId,
    /// Units per day over the window.
    pub velocity: f64,
    pub total_units: i64,
    pub period_days: i64,
    pub days_with_sales: i64,
    /// min(0.95, days_with_sales / period_days): evenly distributed sales
    /// score higher than clustered bursts.
    pub confidence: f64,
}

/// The four sub-scores feeding the composite demand score, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandFactors {
    pub velocity: f64,
    /// Inverted signal: scarcity implies demand.
    pub stock_turnover: f64,
    pub trend: f64,
    pub elasticity: f64,
}

/// Composite demand assessment for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandAssessment {
    pub product_id: ProductId,
    /// Weighted composite in [0, 1], rounded to 2 decimals.
    pub score: f64,
    pub sales_velocity: f64,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub factors: DemandFactors,
    pub explanation: String,
    /// Carried over from the velocity calculation.
    pub confidence: f64,
    pub as_of: DateTime<Utc>,
}

/// Demand Scorer: turns raw sale/inventory series into normalized scores.
#[derive(Debug)]
pub struct DemandScorer<S> {
    store: S,
}

impl<S> DemandScorer<S>
where
    S: MetricStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Average units sold per day over the trailing `days` window.
    ///
    /// Zero sale events is a valid answer (velocity 0.0, confidence 0.0),
    /// not an error: the correlator must always receive a usable signal.
    pub fn sales_velocity(
        &self,
        id: &ProductId,
        days: i64,
        as_of: DateTime<Utc>,
    ) -> PricingResult<SalesVelocity> {
        let since = as_of - Duration::days(days);
        let sales = self.store.get_sales(id, since)?;

        if sales.is_empty() {
            return Ok(SalesVelocity {
                product_id: id.clone(),
                velocity: 0.0,
                total_units: 0,
                period_days: days,
                days_with_sales: 0,
                confidence: 0.0,
            });
        }

        let total_units: i64 = sales.iter().map(|s| s.quantity).sum();
        let velocity = total_units as f64 / days as f64;

        let days_with_sales = daily_totals(&sales).len() as i64;
        let consistency = days_with_sales as f64 / days as f64;
        let confidence = consistency.min(0.95);

        Ok(SalesVelocity {
            product_id: id.clone(),
            velocity: round2(velocity),
            total_units,
            period_days: days,
            days_with_sales,
            confidence: round2(confidence),
        })
    }

    /// Composite demand score from velocity, stock turnover, trend, and
    /// elasticity sub-scores with fixed weights {0.4, 0.3, 0.2, 0.1}.
    ///
    /// Fails with `NotFound` when the product does not exist; a missing
    /// inventory snapshot degrades to stock 0 / reorder point 10.
    pub fn demand_score(
        &self,
        id: &ProductId,
        as_of: DateTime<Utc>,
    ) -> PricingResult<DemandAssessment> {
        let product = self.store.get_product(id)?;

        let velocity = self.sales_velocity(id, VELOCITY_WINDOW_DAYS, as_of)?;

        let (current_stock, reorder_point) = match self.store.get_latest_inventory(id)? {
            Some(snapshot) => (snapshot.stock_level, snapshot.reorder_point),
            None => (0, DEFAULT_REORDER_POINT),
        };

        let factors = DemandFactors {
            velocity: velocity_score(velocity.velocity),
            stock_turnover: turnover_score(current_stock, reorder_point),
            trend: self.trend_score(id, as_of)?,
            elasticity: elasticity_score(product.price_elasticity),
        };

        let score = round2(
            factors.velocity * WEIGHT_VELOCITY
                + factors.stock_turnover * WEIGHT_TURNOVER
                + factors.trend * WEIGHT_TREND
                + factors.elasticity * WEIGHT_ELASTICITY,
        );

        debug!(product_id = %id, score, "computed demand score");

        Ok(DemandAssessment {
            product_id: id.clone(),
            score,
            sales_velocity: velocity.velocity,
            current_stock,
            reorder_point,
            explanation: explain(&factors),
            confidence: velocity.confidence,
            factors,
            as_of,
        })
    }

    /// Trend sub-score: 3-day velocity vs. 7-day velocity.
    fn trend_score(&self, id: &ProductId, as_of: DateTime<Utc>) -> PricingResult<f64> {
        let recent = self.sales_velocity(id, TREND_RECENT_DAYS, as_of)?;
        let older = self.sales_velocity(id, VELOCITY_WINDOW_DAYS, as_of)?;

        Ok(if recent.velocity > older.velocity {
            0.9
        } else if recent.velocity == older.velocity {
            0.7
        } else {
            0.5
        })
    }
}

/// Step function over units/day. Empirical thresholds; do not recalibrate
/// without new data.
fn velocity_score(velocity: f64) -> f64 {
    if velocity > 20.0 {
        1.0
    } else if velocity > 10.0 {
        0.8
    } else if velocity > 5.0 {
        0.6
    } else if velocity > 1.0 {
        0.4
    } else {
        0.2
    }
}

/// Step function over stock vs. reorder point. Out of stock reads as peak
/// demand; deep stock reads as weak demand.
fn turnover_score(current_stock: i64, reorder_point: i64) -> f64 {
    if current_stock == 0 {
        1.0
    } else if current_stock <= reorder_point {
        0.9
    } else if current_stock <= reorder_point * 2 {
        0.7
    } else if current_stock <= reorder_point * 3 {
        0.5
    } else {
        0.3
    }
}

/// Elasticity sub-score: strongly elastic products respond to price moves,
/// which reads as demand potential.
fn elasticity_score(elasticity: f64) -> f64 {
    if elasticity < -1.5 {
        0.8
    } else if elasticity > -0.5 {
        0.6
    } else {
        0.7
    }
}

fn explain(factors: &DemandFactors) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if factors.velocity > 0.7 {
        parts.push("High sales velocity indicates strong demand");
    }
    if factors.stock_turnover > 0.7 {
        parts.push("Low stock levels suggest high demand");
    }
    if factors.trend > 0.8 {
        parts.push("Increasing sales trend");
    }

    if parts.is_empty() {
        "Moderate demand based on current metrics".to_string()
    } else {
        parts.join(". ")
    }
}
