//! The bounded per-cycle price decision.
//!
//! This is the function the signal correlator fires on every completed
//! signal triple. Unlike the optimizer it never looks at the store: it is a
//! pure computation over the correlated payloads, which keeps the decision
//! path deterministic and trivially testable. Every step appends a
//! human-readable line to the reasoning trace; the trace is audit output,
//! never control flow.

use serde::{Deserialize, Serialize};

use priceflow_core::{PricingError, PricingResult};

/// Clamp band around the base price.
const FLOOR_FACTOR: f64 = 0.8;
const CEILING_FACTOR: f64 = 1.3;

/// Outcome of one bounded price decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDecision {
    pub new_price: f64,
    pub demand_factor: f64,
    pub inventory_factor: f64,
    pub competitor_factor: f64,
    pub reasoning: Vec<String>,
}

/// Decide a new price from demand, inventory, and competitor inputs.
///
/// The three factors multiply onto the base price, then the result is
/// clamped to [0.8 × base, 1.3 × base] and rounded to cents. A non-finite
/// or non-positive base price is a `Computation` error; non-finite
/// competitor entries are ignored.
pub fn decide_price(
    competitor_prices: &[f64],
    demand_score: f64,
    inventory_level: i64,
    base_price: f64,
) -> PricingResult<PriceDecision> {
    if !base_price.is_finite() || base_price <= 0.0 {
        return Err(PricingError::computation(format!(
            "base price must be finite and positive, got {base_price}"
        )));
    }

    let mut reasoning = Vec::new();

    reasoning.push("Step 1: Analyzing demand score".to_string());
    let demand_factor = if demand_score > 0.8 {
        reasoning.push("High demand detected (>0.8) - considering price increase".to_string());
        1.10
    } else if demand_score < 0.3 {
        reasoning.push("Low demand detected (<0.3) - considering price decrease".to_string());
        0.95
    } else {
        reasoning.push("Moderate demand - maintaining current pricing strategy".to_string());
        1.0
    };

    reasoning.push("Step 2: Analyzing inventory level".to_string());
    let inventory_factor = if inventory_level < 5 {
        reasoning.push(
            "Low inventory (<5 units) - considering price increase to manage demand".to_string(),
        );
        1.05
    } else if inventory_level > 50 {
        reasoning.push(
            "High inventory (>50 units) - considering price decrease to boost sales".to_string(),
        );
        0.98
    } else {
        reasoning.push("Moderate inventory - no inventory-based price adjustment".to_string());
        1.0
    };

    reasoning.push("Step 3: Analyzing competitor prices".to_string());
    let finite_prices: Vec<f64> = competitor_prices
        .iter()
        .copied()
        .filter(|p| p.is_finite())
        .collect();
    let competitor_factor = if finite_prices.is_empty() {
        reasoning.push("No competitor data available - using base pricing".to_string());
        1.0
    } else {
        let avg = finite_prices.iter().sum::<f64>() / finite_prices.len() as f64;
        reasoning.push(format!("Average competitor price: ${avg:.2}"));

        if base_price < avg * 0.9 {
            reasoning.push(
                "Our price is significantly below competitors - considering increase".to_string(),
            );
            (avg / base_price).min(1.05)
        } else if base_price > avg * 1.1 {
            reasoning.push(
                "Our price is significantly above competitors - considering decrease".to_string(),
            );
            (avg / base_price).max(0.95)
        } else {
            reasoning.push("Our price is competitive with market".to_string());
            1.0
        }
    };

    reasoning.push("Step 4: Calculating final price".to_string());
    let unbounded = base_price * demand_factor * inventory_factor * competitor_factor;
    let clamped = unbounded
        .max(base_price * FLOOR_FACTOR)
        .min(base_price * CEILING_FACTOR);
    let new_price = (clamped * 100.0).round() / 100.0;
    reasoning.push(format!("Final price calculated: ${new_price:.2}"));

    Ok(PriceDecision {
        new_price,
        demand_factor,
        inventory_factor,
        competitor_factor,
        reasoning,
    })
}
