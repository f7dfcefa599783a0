//! `priceflow-pricing` — competitor analysis and price computation.
//!
//! Two distinct price models live here: the unbounded optimizer
//! (`calculate_optimal_price`, periodic "where should this price be") and
//! the bounded per-cycle decision (`decide_price`, fired by the signal
//! correlator). Plus competitor position analysis, elasticity estimation,
//! and the aggregated recommendation view.

pub mod competitor;
pub mod decision;
pub mod elasticity;
pub mod optimizer;
pub mod recommendations;

pub use competitor::{CompetitorAnalysis, CompetitorAnalyzer, CompetitorRecommendation};
pub use decision::{decide_price, PriceDecision};
pub use elasticity::ElasticityEstimate;
pub use optimizer::{OptimalPrice, PriceAction, PriceFactors, PricingOptimizer};
pub use recommendations::{OverallRecommendation, PricingRecommendations};
