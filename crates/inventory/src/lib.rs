//! `priceflow-inventory` — the Inventory Analyzer.
//!
//! Stock status classification, reorder-point recommendation, stockout
//! forecasting, and the aggregated optimization view. Deterministic for a
//! given store state and `as_of` time.

pub mod forecast;
pub mod health;
pub mod optimize;
pub mod reorder;

pub use forecast::{InventoryForecast, ProjectedDay};
pub use health::{InventoryAnalyzer, InventoryHealth, StockStatus, Urgency};
pub use optimize::{InventoryOptimization, OptimizationMetrics};
pub use reorder::{ReorderPointAnalysis, ReorderRecommendation};
