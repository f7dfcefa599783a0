//! `priceflow-demand` — the Demand Scorer.
//!
//! Turns raw sale events and inventory posture into normalized demand
//! scores, short-horizon forecasts, and a fused sentiment view. All
//! operations are deterministic for a given store state and `as_of` time.

pub mod forecast;
pub mod scorer;
pub mod series;
pub mod signals;

pub use forecast::{DailyForecast, DemandForecast, MIN_HISTORY_DAYS};
pub use scorer::{DemandAssessment, DemandFactors, DemandScorer, SalesVelocity};
pub use signals::{DemandSignalTag, DemandSignals, Sentiment};
