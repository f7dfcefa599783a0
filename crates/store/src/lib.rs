//! `priceflow-store` — storage contracts and the in-memory implementation.
//!
//! The core treats persistence as an opaque read/write store: `MetricStore`
//! is the read side (time series + product records), `DecisionSink` is the
//! write side (audit trail + the applied price). `InMemoryMetricStore`
//! implements both for tests and development.

pub mod decision_sink;
pub mod in_memory;
pub mod metric_store;

pub use decision_sink::DecisionSink;
pub use in_memory::InMemoryMetricStore;
pub use metric_store::MetricStore;
