//! `priceflow-correlator` — signal correlation and the decision cycle.
//!
//! Joins the three per-product signals (competitor, demand, inventory),
//! fires the bounded price decision exactly once per completed triple,
//! persists the audit trail, and publishes the outcome.

pub mod correlator;
pub mod cycle;
pub mod recorder;


pub use correlator::{CorrelatedSignals, SignalCorrelator};
pub use cycle::{
    run_decision_loop, DecisionCycle, DecisionEnvelope, PriceDecisionEvent, AGENT_NAME,
    DECISION_KIND,
};
pub use recorder::DecisionRecorder;
