//! Pricing-domain error model.

use thiserror::Error;

/// Result type used across the pricing core.
pub type PricingResult<T> = Result<T, PricingError>;

/// Pricing-domain error.
///
/// The taxonomy is deliberately small:
/// - `NotFound` is the only caller-visible hard failure for scoring calls.
/// - `InsufficientData` is soft: most scoring paths degrade to a
///   low-confidence default instead of returning it, and the callers that do
///   receive it (forecasts) must continue with degraded signals.
/// - `UpstreamUnavailable` is retryable and aborts the current product's
///   decision cycle only.
/// - `Computation` should never surface; any occurrence is a bug.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// The product (or a required base record) does not exist. Non-retryable.
    #[error("not found")]
    NotFound,

    /// Not enough historical points to compute the requested value.
    #[error("insufficient data: need {required} data points, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// Metric store or decision sink unreachable. Retryable with backoff.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Invalid numeric state (guarded divisions, non-finite inputs).
    #[error("computation error: {0}")]
    Computation(String),

    /// An identifier failed validation.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl PricingError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn insufficient_data(required: usize, available: usize) -> Self {
        Self::InsufficientData {
            required,
            available,
        }
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Soft failures let the decision cycle proceed with degraded confidence.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
