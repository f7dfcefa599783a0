//! Write side: decisions, price changes, and the price update itself.

use std::sync::Arc;

use priceflow_core::{DecisionRecord, PriceChange, PricingResult, ProductId};

/// Decision sink.
///
/// Write-only, assumed transactional per call. Audit rows (decisions and
/// price changes) require the product id to exist at write time, but must
/// survive if the product is later deactivated.
pub trait DecisionSink: Send + Sync {
    /// Append one decision record to the audit trail.
    fn record_decision(&self, record: DecisionRecord) -> PricingResult<()>;

    /// Append one price change to the audit trail.
    fn record_price_change(&self, change: PriceChange) -> PricingResult<()>;

    /// Apply a new current price to the product record.
    ///
    /// This is the only mutation of product state the core performs.
    /// Implementations serialize concurrent updates for the same product id
    /// within their transaction boundary.
    fn update_product_price(&self, id: &ProductId, new_price: f64) -> PricingResult<()>;
}

impl<K> DecisionSink for &K
where
    K: DecisionSink + ?Sized,
{
    fn record_decision(&self, record: DecisionRecord) -> PricingResult<()> {
        (**self).record_decision(record)
    }

    fn record_price_change(&self, change: PriceChange) -> PricingResult<()> {
        (**self).record_price_change(change)
    }

    fn update_product_price(&self, id: &ProductId, new_price: f64) -> PricingResult<()> {
        (**self).update_product_price(id, new_price)
    }
}

impl<K> DecisionSink for Arc<K>
where
    K: DecisionSink + ?Sized,
{
    fn record_decision(&self, record: DecisionRecord) -> PricingResult<()> {
        (**self).record_decision(record)
    }

    fn record_price_change(&self, change: PriceChange) -> PricingResult<()> {
        (**self).record_price_change(change)
    }

    fn update_product_price(&self, id: &ProductId, new_price: f64) -> PricingResult<()> {
        (**self).update_product_price(id, new_price)
    }
}
