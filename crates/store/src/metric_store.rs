//! Read-only access to the three time series the scoring models consume.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use priceflow_core::{
    CompetitorObservation, InventorySnapshot, PriceChange, PricingResult, Product, ProductId,
    SaleEvent,
};

/// Metric store adapter.
///
/// The core never defines schema or connection details; any backing store
/// that can answer these five reads works. Implementations map their own
/// transport failures to `PricingError::UpstreamUnavailable`.
pub trait MetricStore: Send + Sync {
    /// Fetch a product record. `NotFound` if the id does not exist.
    fn get_product(&self, id: &ProductId) -> PricingResult<Product>;

    /// Sale events for a product at or after `since`, oldest first.
    fn get_sales(&self, id: &ProductId, since: DateTime<Utc>) -> PricingResult<Vec<SaleEvent>>;

    /// Competitor observations for a product at or after `since`, oldest first.
    fn get_competitor_observations(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<CompetitorObservation>>;

    /// Most recent inventory snapshot, if any was ever recorded.
    fn get_latest_inventory(&self, id: &ProductId) -> PricingResult<Option<InventorySnapshot>>;

    /// Applied price changes at or after `since`, oldest first.
    ///
    /// Elasticity estimation reads the retained price history; this is the
    /// read side of the append-only `PriceChange` trail.
    fn get_price_changes(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<PriceChange>>;
}

impl<S> MetricStore for &S
where
    S: MetricStore + ?Sized,
{
    fn get_product(&self, id: &ProductId) -> PricingResult<Product> {
        (**self).get_product(id)
    }

    fn get_sales(&self, id: &ProductId, since: DateTime<Utc>) -> PricingResult<Vec<SaleEvent>> {
        (**self).get_sales(id, since)
    }

    fn get_competitor_observations(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<CompetitorObservation>> {
        (**self).get_competitor_observations(id, since)
    }

    fn get_latest_inventory(&self, id: &ProductId) -> PricingResult<Option<InventorySnapshot>> {
        (**self).get_latest_inventory(id)
    }

    fn get_price_changes(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<PriceChange>> {
        (**self).get_price_changes(id, since)
    }
}

impl<S> MetricStore for Arc<S>
where
    S: MetricStore + ?Sized,
{
    fn get_product(&self, id: &ProductId) -> PricingResult<Product> {
        (**self).get_product(id)
    }

    fn get_sales(&self, id: &ProductId, since: DateTime<Utc>) -> PricingResult<Vec<SaleEvent>> {
        (**self).get_sales(id, since)
    }

    fn get_competitor_observations(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<CompetitorObservation>> {
        (**self).get_competitor_observations(id, since)
    }

    fn get_latest_inventory(&self, id: &ProductId) -> PricingResult<Option<InventorySnapshot>> {
        (**self).get_latest_inventory(id)
    }

    fn get_price_changes(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<PriceChange>> {
        (**self).get_price_changes(id, since)
    }
}
