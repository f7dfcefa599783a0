//! In-memory metric store + decision sink for tests/dev.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use priceflow_core::{
    CompetitorObservation, DecisionRecord, InventorySnapshot, PriceChange, PricingError,
    PricingResult, Product, ProductId, SaleEvent,
};

use crate::decision_sink::DecisionSink;
use crate::metric_store::MetricStore;

/// In-memory store implementing both sides of the storage contract.
///
/// Each method takes one lock, so every call is its own transaction
/// boundary; concurrent price updates for the same product serialize on the
/// product map lock. Audit vectors are append-only and are intentionally not
/// pruned when a product is deactivated.
#[derive(Debug, Default)]
pub struct InMemoryMetricStore {
    products: Mutex<HashMap<ProductId, Product>>,
    sales: Mutex<Vec<SaleEvent>>,
    observations: Mutex<Vec<CompetitorObservation>>,
    snapshots: Mutex<Vec<InventorySnapshot>>,
    decisions: Mutex<Vec<DecisionRecord>>,
    price_changes: Mutex<Vec<PriceChange>>,
}

fn poisoned(what: &str) -> PricingError {
    PricingError::upstream(format!("in-memory store lock poisoned: {what}"))
}

impl InMemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product record.
    pub fn upsert_product(&self, product: Product) -> PricingResult<()> {
        let mut products = self.products.lock().map_err(|_| poisoned("products"))?;
        products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Mark a product inactive without touching its audit history.
    pub fn deactivate_product(&self, id: &ProductId) -> PricingResult<()> {
        let mut products = self.products.lock().map_err(|_| poisoned("products"))?;
        let product = products.get_mut(id).ok_or(PricingError::NotFound)?;
        product.active = false;
        Ok(())
    }

    /// Append a sale event.
    pub fn record_sale(&self, sale: SaleEvent) -> PricingResult<()> {
        let mut sales = self.sales.lock().map_err(|_| poisoned("sales"))?;
        sales.push(sale);
        Ok(())
    }

    /// Append a competitor observation.
    pub fn record_observation(&self, observation: CompetitorObservation) -> PricingResult<()> {
        let mut observations = self
            .observations
            .lock()
            .map_err(|_| poisoned("observations"))?;
        observations.push(observation);
        Ok(())
    }

    /// Append an inventory snapshot (history is retained).
    pub fn record_snapshot(&self, snapshot: InventorySnapshot) -> PricingResult<()> {
        let mut snapshots = self.snapshots.lock().map_err(|_| poisoned("snapshots"))?;
        snapshots.push(snapshot);
        Ok(())
    }

    /// All recorded decisions (test inspection).
    pub fn decisions(&self) -> PricingResult<Vec<DecisionRecord>> {
        let decisions = self.decisions.lock().map_err(|_| poisoned("decisions"))?;
        Ok(decisions.clone())
    }

    /// All recorded price changes (test inspection).
    pub fn price_changes(&self) -> PricingResult<Vec<PriceChange>> {
        let changes = self
            .price_changes
            .lock()
            .map_err(|_| poisoned("price_changes"))?;
        Ok(changes.clone())
    }

    fn require_product(&self, id: &ProductId) -> PricingResult<()> {
        let products = self.products.lock().map_err(|_| poisoned("products"))?;
        if products.contains_key(id) {
            Ok(())
        } else {
            Err(PricingError::NotFound)
        }
    }
}

impl MetricStore for InMemoryMetricStore {
    fn get_product(&self, id: &ProductId) -> PricingResult<Product> {
        let products = self.products.lock().map_err(|_| poisoned("products"))?;
        products.get(id).cloned().ok_or(PricingError::NotFound)
    }

    fn get_sales(&self, id: &ProductId, since: DateTime<Utc>) -> PricingResult<Vec<SaleEvent>> {
        let sales = self.sales.lock().map_err(|_| poisoned("sales"))?;
        let mut matching: Vec<SaleEvent> = sales
            .iter()
            .filter(|s| &s.product_id == id && s.sold_at >= since)
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.sold_at);
        Ok(matching)
    }

    fn get_competitor_observations(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<CompetitorObservation>> {
        let observations = self
            .observations
            .lock()
            .map_err(|_| poisoned("observations"))?;
        let mut matching: Vec<CompetitorObservation> = observations
            .iter()
            .filter(|o| &o.product_id == id && o.observed_at >= since)
            .cloned()
            .collect();
        matching.sort_by_key(|o| o.observed_at);
        Ok(matching)
    }

    fn get_latest_inventory(&self, id: &ProductId) -> PricingResult<Option<InventorySnapshot>> {
        let snapshots = self.snapshots.lock().map_err(|_| poisoned("snapshots"))?;
        Ok(snapshots
            .iter()
            .filter(|s| &s.product_id == id)
            .max_by_key(|s| s.recorded_at)
            .cloned())
    }

    fn get_price_changes(
        &self,
        id: &ProductId,
        since: DateTime<Utc>,
    ) -> PricingResult<Vec<PriceChange>> {
        let changes = self
            .price_changes
            .lock()
            .map_err(|_| poisoned("price_changes"))?;
        let mut matching: Vec<PriceChange> = changes
            .iter()
            .filter(|c| &c.product_id == id && c.changed_at >= since)
            .cloned()
            .collect();
        matching.sort_by_key(|c| c.changed_at);
        Ok(matching)
    }
}

impl DecisionSink for InMemoryMetricStore {
    fn record_decision(&self, record: DecisionRecord) -> PricingResult<()> {
        self.require_product(&record.product_id)?;
        let mut decisions = self.decisions.lock().map_err(|_| poisoned("decisions"))?;
        decisions.push(record);
        Ok(())
    }

    fn record_price_change(&self, change: PriceChange) -> PricingResult<()> {
        self.require_product(&change.product_id)?;
        let mut changes = self
            .price_changes
            .lock()
            .map_err(|_| poisoned("price_changes"))?;
        changes.push(change);
        Ok(())
    }

    fn update_product_price(&self, id: &ProductId, new_price: f64) -> PricingResult<()> {
        let mut products = self.products.lock().map_err(|_| poisoned("products"))?;
        let product = products.get_mut(id).ok_or(PricingError::NotFound)?;
        product.current_price = new_price;
        product.last_updated = Utc::now();
        Ok(())
    }
}
