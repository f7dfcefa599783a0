//! Per-product signal correlation.
//!
//! Accumulates the three signal kinds per product identifier and completes
//! exactly when all three are present, then resets that product's slots.
//!
//! Durability stance: this table is in-memory only. If the process
//! restarts, in-flight partial triples are lost and the next full triple
//! for a product starts fresh (at-most-once correlation, by design).

use std::collections::HashMap;

use priceflow_core::ProductId;
use priceflow_events::{CompetitorSignal, DemandSignal, InventorySignal, Signal};

/// A completed signal triple for one product, ready for a price decision.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatedSignals {
    pub product_id: ProductId,
    pub competitor: CompetitorSignal,
    pub demand: DemandSignal,
    pub inventory: InventorySignal,
}

/// Partial state: one slot per signal kind.
#[derive(Debug, Default)]
struct SignalSlots {
    competitor: Option<CompetitorSignal>,
    demand: Option<DemandSignal>,
    inventory: Option<InventorySignal>,
}

impl SignalSlots {
    fn is_complete(&self) -> bool {
        self.competitor.is_some() && self.demand.is_some() && self.inventory.is_some()
    }
}

/// Signal Correlator: non-blocking join of the three per-product signals.
///
/// `observe` never suspends waiting for a specific signal. Arrival of any
/// one signal updates that product's slot (last-write-wins, so duplicate or
/// out-of-order delivery of the same signal is harmless) and completes the
/// triple the moment all three slots are filled. State is keyed strictly by
/// product id; one product's signals can never leak into another's slots.
#[derive(Debug, Default)]
pub struct SignalCorrelator {
    slots: HashMap<ProductId, SignalSlots>,
}

impl SignalCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one signal; returns the completed triple when this signal
    /// fills the last empty slot for its product, resetting the slots.
    pub fn observe(&mut self, signal: Signal) -> Option<CorrelatedSignals> {
        let product_id = signal.product_id().clone();
        let slots = self.slots.entry(product_id.clone()).or_default();

        match signal {
            Signal::Competitor(s) => slots.competitor = Some(s),
            Signal::Demand(s) => slots.demand = Some(s),
            Signal::Inventory(s) => slots.inventory = Some(s),
        }

        if !slots.is_complete() {
            return None;
        }

        // All three present: consume and reset to empty.
        let slots = self.slots.remove(&product_id)?;
        Some(CorrelatedSignals {
            product_id,
            competitor: slots.competitor?,
            demand: slots.demand?,
            inventory: slots.inventory?,
        })
    }

    /// Number of products with partial (incomplete) signal state.
    pub fn pending_products(&self) -> usize {
        self.slots.len()
    }

    /// Whether a product currently has partial signal state.
    pub fn has_partial(&self, id: &ProductId) -> bool {
        self.slots.contains_key(id)
    }
}
