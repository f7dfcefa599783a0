//! The decision cycle: correlated signals in, priced product out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use priceflow_core::{
    DecisionId, DecisionRecord, PriceChange, PricingError, PricingResult, ProductId,
};
use priceflow_events::{EventBus, SignalEnvelope, Subscription, Topic};
use priceflow_pricing::decide_price;
use priceflow_store::{DecisionSink, MetricStore};

use crate::correlator::{CorrelatedSignals, SignalCorrelator};
use crate::recorder::DecisionRecorder;

/// Source name stamped on decisions, price changes, and outbound messages.
pub const AGENT_NAME: &str = "PricingDecisionAgent";

/// Decision kind recorded in the audit trail.
pub const DECISION_KIND: &str = "price_update";

/// Confidence stamped on automated cycle decisions.
const DECISION_CONFIDENCE: f64 = 0.95;

/// Outbound payload on the `price_decision` topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDecisionEvent {
    pub product_id: ProductId,
    pub old_price: f64,
    pub new_price: f64,
    pub price_change_percent: f64,
    pub confidence: f64,
    pub reasoning: Vec<String>,
}

/// Envelope for outbound decisions: `{type, agent, timestamp, payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEnvelope {
    #[serde(rename = "type")]
    kind: String,
    agent: String,
    timestamp: DateTime<Utc>,
    payload: PriceDecisionEvent,
}

impl DecisionEnvelope {
    pub fn new(timestamp: DateTime<Utc>, payload: PriceDecisionEvent) -> Self {
        Self {
            kind: Topic::PriceDecision.as_str().to_string(),
            agent: AGENT_NAME.to_string(),
            timestamp,
            payload,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn payload(&self) -> &PriceDecisionEvent {
        &self.payload
    }

    pub fn into_payload(self) -> PriceDecisionEvent {
        self.payload
    }
}

/// Executes one bounded price decision per completed signal triple.
#[derive(Debug)]
pub struct DecisionCycle<S, K> {
    store: S,
    recorder: DecisionRecorder<K>,
}

impl<S, K> DecisionCycle<S, K>
where
    S: MetricStore,
    K: DecisionSink,
{
    pub fn new(store: S, sink: K) -> Self {
        Self {
            store,
            recorder: DecisionRecorder::new(sink),
        }
    }

    /// Decide and apply a new price for one correlated triple.
    ///
    /// Hard failures (`NotFound`, unreachable store/sink, or a guarded
    /// computation error) abort this product's cycle only. The price update
    /// is applied before the audit writes; a failed audit write is logged
    /// and never rolls the price back.
    pub fn execute(
        &self,
        signals: &CorrelatedSignals,
        decided_at: DateTime<Utc>,
    ) -> PricingResult<PriceDecisionEvent> {
        let product = self.store.get_product(&signals.product_id)?;

        let decision = decide_price(
            &signals.competitor.prices,
            signals.demand.score,
            signals.inventory.stock_level,
            product.base_price,
        )?;

        let old_price = product.current_price;
        self.recorder
            .sink()
            .update_product_price(&signals.product_id, decision.new_price)?;

        let price_change_percent = if old_price > 0.0 {
            (decision.new_price - old_price) / old_price * 100.0
        } else {
            0.0
        };

        let explanation = format!(
            "Price updated from ${old_price:.2} to ${:.2} based on correlated market signals",
            decision.new_price
        );

        let recorded = self.recorder.record_decision(DecisionRecord {
            id: DecisionId::new(),
            product_id: signals.product_id.clone(),
            agent: AGENT_NAME.to_string(),
            kind: DECISION_KIND.to_string(),
            inputs: json!({
                "demand_score": signals.demand.score,
                "inventory_level": signals.inventory.stock_level,
                "competitor_prices": signals.competitor.prices,
                "base_price": product.base_price,
                "old_price": old_price,
            }),
            outputs: json!({
                "new_price": decision.new_price,
                "price_change_percent": price_change_percent,
                "demand_factor": decision.demand_factor,
                "inventory_factor": decision.inventory_factor,
                "competitor_factor": decision.competitor_factor,
            }),
            confidence: DECISION_CONFIDENCE,
            explanation,
            reasoning: decision.reasoning.clone(),
            decided_at,
        });
        let change_recorded = self.recorder.record_price_change(PriceChange {
            product_id: signals.product_id.clone(),
            old_price,
            new_price: decision.new_price,
            reason: "Automated pricing decision from correlated signals".to_string(),
            source: AGENT_NAME.to_string(),
            confidence: DECISION_CONFIDENCE,
            changed_at: decided_at,
        });

        info!(
            product_id = %signals.product_id,
            old_price,
            new_price = decision.new_price,
            audit_complete = recorded && change_recorded,
            "price decision applied"
        );

        Ok(PriceDecisionEvent {
            product_id: signals.product_id.clone(),
            old_price,
            new_price: decision.new_price,
            price_change_percent,
            confidence: DECISION_CONFIDENCE,
            reasoning: decision.reasoning,
        })
    }
}

/// Single-threaded consumer loop: one subscription spanning the three
/// inbound topics, one correlation table, one decision per completed
/// triple. A single consumer also serializes decisions per product id;
/// different products never contend because correlation state is keyed by
/// product.
pub fn run_decision_loop<S, K, B>(
    cycle: &DecisionCycle<S, K>,
    inbound: Subscription<SignalEnvelope>,
    outbound: &B,
) where
    S: MetricStore,
    K: DecisionSink,
    B: EventBus<DecisionEnvelope>,
{
    let mut correlator = SignalCorrelator::new();
    info!("decision loop listening on competitor_data, demand_score, inventory_update");

    while let Ok(envelope) = inbound.recv() {
        if !envelope.is_consistent() {
            warn!(
                product_id = %envelope.product_id(),
                "envelope type disagrees with payload, routing by payload"
            );
        }

        let Some(correlated) = correlator.observe(envelope.into_payload()) else {
            continue;
        };

        let product_id = correlated.product_id.clone();
        match cycle.execute(&correlated, Utc::now()) {
            Ok(event) => {
                info!(product_id = %product_id, new_price = event.new_price, "publishing price decision");
                if let Err(err) = outbound.publish(
                    Topic::PriceDecision,
                    DecisionEnvelope::new(Utc::now(), event),
                ) {
                    error!(product_id = %product_id, ?err, "failed to publish price decision");
                }
            }
            Err(PricingError::NotFound) => {
                warn!(product_id = %product_id, "product not found, decision skipped");
            }
            Err(err) => {
                error!(product_id = %product_id, %err, "decision cycle aborted for product");
            }
        }
    }

    info!("signal bus closed, decision loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    use priceflow_core::Product;
    use priceflow_events::{CompetitorSignal, DemandSignal, InventorySignal};
    use priceflow_store::InMemoryMetricStore;

    fn test_id() -> ProductId {
        ProductId::new("P1001").unwrap()
    }

    fn seed_product(store: &InMemoryMetricStore, base_price: f64, current_price: f64) {
        store
            .upsert_product(Product {
                id: test_id(),
                name: "Widget".to_string(),
                current_price,
                base_price,
                cost_price: 60.0,
                stock_level: 25,
                demand_score: 0.5,
                sales_velocity: 0.0,
                price_elasticity: -1.0,
                market_position: None,
                active: true,
                last_updated: Utc::now(),
            })
            .unwrap();
    }

    fn correlated(prices: &[f64], score: f64, stock: i64) -> CorrelatedSignals {
        CorrelatedSignals {
            product_id: test_id(),
            competitor: CompetitorSignal {
                product_id: test_id(),
                prices: prices.to_vec(),
                observed_at: Utc::now(),
            },
            demand: DemandSignal {
                product_id: test_id(),
                score,
                velocity: 12.0,
                confidence: 0.8,
            },
            inventory: InventorySignal {
                product_id: test_id(),
                stock_level: stock,
                reorder_point: 10,
            },
        }
    }

    #[test]
    fn cycle_applies_price_and_records_audit_trail() {
        let store = std::sync::Arc::new(InMemoryMetricStore::new());
        seed_product(&store, 100.0, 100.0);
        let cycle = DecisionCycle::new(store.clone(), store.clone());

        let event = cycle
            .execute(&correlated(&[95.0, 105.0], 0.9, 3), Utc::now())
            .unwrap();

        assert_eq!(event.new_price, 115.5);
        assert_eq!(event.old_price, 100.0);
        assert_eq!(
            store.get_product(&test_id()).unwrap().current_price,
            115.5
        );

        let decisions = store.decisions().unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].kind, "price_update");
        assert_eq!(decisions[0].agent, AGENT_NAME);
        assert!(!decisions[0].reasoning.is_empty());
        assert_eq!(decisions[0].inputs["demand_score"], 0.9);

        let changes = store.price_changes().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_price, 100.0);
        assert_eq!(changes[0].new_price, 115.5);
    }

    #[test]
    fn missing_product_aborts_without_side_effects() {
        let store = std::sync::Arc::new(InMemoryMetricStore::new());
        let cycle = DecisionCycle::new(store.clone(), store.clone());

        let err = cycle
            .execute(&correlated(&[95.0], 0.5, 10), Utc::now())
            .unwrap_err();
        assert_eq!(err, PricingError::NotFound);
        assert!(store.decisions().unwrap().is_empty());
        assert!(store.price_changes().unwrap().is_empty());
    }

    #[test]
    fn failed_audit_writes_do_not_block_the_price_update() {
        // Sink whose audit writes always fail but whose price updates work.
        struct AuditlessSink(std::sync::Arc<InMemoryMetricStore>);

        impl DecisionSink for AuditlessSink {
            fn record_decision(&self, _record: DecisionRecord) -> PricingResult<()> {
                Err(PricingError::upstream("audit store offline"))
            }

            fn record_price_change(&self, _change: PriceChange) -> PricingResult<()> {
                Err(PricingError::upstream("audit store offline"))
            }

            fn update_product_price(&self, id: &ProductId, new_price: f64) -> PricingResult<()> {
                self.0.update_product_price(id, new_price)
            }
        }

        let store = std::sync::Arc::new(InMemoryMetricStore::new());
        seed_product(&store, 100.0, 100.0);
        let cycle = DecisionCycle::new(store.clone(), AuditlessSink(store.clone()));

        let event = cycle
            .execute(&correlated(&[95.0, 105.0], 0.9, 3), Utc::now())
            .unwrap();
        assert_eq!(event.new_price, 115.5);
        assert_eq!(
            store.get_product(&test_id()).unwrap().current_price,
            115.5
        );
        // Audit rows were dropped, not the price change.
        assert!(store.decisions().unwrap().is_empty());
    }

    #[test]
    fn decision_envelope_uses_the_wire_shape() {
        let event = PriceDecisionEvent {
            product_id: test_id(),
            old_price: 100.0,
            new_price: 115.5,
            price_change_percent: 15.5,
            confidence: 0.95,
            reasoning: vec!["Step 1: Analyzing demand score".to_string()],
        };
        let envelope = DecisionEnvelope::new(Utc::now(), event);

        let value = serde_json::to_value(&envelope).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["type"], "price_decision");
        assert_eq!(object["agent"], AGENT_NAME);
        assert_eq!(object["payload"]["new_price"], 115.5);
    }
}
