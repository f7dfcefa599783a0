//! End-to-end demo: seed a product, publish the three signals, watch the
//! bounded decision come back on the `price_decision` topic.
//!
//! Run with: `cargo run -p priceflow-correlator --example decision_pipeline`

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use priceflow_core::{Product, ProductId};
use priceflow_correlator::{run_decision_loop, DecisionCycle, DecisionEnvelope};
use priceflow_events::{
    CompetitorSignal, DemandSignal, EventBus, InMemoryEventBus, InventorySignal, Signal,
    SignalEnvelope, Topic,
};
use priceflow_store::InMemoryMetricStore;

fn main() {
    priceflow_observability::init();

    let store = Arc::new(InMemoryMetricStore::new());
    let signal_bus: Arc<InMemoryEventBus<SignalEnvelope>> = Arc::new(InMemoryEventBus::new());
    let decision_bus: Arc<InMemoryEventBus<DecisionEnvelope>> = Arc::new(InMemoryEventBus::new());

    let product_id = ProductId::new("P1001").expect("static id is valid");
    store
        .upsert_product(Product {
            id: product_id.clone(),
            name: "Wireless Headphones".to_string(),
            current_price: 100.0,
            base_price: 100.0,
            cost_price: 60.0,
            stock_level: 3,
            demand_score: 0.5,
            sales_velocity: 0.0,
            price_elasticity: -1.0,
            market_position: None,
            active: true,
            last_updated: Utc::now(),
        })
        .expect("in-memory store accepts the seed product");

    let inbound = signal_bus.subscribe_topics(&Topic::INBOUND);
    let outbound = decision_bus.subscribe(Topic::PriceDecision);

    let loop_store = store.clone();
    let loop_decisions = decision_bus.clone();
    std::thread::spawn(move || {
        let cycle = DecisionCycle::new(loop_store.clone(), loop_store);
        run_decision_loop(&cycle, inbound, &loop_decisions);
    });

    // Three independent producers, one message each.
    let signals = [
        (
            Topic::DemandScore,
            "DemandAnalysisAgent",
            Signal::Demand(DemandSignal {
                product_id: product_id.clone(),
                score: 0.9,
                velocity: 12.0,
                confidence: 0.8,
            }),
        ),
        (
            Topic::InventoryUpdate,
            "InventoryTrackingAgent",
            Signal::Inventory(InventorySignal {
                product_id: product_id.clone(),
                stock_level: 3,
                reorder_point: 10,
            }),
        ),
        (
            Topic::CompetitorData,
            "CompetitorMonitoringAgent",
            Signal::Competitor(CompetitorSignal {
                product_id: product_id.clone(),
                prices: vec![95.0, 105.0],
                observed_at: Utc::now(),
            }),
        ),
    ];
    for (topic, agent, signal) in signals {
        signal_bus
            .publish(topic, SignalEnvelope::new(agent, Utc::now(), signal))
            .expect("in-memory bus publish cannot fail");
    }

    let envelope = outbound
        .recv_timeout(Duration::from_secs(5))
        .expect("decision arrives once all three signals are in");
    let decision = envelope.into_payload();

    println!(
        "{} repriced: ${:.2} -> ${:.2} ({:+.1}%)",
        decision.product_id, decision.old_price, decision.new_price, decision.price_change_percent
    );
    for line in &decision.reasoning {
        println!("  {line}");
    }
}
