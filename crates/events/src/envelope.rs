//! Message envelope for signal traffic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use priceflow_core::ProductId;

use crate::signal::{Signal, SignalKind};

/// Envelope for one inbound signal message.
///
/// Wire shape: `{type, agent, timestamp, payload}`. The `type` field names
/// the signal kind; `agent` names the producer that emitted the update;
/// `payload` is the tagged signal carrying the product identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEnvelope {
    #[serde(rename = "type")]
    kind: SignalKind,
    agent: String,
    timestamp: DateTime<Utc>,
    payload: Signal,
}

impl SignalEnvelope {
    /// Wrap a signal; the envelope's `type` is derived from the payload.
    pub fn new(agent: impl Into<String>, timestamp: DateTime<Utc>, payload: Signal) -> Self {
        Self {
            kind: payload.kind(),
            agent: agent.into(),
            timestamp,
            payload,
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn product_id(&self) -> &ProductId {
        self.payload.product_id()
    }

    pub fn payload(&self) -> &Signal {
        &self.payload
    }

    pub fn into_payload(self) -> Signal {
        self.payload
    }

    /// A deserialized envelope whose `type` disagrees with its payload
    /// variant is malformed; the payload variant wins for routing.
    pub fn is_consistent(&self) -> bool {
        self.kind == self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::DemandSignal;

    fn demand_envelope() -> SignalEnvelope {
        SignalEnvelope::new(
            "DemandAnalysisAgent",
            Utc::now(),
            Signal::Demand(DemandSignal {
                product_id: ProductId::new("P1001").unwrap(),
                score: 0.9,
                velocity: 12.0,
                confidence: 0.8,
            }),
        )
    }

    #[test]
    fn envelope_derives_type_from_payload() {
        let envelope = demand_envelope();
        assert_eq!(envelope.kind(), SignalKind::DemandScore);
        assert!(envelope.is_consistent());
    }

    #[test]
    fn envelope_serializes_with_wire_keys() {
        let envelope = demand_envelope();
        let value = serde_json::to_value(&envelope).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["type"], "demand_score");
        assert_eq!(object["agent"], "DemandAnalysisAgent");
        assert!(object.contains_key("timestamp"));
        assert_eq!(object["payload"]["product_id"], "P1001");
    }

    #[test]
    fn envelope_round_trips_through_serde() {
        let envelope = demand_envelope();
        let json = serde_json::to_string(&envelope).unwrap();
        let back: SignalEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }
}
