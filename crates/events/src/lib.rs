//! `priceflow-events` — signal payloads, envelope, and bus.
//!
//! Transport for per-product signal updates: typed payloads, the
//! `{type, agent, timestamp, payload}` envelope, named topics, and a
//! transport-agnostic pub/sub contract with an in-memory implementation.

pub mod bus;
pub mod envelope;
pub mod in_memory_bus;
pub mod signal;
pub mod topic;

pub use bus::{EventBus, Subscription};
pub use envelope::SignalEnvelope;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use signal::{CompetitorSignal, DemandSignal, InventorySignal, Signal, SignalKind};
pub use topic::Topic;
