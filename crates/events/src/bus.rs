//! Topic-based publish/subscribe abstraction (mechanics only).
//!
//! The signal bus distributes per-product signal updates from independent
//! producers (competitor monitoring, demand analysis, inventory tracking) to
//! the decision cycle, and carries completed decisions back out.
//!
//! The contract is intentionally lightweight:
//!
//! - **Transport-agnostic**: in-memory channels here; any broker with named
//!   topics can implement the same contract.
//! - **At-least-once acceptable**: messages may be delivered more than once;
//!   the correlator is idempotent per slot (last-write-wins), so duplicates
//!   are harmless.
//! - **No cross-producer ordering**: the three signal producers run
//!   independently and no arrival order is assumed.
//! - **No persistence**: the bus distributes; it does not store. Losing an
//!   in-flight message costs at most one correlation round for one product.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::topic::Topic;

/// A subscription to one or more topics.
///
/// Each subscription receives a copy of every message published to any of
/// its topics (broadcast semantics). Subscriptions are designed for
/// single-threaded consumption; the decision cycle drains one subscription
/// spanning all three inbound topics, which also serializes decisions
/// per product without extra locking.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Signal bus contract.
///
/// Implementations must be safe to share across threads; producers publish
/// concurrently from their own loops. `publish` can fail (bus full, broker
/// unreachable); producers surface that as `UpstreamUnavailable` and retry
/// on their own schedule.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    /// Publish one message to a topic.
    fn publish(&self, topic: Topic, message: M) -> Result<(), Self::Error>;

    /// Subscribe to a set of topics with a single receiving channel.
    ///
    /// The decision cycle consumes all three inbound topics through one
    /// subscription; this is the primitive that supports it.
    fn subscribe_topics(&self, topics: &[Topic]) -> Subscription<M>;

    /// Subscribe to a single topic.
    fn subscribe(&self, topic: Topic) -> Subscription<M> {
        self.subscribe_topics(&[topic])
    }
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, topic: Topic, message: M) -> Result<(), Self::Error> {
        (**self).publish(topic, message)
    }

    fn subscribe_topics(&self, topics: &[Topic]) -> Subscription<M> {
        (**self).subscribe_topics(topics)
    }
}
