//! In-memory topic bus for tests/dev.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, Subscription};
use crate::topic::Topic;

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory topic-filtered pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out per topic
/// - At-least-once acceptable (the correlator is idempotent per slot)
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<TopicSubscriber<M>>>,
}

#[derive(Debug)]
struct TopicSubscriber<M> {
    topics: Vec<Topic>,
    sender: mpsc::Sender<M>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, topic: Topic, message: M) -> Result<(), Self::Error> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing; untargeted topics are
        // skipped without touching the channel.
        subs.retain(|sub| {
            if !sub.topics.contains(&topic) {
                return true;
            }
            sub.sender.send(message.clone()).is_ok()
        });

        Ok(())
    }

    fn subscribe_topics(&self, topics: &[Topic]) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(TopicSubscriber {
                topics: topics.to_vec(),
                sender: tx,
            });
        }

        Subscription::new(rx)
    }
}
