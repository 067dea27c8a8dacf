//! Event publisher collaborators.
//!
//! Publishing is fire-and-forget: the engine hands over one ordered batch per
//! successful mutation and never waits for delivery. A batch that cannot be
//! delivered is dropped and counted; the aggregate write it describes stays
//! committed.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::event::{Change, DomainEvent};

/// Accepts ordered event batches for asynchronous delivery.
pub trait EventPublisher<C>: Send + Sync {
    fn send_messages(&self, events: Vec<DomainEvent<C>>);
}

impl<C, T: EventPublisher<C> + ?Sized> EventPublisher<C> for Arc<T> {
    fn send_messages(&self, events: Vec<DomainEvent<C>>) {
        (**self).send_messages(events)
    }
}

/// Publisher that records every batch, for tests.
#[derive(Debug)]
pub struct InMemoryPublisher<C> {
    batches: Arc<Mutex<Vec<Vec<DomainEvent<C>>>>>,
}

impl<C> Clone for InMemoryPublisher<C> {
    fn clone(&self) -> Self {
        Self {
            batches: Arc::clone(&self.batches),
        }
    }
}

impl<C> Default for InMemoryPublisher<C> {
    fn default() -> Self {
        Self {
            batches: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<C: Change> InMemoryPublisher<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every published batch in publish order.
    pub fn batches(&self) -> Vec<Vec<DomainEvent<C>>> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns every published event, flattened.
    pub fn events(&self) -> Vec<DomainEvent<C>> {
        self.batches().into_iter().flatten().collect()
    }

    pub fn clear(&self) {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<C: Change> EventPublisher<C> for InMemoryPublisher<C> {
    fn send_messages(&self, events: Vec<DomainEvent<C>>) {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(events);
    }
}

/// Publisher backed by a bounded queue.
///
/// A full or closed queue drops the batch with a warning.
#[derive(Debug)]
pub struct ChannelPublisher<C> {
    sender: mpsc::Sender<Vec<DomainEvent<C>>>,
}

impl<C> Clone for ChannelPublisher<C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<C: Change> ChannelPublisher<C> {
    /// Creates a publisher and the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Vec<DomainEvent<C>>>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl<C: Change> EventPublisher<C> for ChannelPublisher<C> {
    fn send_messages(&self, events: Vec<DomainEvent<C>>) {
        if events.is_empty() {
            return;
        }
        let count = events.len() as u64;

        match self.sender.try_send(events) {
            Ok(()) => {
                metrics::counter!("catalog_events_published_total").increment(count);
            }
            Err(err) => {
                let (reason, events) = match err {
                    mpsc::error::TrySendError::Full(events) => ("queue full", events),
                    mpsc::error::TrySendError::Closed(events) => ("queue closed", events),
                };
                let first = &events[0];
                tracing::warn!(
                    aggregate_id = %first.aggregate_id,
                    aggregate_type = %first.aggregate_type,
                    dropped = count,
                    reason,
                    "dropping event batch"
                );
                metrics::counter!("catalog_events_dropped_total").increment(count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{AggregateId, Version};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    enum Bump {
        Count(i64),
    }

    impl Change for Bump {
        fn event_type(&self) -> &'static str {
            "COUNTER_COUNT_UPDATED"
        }
    }

    fn batch(id: AggregateId, n: i64) -> Vec<DomainEvent<Bump>> {
        (1..=n)
            .map(|v| DomainEvent::new(id, "Counter", Version::new(v), Bump::Count(v), Utc::now()))
            .collect()
    }

    #[test]
    fn in_memory_publisher_records_batches() {
        let publisher = InMemoryPublisher::new();
        let id = AggregateId::new();

        publisher.send_messages(batch(id, 2));
        publisher.send_messages(batch(id, 1));

        assert_eq!(publisher.batches().len(), 2);
        assert_eq!(publisher.events().len(), 3);
        assert_eq!(publisher.events()[0].event_type, "COUNTER_COUNT_UPDATED");
    }

    #[tokio::test]
    async fn channel_publisher_delivers_batches_in_order() {
        let (publisher, mut receiver) = ChannelPublisher::channel(4);
        let id = AggregateId::new();

        publisher.send_messages(batch(id, 3));

        let received = receiver.recv().await.unwrap();
        let versions: Vec<_> = received.iter().map(|e| e.version.as_i64()).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn channel_publisher_drops_when_full() {
        let (publisher, mut receiver) = ChannelPublisher::channel(1);
        let id = AggregateId::new();

        publisher.send_messages(batch(id, 1));
        publisher.send_messages(batch(id, 2));

        assert_eq!(receiver.recv().await.unwrap().len(), 1);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn channel_publisher_survives_closed_queue() {
        let (publisher, receiver) = ChannelPublisher::channel(1);
        drop(receiver);
        publisher.send_messages(batch(AggregateId::new(), 1));
    }
}
