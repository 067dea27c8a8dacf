//! Drains outbound event queues.
//!
//! Each aggregate topic gets a task that logs every published event as JSON
//! until its queue closes.

use domain::{Change, DomainEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns a sink for one topic and returns the number of events it drained.
pub fn spawn<C: Change>(
    topic: &'static str,
    mut batches: mpsc::Receiver<Vec<DomainEvent<C>>>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut drained = 0;
        while let Some(batch) = batches.recv().await {
            for event in batch {
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        tracing::info!(topic, event_type = %event.event_type, payload = %json, "event published");
                    }
                    Err(err) => {
                        tracing::error!(topic, error = %err, "failed to encode event");
                    }
                }
                drained += 1;
            }
        }
        tracing::info!(topic, drained, "event queue closed");
        drained
    })
}
