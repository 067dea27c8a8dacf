//! Domain events emitted by the mutation engine.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use common::{AggregateId, Version};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Payload of a single domain event.
///
/// Field variants serialize as a single-key map (`{"name": "New name"}`) so
/// that the serialized change doubles as a document patch.
pub trait Change: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Returns the event type name (e.g. `PRODUCT_NAME_UPDATED`).
    fn event_type(&self) -> &'static str;
}

/// An immutable record of one change to one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent<C> {
    pub event_id: Uuid,
    pub aggregate_id: AggregateId,
    pub aggregate_type: String,
    pub event_type: String,

    /// Aggregate version right after this change.
    pub version: Version,
    pub payload: C,
    pub timestamp: DateTime<Utc>,
}

impl<C: Change> DomainEvent<C> {
    pub fn new(
        aggregate_id: AggregateId,
        aggregate_type: &str,
        version: Version,
        payload: C,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id,
            aggregate_type: aggregate_type.to_string(),
            event_type: payload.event_type().to_string(),
            version,
            payload,
            timestamp,
        }
    }
}
