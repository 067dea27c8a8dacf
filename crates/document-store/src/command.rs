use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::AggregateId;

/// Identifier the store assigns to an audited command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(Uuid);

impl CommandId {
    /// Creates a new random command ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Audit record of a mutation request that passed validation.
///
/// Written once, before the aggregate itself is touched, and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The aggregate the request targets.
    pub aggregate_id: AggregateId,

    /// Operation name (e.g. "CreateProduct", "DeleteVariant").
    pub command_type: String,

    /// Flattened field map of the originating request; empty for deletes.
    pub payload: Map<String, Value>,

    /// When the request was accepted.
    pub timestamp: DateTime<Utc>,
}

impl Command {
    /// Creates a command stamped with the current time.
    pub fn new(
        aggregate_id: AggregateId,
        command_type: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        Self {
            aggregate_id,
            command_type: command_type.into(),
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Creates a command from any serializable request.
    ///
    /// Requests that do not serialize to a JSON object are recorded with an
    /// empty payload.
    pub fn from_request<T: Serialize>(
        aggregate_id: AggregateId,
        command_type: impl Into<String>,
        request: &T,
    ) -> Result<Self, serde_json::Error> {
        let payload = match serde_json::to_value(request)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self::new(aggregate_id, command_type, payload))
    }
}
