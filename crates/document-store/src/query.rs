use serde::Serialize;
use serde_json::{Map, Value};

/// Builder for constructing document lookups.
///
/// Each criterion requires a top-level field of the serialized document to
/// equal the given JSON value exactly. Objects compare as whole values, so a
/// criterion on a map field matches only documents holding the same set of
/// entries. A query without criteria matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    criteria: Map<String, Value>,
}

impl DocumentQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field` to equal `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.insert(field.into(), value.into());
        self
    }

    /// Requires `field` to equal the serialized form of `value`.
    pub fn eq_serialized<T: Serialize>(
        self,
        field: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(self.eq(field, serde_json::to_value(value)?))
    }

    /// Returns the criteria in insertion order.
    pub fn criteria(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.criteria.iter()
    }

    /// Returns true if the query has no criteria.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Evaluates the query against a serialized document.
    pub fn matches(&self, document: &Value) -> bool {
        let Value::Object(fields) = document else {
            return self.criteria.is_empty();
        };
        self.criteria
            .iter()
            .all(|(field, expected)| fields.get(field) == Some(expected))
    }
}
