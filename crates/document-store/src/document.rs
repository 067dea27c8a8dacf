use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{AggregateId, Version};

/// Name of the field every serialized document carries its version under.
pub const VERSION_FIELD: &str = "version";

/// A versioned aggregate that can be persisted as a JSON document.
///
/// The serialized form must be a JSON object with a top-level `version`
/// field mirroring [`Document::version`].
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the documents of this type live in (e.g. `"products"`).
    fn collection() -> &'static str;

    /// Returns the document's identity.
    fn id(&self) -> AggregateId;

    /// Returns the stored version of the document.
    fn version(&self) -> Version;
}

/// A shallow set of field overwrites applied together with a version bump.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    version: Version,
    fields: Map<String, Value>,
}

impl Patch {
    /// Creates an empty patch that moves the document to `version`.
    pub fn new(version: Version) -> Self {
        Self {
            version,
            fields: Map::new(),
        }
    }

    /// Overwrites a single field.
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// Merges every entry of a JSON object into the patch.
    ///
    /// Non-object values carry no field and are ignored.
    pub fn merge(&mut self, object: Value) {
        if let Value::Object(entries) = object {
            self.fields.extend(entries);
        }
    }

    /// The version the document moves to.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The overwritten fields, without the version.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns true if no field is overwritten.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The full object to merge into the stored document, version included.
    pub fn to_json(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(VERSION_FIELD.to_string(), Value::from(self.version.as_i64()));
        Value::Object(object)
    }

    /// Applies the patch to a serialized document.
    ///
    /// Returns false, leaving the value untouched, if it is not an object.
    pub fn apply_to(&self, document: &mut Value) -> bool {
        match (document, self.to_json()) {
            (Value::Object(target), Value::Object(entries)) => {
                target.extend(entries);
                true
            }
            _ => false,
        }
    }
}
