//! Core aggregate trait and the declarative field table.

use chrono::{DateTime, Utc};
use common::{AggregateId, Version};
use document_store::Document;
use serde::{Serialize, de::DeserializeOwned};
use validator::{Validate, ValidateUrl, ValidationError};

use crate::event::Change;

/// A versioned catalog aggregate persisted as a document.
///
/// Mutations never rebuild the aggregate from events. Instead the engine
/// diffs a partial request against the stored document, writes the changed
/// fields back under a compare-and-swap, and emits one event per change.
pub trait Aggregate: Document + std::fmt::Debug {
    /// Payload of this aggregate's events.
    type Change: Change;

    /// Creation request.
    type Create: Serialize + DeserializeOwned + Validate + std::fmt::Debug + Send + Sync;

    /// Partial update request; absent fields are `None` or empty.
    type Update: Serialize + DeserializeOwned + Validate + std::fmt::Debug + Send + Sync;

    /// Returns the aggregate type name (e.g. "Product").
    ///
    /// Used for command names and event envelopes.
    fn aggregate_type() -> &'static str;

    /// Mutable fields in canonical processing order.
    fn fields() -> &'static [FieldRule<Self>];

    /// Builds the drafted aggregate at version 1 from its seed fields.
    fn draft(id: AggregateId, request: &Self::Create, created_at: DateTime<Utc>) -> Self;

    /// Payload of the draft event, carrying the seed fields.
    fn draft_change(&self) -> Self::Change;

    /// Payload of the deletion event.
    fn deleted_change() -> Self::Change;

    /// The part of a creation request that goes through the field diff.
    fn creation_fields(request: &Self::Create) -> Self::Update;

    /// Applies one change to the in-memory state.
    fn apply(&mut self, change: &Self::Change);

    /// Sets the aggregate version.
    fn set_version(&mut self, version: Version);
}

/// One row of an aggregate's mutable-field table.
pub struct FieldRule<A: Aggregate> {
    /// Request field name; capitalized in "already updated" messages.
    pub field: &'static str,

    /// Extracts the requested change; `None` when the field is absent.
    pub requested: fn(&A::Update) -> Option<A::Change>,

    /// Extracts the current value as a change for comparison.
    pub current: fn(&A) -> A::Change,
}

/// Returns the value when it is not the empty string.
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Returns the value when it is not zero.
pub(crate) fn non_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

/// Accepts an empty image or an absolute URL.
pub(crate) fn image_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        return Ok(());
    }
    Err(ValidationError::new("url").with_message("Image must be a valid URL".into()))
}
