use thiserror::Error;

use crate::AggregateId;

/// Errors that can occur when interacting with the document store.
///
/// A missing document is not an error: lookups return `None` and
/// compare-and-swap writes report zero affected documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document with this id already exists in the collection.
    #[error("Document {id} already exists in collection {collection}")]
    DuplicateId {
        collection: &'static str,
        id: AggregateId,
    },

    /// A stored document could not be patched because it is not a JSON object.
    #[error("Document {0} is not a JSON object")]
    MalformedDocument(AggregateId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
