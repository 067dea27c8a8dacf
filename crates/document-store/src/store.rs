use std::sync::Arc;

use async_trait::async_trait;

use crate::{AggregateId, Command, CommandId, Document, DocumentQuery, Patch, Result, Version};

/// Read side of a document collection.
#[async_trait]
pub trait DocumentReader<D: Document>: Send + Sync {
    /// Fetches a document by id.
    ///
    /// Returns None if no such document exists.
    async fn find_one_by_id(&self, id: AggregateId) -> Result<Option<D>>;

    /// Fetches the first document matching a query.
    ///
    /// Returns None if nothing matches.
    async fn find_one(&self, query: DocumentQuery) -> Result<Option<D>>;
}

/// Write side of a document collection.
///
/// `update_one` and `delete_one` are compare-and-swap operations: they only
/// apply when the stored version equals `expected`, and report the number of
/// documents affected (0 or 1). A zero count means the document is missing or
/// was modified concurrently.
#[async_trait]
pub trait DocumentWriter<D: Document>: Send + Sync {
    /// Inserts a new document.
    ///
    /// Fails with `DuplicateId` if the id is already taken.
    async fn create(&self, document: D) -> Result<AggregateId>;

    /// Applies a patch if the stored version equals `expected`.
    async fn update_one(&self, id: AggregateId, patch: Patch, expected: Version) -> Result<u64>;

    /// Removes a document if the stored version equals `expected`.
    async fn delete_one(&self, id: AggregateId, expected: Version) -> Result<u64>;

    /// Appends a command to the collection's audit log.
    async fn store_command(&self, command: Command) -> Result<CommandId>;
}

/// A document collection that can be both read and written.
pub trait DocumentStore<D: Document>: DocumentReader<D> + DocumentWriter<D> {}

// Blanket implementation for everything that reads and writes the same collection
impl<D: Document, T: DocumentReader<D> + DocumentWriter<D> + ?Sized> DocumentStore<D> for T {}

#[async_trait]
impl<D: Document, T: DocumentReader<D> + ?Sized> DocumentReader<D> for Arc<T> {
    async fn find_one_by_id(&self, id: AggregateId) -> Result<Option<D>> {
        (**self).find_one_by_id(id).await
    }

    async fn find_one(&self, query: DocumentQuery) -> Result<Option<D>> {
        (**self).find_one(query).await
    }
}

#[async_trait]
impl<D: Document, T: DocumentWriter<D> + ?Sized> DocumentWriter<D> for Arc<T> {
    async fn create(&self, document: D) -> Result<AggregateId> {
        (**self).create(document).await
    }

    async fn update_one(&self, id: AggregateId, patch: Patch, expected: Version) -> Result<u64> {
        (**self).update_one(id, patch, expected).await
    }

    async fn delete_one(&self, id: AggregateId, expected: Version) -> Result<u64> {
        (**self).delete_one(id, expected).await
    }

    async fn store_command(&self, command: Command) -> Result<CommandId> {
        (**self).store_command(command).await
    }
}
