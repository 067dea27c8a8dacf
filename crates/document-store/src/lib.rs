//! Document persistence for catalog aggregates.
//!
//! Documents are stored whole, keyed by aggregate id, and guarded by their
//! version: updates and deletes only apply when the caller's expected version
//! still matches the stored one. Every accepted mutation request is also
//! appended to a per-collection command log.

pub mod command;
pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use command::{Command, CommandId};
pub use common::{AggregateId, Version};
pub use document::{Document, Patch};
pub use error::{Result, StoreError};
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use query::DocumentQuery;
pub use store::{DocumentReader, DocumentStore, DocumentWriter};
