use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, Command, CommandId, Document, DocumentQuery, Patch, Result, StoreError, Version,
    store::{DocumentReader, DocumentWriter},
};

/// In-memory document store implementation for testing.
///
/// Holds one collection of `D` plus its command log, and provides the same
/// compare-and-swap semantics as the PostgreSQL implementation.
pub struct InMemoryDocumentStore<D> {
    documents: Arc<RwLock<HashMap<AggregateId, D>>>,
    commands: Arc<RwLock<Vec<Command>>>,
}

impl<D> Clone for InMemoryDocumentStore<D> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            commands: Arc::clone(&self.commands),
        }
    }
}

impl<D> Default for InMemoryDocumentStore<D> {
    fn default() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            commands: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<D: Document> InMemoryDocumentStore<D> {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents stored.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns a copy of the command log in insertion order.
    pub async fn commands(&self) -> Vec<Command> {
        self.commands.read().await.clone()
    }
}

#[async_trait]
impl<D: Document> DocumentReader<D> for InMemoryDocumentStore<D> {
    async fn find_one_by_id(&self, id: AggregateId) -> Result<Option<D>> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn find_one(&self, query: DocumentQuery) -> Result<Option<D>> {
        let documents = self.documents.read().await;
        for document in documents.values() {
            if query.matches(&serde_json::to_value(document)?) {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<D: Document> DocumentWriter<D> for InMemoryDocumentStore<D> {
    async fn create(&self, document: D) -> Result<AggregateId> {
        let id = document.id();
        let mut documents = self.documents.write().await;
        if documents.contains_key(&id) {
            return Err(StoreError::DuplicateId {
                collection: D::collection(),
                id,
            });
        }
        documents.insert(id, document);
        Ok(id)
    }

    async fn update_one(&self, id: AggregateId, patch: Patch, expected: Version) -> Result<u64> {
        let mut documents = self.documents.write().await;
        let Some(current) = documents.get_mut(&id) else {
            return Ok(0);
        };
        if current.version() != expected {
            return Ok(0);
        }

        let mut value = serde_json::to_value(&*current)?;
        if !patch.apply_to(&mut value) {
            return Err(StoreError::MalformedDocument(id));
        }
        *current = serde_json::from_value(value)?;
        Ok(1)
    }

    async fn delete_one(&self, id: AggregateId, expected: Version) -> Result<u64> {
        let mut documents = self.documents.write().await;
        match documents.get(&id) {
            Some(current) if current.version() == expected => {
                documents.remove(&id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn store_command(&self, command: Command) -> Result<CommandId> {
        self.commands.write().await.push(command);
        Ok(CommandId::new())
    }
}
