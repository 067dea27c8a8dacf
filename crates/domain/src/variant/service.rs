//! Variant service providing a simplified API for variant operations.

use common::{AggregateId, Version};
use document_store::{DocumentReader, DocumentStore};

use crate::engine::MutationEngine;
use crate::error::DomainError;
use crate::product::Product;
use crate::publisher::EventPublisher;

use super::{CreateVariant, UpdateVariant, Variant, VariantChange, VariantReferences};

/// Service for managing product variants.
pub struct VariantService<S, R, P> {
    engine: MutationEngine<Variant, S, P, VariantReferences<R, S>>,
}

impl<S, R, P> VariantService<S, R, P>
where
    S: DocumentStore<Variant> + Clone,
    R: DocumentReader<Product>,
    P: EventPublisher<VariantChange>,
{
    /// Creates a new variant service.
    ///
    /// The variant store doubles as the source of attribute-set lookups;
    /// `products` resolves the owning product on create.
    pub fn new(store: S, products: R, publisher: P) -> Self {
        let references = VariantReferences::new(products, store.clone());
        Self {
            engine: MutationEngine::new(store, publisher, references),
        }
    }

    /// Returns a reference to the underlying mutation engine.
    pub fn engine(&self) -> &MutationEngine<Variant, S, P, VariantReferences<R, S>> {
        &self.engine
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        request: CreateVariant,
    ) -> Result<(AggregateId, Version), DomainError> {
        self.engine.create(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_one(
        &self,
        id: AggregateId,
        version: Version,
        request: UpdateVariant,
    ) -> Result<Version, DomainError> {
        self.engine.update_one(id, version, request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: AggregateId, version: Version) -> Result<(), DomainError> {
        self.engine.delete(id, version).await
    }
}
