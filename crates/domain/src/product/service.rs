//! Product service providing a simplified API for product operations.

use common::{AggregateId, Version};
use document_store::{DocumentReader, DocumentStore};

use crate::brand::Brand;
use crate::engine::MutationEngine;
use crate::error::DomainError;
use crate::publisher::EventPublisher;

use super::{BrandReferences, CreateProduct, Product, ProductChange, ProductStatus, UpdateProduct};

/// Service for managing products.
///
/// Wraps the mutation engine with the brand existence check and adds the
/// publish and unpublish shortcuts.
pub struct ProductService<S, B, P> {
    engine: MutationEngine<Product, S, P, BrandReferences<B>>,
}

impl<S, B, P> ProductService<S, B, P>
where
    S: DocumentStore<Product>,
    B: DocumentReader<Brand>,
    P: EventPublisher<ProductChange>,
{
    /// Creates a new product service.
    ///
    /// `brands` is used to resolve brand names on create and update.
    pub fn new(store: S, brands: B, publisher: P) -> Self {
        Self {
            engine: MutationEngine::new(store, publisher, BrandReferences::new(brands)),
        }
    }

    /// Returns a reference to the underlying mutation engine.
    pub fn engine(&self) -> &MutationEngine<Product, S, P, BrandReferences<B>> {
        &self.engine
    }

    /// Creates a new unpublished product.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        request: CreateProduct,
    ) -> Result<(AggregateId, Version), DomainError> {
        self.engine.create(request).await
    }

    /// Updates the fields present in `request`.
    #[tracing::instrument(skip(self))]
    pub async fn update_one(
        &self,
        id: AggregateId,
        version: Version,
        request: UpdateProduct,
    ) -> Result<Version, DomainError> {
        self.engine.update_one(id, version, request).await
    }

    /// Publishes a product.
    ///
    /// Publishing an already published product fails with
    /// "Status already updated".
    #[tracing::instrument(skip(self))]
    pub async fn publish(&self, id: AggregateId, version: Version) -> Result<Version, DomainError> {
        self.engine
            .update_as(
                id,
                version,
                UpdateProduct::with_status(ProductStatus::Publish),
                "PublishProduct",
            )
            .await
    }

    /// Unpublishes a product.
    #[tracing::instrument(skip(self))]
    pub async fn unpublish(
        &self,
        id: AggregateId,
        version: Version,
    ) -> Result<Version, DomainError> {
        self.engine
            .update_as(
                id,
                version,
                UpdateProduct::with_status(ProductStatus::Unpublish),
                "UnpublishProduct",
            )
            .await
    }

    /// Deletes a product.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: AggregateId, version: Version) -> Result<(), DomainError> {
        self.engine.delete(id, version).await
    }
}
