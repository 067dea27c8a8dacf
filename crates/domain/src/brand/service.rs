//! Brand service providing a simplified API for brand operations.

use common::{AggregateId, Version};
use document_store::DocumentStore;

use crate::engine::MutationEngine;
use crate::error::DomainError;
use crate::publisher::EventPublisher;
use crate::references::NoReferences;

use super::{Brand, BrandChange, CreateBrand, UpdateBrand};

/// Service for managing brands.
pub struct BrandService<S, P> {
    engine: MutationEngine<Brand, S, P, NoReferences>,
}

impl<S, P> BrandService<S, P>
where
    S: DocumentStore<Brand>,
    P: EventPublisher<BrandChange>,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self {
            engine: MutationEngine::new(store, publisher, NoReferences),
        }
    }

    /// Returns a reference to the underlying mutation engine.
    pub fn engine(&self) -> &MutationEngine<Brand, S, P, NoReferences> {
        &self.engine
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, request: CreateBrand) -> Result<(AggregateId, Version), DomainError> {
        self.engine.create(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_one(
        &self,
        id: AggregateId,
        version: Version,
        request: UpdateBrand,
    ) -> Result<Version, DomainError> {
        self.engine.update_one(id, version, request).await
    }

    /// Deletes a brand.
    ///
    /// Products referencing the brand by name are left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: AggregateId, version: Version) -> Result<(), DomainError> {
        self.engine.delete(id, version).await
    }
}
