//! Cross-aggregate validation.

use async_trait::async_trait;

use crate::aggregate::Aggregate;
use crate::error::{DomainError, FieldErrors};

/// Checks fields whose legality depends on other aggregates.
///
/// Negative lookups are pushed onto `errors` so they abort the mutation
/// together with any field-diff errors. Lookup failures are returned as
/// `Err` and abort immediately.
#[async_trait]
pub trait ReferenceValidator<A: Aggregate>: Send + Sync {
    /// Checks the seed fields of a creation request.
    async fn check_create(
        &self,
        _request: &A::Create,
        _errors: &mut FieldErrors,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    /// Checks the diffable fields of a creation or update request.
    async fn check_update(
        &self,
        _request: &A::Update,
        _errors: &mut FieldErrors,
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Validator for aggregates without cross-aggregate references.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

#[async_trait]
impl<A: Aggregate> ReferenceValidator<A> for NoReferences {}
