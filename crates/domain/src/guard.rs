//! Optimistic concurrency check.

use common::{AggregateId, Version};

use crate::error::DomainError;

/// Lets a mutation proceed only if the caller's expected version equals the
/// stored one.
///
/// This is the read-time half of the check; the store's compare-and-swap on
/// `(id, expected)` is the write-time half.
pub fn check_version(
    aggregate_type: &'static str,
    aggregate_id: AggregateId,
    stored: Version,
    expected: Version,
) -> Result<(), DomainError> {
    if stored != expected {
        tracing::debug!(%aggregate_id, %stored, %expected, "version mismatch");
        return Err(DomainError::ConcurrentModification {
            aggregate_type,
            aggregate_id,
            expected,
        });
    }
    Ok(())
}
