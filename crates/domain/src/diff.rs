//! Field-diff event generation.

use common::Version;

use crate::aggregate::Aggregate;
use crate::error::{FieldErrors, field_label};

/// Outcome of diffing a request against an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff<C> {
    /// Changes in canonical field order, each with the version it produces.
    pub changes: Vec<(Version, C)>,

    /// "already updated" errors, one per unchanged field.
    pub errors: FieldErrors,

    /// Version after the last change; equals the base when nothing changed.
    pub version: Version,
}

impl<C> FieldDiff<C> {
    /// Returns true if no field changed.
    pub fn is_unchanged(&self, base: Version) -> bool {
        self.version == base
    }
}

/// Walks the aggregate's field table in order.
///
/// Every present field whose value differs from `current` bumps the running
/// version and yields one change. A present field equal to its current value
/// yields an error instead and leaves the version alone; errors never stop
/// the walk. With no `current` (creation) every present field is a change.
pub fn diff_fields<A: Aggregate>(
    current: Option<&A>,
    base: Version,
    request: &A::Update,
) -> FieldDiff<A::Change> {
    let mut changes = Vec::new();
    let mut errors = FieldErrors::new();
    let mut version = base;

    for rule in A::fields() {
        let Some(requested) = (rule.requested)(request) else {
            continue;
        };

        if let Some(aggregate) = current
            && (rule.current)(aggregate) == requested
        {
            errors.push(
                rule.field,
                format!("{} already updated", field_label(rule.field)),
            );
            continue;
        }

        version = version.next();
        changes.push((version, requested));
    }

    FieldDiff {
        changes,
        errors,
        version,
    }
}
