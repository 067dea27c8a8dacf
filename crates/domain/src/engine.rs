//! The versioned aggregate mutation engine.

use std::marker::PhantomData;
use std::time::Instant;

use chrono::Utc;
use common::{AggregateId, Version};
use document_store::{Command, DocumentStore, Patch};
use serde_json::Map;
use validator::Validate;

use crate::aggregate::Aggregate;
use crate::diff::diff_fields;
use crate::error::{DomainError, FieldErrors};
use crate::event::DomainEvent;
use crate::guard::check_version;
use crate::publisher::EventPublisher;
use crate::references::ReferenceValidator;

/// Orchestrates create, update and delete for one aggregate type.
///
/// Each call runs validation, the version guard, cross-aggregate checks and
/// the field diff before touching storage. Only then does it write, in
/// order, the audit command, the aggregate (compare-and-swap on the caller's
/// expected version) and the event batch. The three writes are independent:
/// a failure after the aggregate write leaves it committed without events.
pub struct MutationEngine<A, S, P, R> {
    store: S,
    publisher: P,
    references: R,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A, S, P, R> MutationEngine<A, S, P, R>
where
    A: Aggregate,
    S: DocumentStore<A>,
    P: EventPublisher<A::Change>,
    R: ReferenceValidator<A>,
{
    pub fn new(store: S, publisher: P, references: R) -> Self {
        Self {
            store,
            publisher,
            references,
            _aggregate: PhantomData,
        }
    }

    /// Returns a reference to the underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the event publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Creates a new aggregate and returns its id and final version.
    ///
    /// The draft event takes version 1 and every present field one more.
    pub async fn create(&self, request: A::Create) -> Result<(AggregateId, Version), DomainError> {
        let started = Instant::now();
        let result = self.try_create(request).await;
        record::<A, _>("create", started, &result);
        result
    }

    /// Applies a partial update and returns the new version.
    pub async fn update_one(
        &self,
        id: AggregateId,
        expected: Version,
        request: A::Update,
    ) -> Result<Version, DomainError> {
        let command_type = format!("Update{}", A::aggregate_type());
        self.update_as(id, expected, request, &command_type).await
    }

    /// Applies a partial update audited under a custom command type.
    pub async fn update_as(
        &self,
        id: AggregateId,
        expected: Version,
        request: A::Update,
        command_type: &str,
    ) -> Result<Version, DomainError> {
        let started = Instant::now();
        let result = self.try_update(id, expected, request, command_type).await;
        record::<A, _>("update", started, &result);
        result
    }

    /// Deletes an aggregate and emits its deletion event.
    pub async fn delete(&self, id: AggregateId, expected: Version) -> Result<(), DomainError> {
        let started = Instant::now();
        let result = self.try_delete(id, expected).await;
        record::<A, _>("delete", started, &result);
        result
    }

    async fn try_create(&self, request: A::Create) -> Result<(AggregateId, Version), DomainError> {
        request.validate()?;

        let id = AggregateId::new();
        let now = Utc::now();
        let mut aggregate = A::draft(id, &request, now);
        let fields = A::creation_fields(&request);

        let mut errors = FieldErrors::new();
        self.references.check_create(&request, &mut errors).await?;
        self.references.check_update(&fields, &mut errors).await?;

        let diff = diff_fields::<A>(None, Version::first(), &fields);
        errors.extend(diff.errors);
        if !errors.is_empty() {
            return Err(DomainError::ValidationFailed(errors));
        }

        let command = Command::from_request(
            id,
            format!("Create{}", A::aggregate_type()),
            &request,
        )?;
        self.store.store_command(command).await?;

        let mut events = Vec::with_capacity(diff.changes.len() + 1);
        events.push(DomainEvent::new(
            id,
            A::aggregate_type(),
            Version::first(),
            aggregate.draft_change(),
            now,
        ));
        for (version, change) in diff.changes {
            aggregate.apply(&change);
            events.push(DomainEvent::new(id, A::aggregate_type(), version, change, now));
        }
        aggregate.set_version(diff.version);

        self.store.create(aggregate).await?;
        self.publisher.send_messages(events);

        tracing::info!(%id, version = %diff.version, "aggregate created");
        Ok((id, diff.version))
    }

    async fn try_update(
        &self,
        id: AggregateId,
        expected: Version,
        request: A::Update,
        command_type: &str,
    ) -> Result<Version, DomainError> {
        request.validate()?;

        let current = self.load(id).await?;
        check_version(A::aggregate_type(), id, current.version(), expected)?;

        let mut errors = FieldErrors::new();
        self.references.check_update(&request, &mut errors).await?;

        let diff = diff_fields::<A>(Some(&current), expected, &request);
        errors.extend(diff.errors.clone());
        if !errors.is_empty() {
            return Err(DomainError::ValidationFailed(errors));
        }
        if diff.is_unchanged(expected) {
            return Err(DomainError::NoUpdates);
        }

        let now = Utc::now();
        let mut patch = Patch::new(diff.version);
        let mut events = Vec::with_capacity(diff.changes.len());
        for (version, change) in diff.changes {
            patch.merge(serde_json::to_value(&change)?);
            events.push(DomainEvent::new(id, A::aggregate_type(), version, change, now));
        }

        let command = Command::from_request(id, command_type, &request)?;
        self.store.store_command(command).await?;

        let affected = self.store.update_one(id, patch, expected).await?;
        if affected == 0 {
            tracing::warn!(%id, %expected, "compare-and-swap update lost a race");
            return Err(self.conflict(id, expected));
        }

        self.publisher.send_messages(events);

        tracing::info!(%id, version = %diff.version, "aggregate updated");
        Ok(diff.version)
    }

    async fn try_delete(&self, id: AggregateId, expected: Version) -> Result<(), DomainError> {
        let current = self.load(id).await?;
        check_version(A::aggregate_type(), id, current.version(), expected)?;

        let command = Command::new(
            id,
            format!("Delete{}", A::aggregate_type()),
            Map::new(),
        );
        self.store.store_command(command).await?;

        let affected = self.store.delete_one(id, expected).await?;
        if affected == 0 {
            tracing::warn!(%id, %expected, "compare-and-swap delete lost a race");
            return Err(self.conflict(id, expected));
        }

        let version = expected.next();
        self.publisher.send_messages(vec![DomainEvent::new(
            id,
            A::aggregate_type(),
            version,
            A::deleted_change(),
            Utc::now(),
        )]);

        tracing::info!(%id, %version, "aggregate deleted");
        Ok(())
    }

    async fn load(&self, id: AggregateId) -> Result<A, DomainError> {
        self.store
            .find_one_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                aggregate_type: A::aggregate_type(),
                aggregate_id: id,
            })
    }

    fn conflict(&self, id: AggregateId, expected: Version) -> DomainError {
        DomainError::ConcurrentModification {
            aggregate_type: A::aggregate_type(),
            aggregate_id: id,
            expected,
        }
    }
}

fn record<A: Aggregate, T>(
    operation: &'static str,
    started: Instant,
    result: &Result<T, DomainError>,
) {
    let outcome = match result {
        Ok(_) => "success",
        Err(err) => err.kind().as_str(),
    };

    if let Err(err) = result {
        match err {
            DomainError::Store(_) | DomainError::Serialization(_) => {
                tracing::error!(aggregate = A::aggregate_type(), operation, error = %err, "mutation failed");
            }
            _ => {
                tracing::debug!(aggregate = A::aggregate_type(), operation, error = %err, "mutation rejected");
            }
        }
    }

    metrics::counter!(
        "catalog_mutations_total",
        "aggregate" => A::aggregate_type(),
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "catalog_mutation_duration_seconds",
        "aggregate" => A::aggregate_type(),
        "operation" => operation
    )
    .record(started.elapsed().as_secs_f64());
}
