//! Variant mutation endpoints.

use std::sync::Arc;

use axum::extract::State;
use domain::{CreateVariant, UpdateVariant};

use crate::error::ApiError;
use crate::extract::{Payload, Target};
use crate::response::{Mutated, Reply};
use crate::state::AppState;

#[tracing::instrument(skip(state, request))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<CreateVariant>,
) -> Result<Reply<Mutated>, ApiError> {
    let (id, version) = state.variants.create(request).await?;
    Ok(Reply::created(id, version))
}

#[tracing::instrument(skip(state, request))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    target: Target,
    Payload(request): Payload<UpdateVariant>,
) -> Result<Reply<Mutated>, ApiError> {
    let version = state
        .variants
        .update_one(target.id, target.version, request)
        .await?;
    Ok(Reply::updated(target.id, version))
}

#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    target: Target,
) -> Result<Reply<serde_json::Value>, ApiError> {
    state.variants.delete(target.id, target.version).await?;
    Ok(Reply::deleted())
}
