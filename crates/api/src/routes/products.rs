//! Product mutation endpoints.

use std::sync::Arc;

use axum::extract::State;
use domain::{CreateProduct, UpdateProduct};

use crate::error::ApiError;
use crate::extract::{Payload, Target};
use crate::response::{Mutated, Reply};
use crate::state::AppState;

/// POST /products
#[tracing::instrument(skip(state, request))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<CreateProduct>,
) -> Result<Reply<Mutated>, ApiError> {
    let (id, version) = state.products.create(request).await?;
    Ok(Reply::created(id, version))
}

/// PATCH /products/{id}/{version}
#[tracing::instrument(skip(state, request))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    target: Target,
    Payload(request): Payload<UpdateProduct>,
) -> Result<Reply<Mutated>, ApiError> {
    let version = state
        .products
        .update_one(target.id, target.version, request)
        .await?;
    Ok(Reply::updated(target.id, version))
}

/// POST /products/{id}/{version}/publish
#[tracing::instrument(skip(state))]
pub async fn publish(
    State(state): State<Arc<AppState>>,
    target: Target,
) -> Result<Reply<Mutated>, ApiError> {
    let version = state.products.publish(target.id, target.version).await?;
    Ok(Reply::updated(target.id, version))
}

/// POST /products/{id}/{version}/unpublish
#[tracing::instrument(skip(state))]
pub async fn unpublish(
    State(state): State<Arc<AppState>>,
    target: Target,
) -> Result<Reply<Mutated>, ApiError> {
    let version = state.products.unpublish(target.id, target.version).await?;
    Ok(Reply::updated(target.id, version))
}

/// DELETE /products/{id}/{version}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    target: Target,
) -> Result<Reply<serde_json::Value>, ApiError> {
    state.products.delete(target.id, target.version).await?;
    Ok(Reply::deleted())
}
