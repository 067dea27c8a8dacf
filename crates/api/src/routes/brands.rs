//! Brand mutation endpoints and the inbound message queue.

use std::sync::Arc;

use axum::extract::State;
use domain::{BrandMessage, CreateBrand, UpdateBrand};
use tokio::sync::mpsc::error::TrySendError;

use crate::error::ApiError;
use crate::extract::{Payload, Target};
use crate::response::{Mutated, Reply};
use crate::state::AppState;

#[tracing::instrument(skip(state, request))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<CreateBrand>,
) -> Result<Reply<Mutated>, ApiError> {
    let (id, version) = state.brands.create(request).await?;
    Ok(Reply::created(id, version))
}

#[tracing::instrument(skip(state, request))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    target: Target,
    Payload(request): Payload<UpdateBrand>,
) -> Result<Reply<Mutated>, ApiError> {
    let version = state
        .brands
        .update_one(target.id, target.version, request)
        .await?;
    Ok(Reply::updated(target.id, version))
}

#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    target: Target,
) -> Result<Reply<serde_json::Value>, ApiError> {
    state.brands.delete(target.id, target.version).await?;
    Ok(Reply::deleted())
}

/// POST /brands/messages
///
/// Hands the message to the brand worker; the outcome is only logged.
#[tracing::instrument(skip(state, message), fields(message_type = %message.message_type))]
pub async fn enqueue(
    State(state): State<Arc<AppState>>,
    Payload(message): Payload<BrandMessage>,
) -> Result<Reply<serde_json::Value>, ApiError> {
    state.brand_messages.try_send(message).map_err(|err| match err {
        TrySendError::Full(_) => ApiError::Unavailable("Brand queue is full".to_string()),
        TrySendError::Closed(_) => ApiError::Unavailable("Brand queue is closed".to_string()),
    })?;
    Ok(Reply::accepted("Accepted"))
}
