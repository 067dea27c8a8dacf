//! Request extractors that reject with the catalog envelope.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use common::{AggregateId, Version};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body extractor.
///
/// Field validation happens in the domain layer; this only rejects bodies
/// that do not decode.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "rejected request body");
            ApiError::BadRequest("Provide valid Body".to_string())
        })?;
        Ok(Payload(data))
    }
}

/// The `{id}/{version}` pair addressing a mutation.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub id: AggregateId,
    pub version: Version,
}

impl<S> FromRequestParts<S> for Target
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((id, version)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let id = id
            .parse::<AggregateId>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid id: {id}")))?;
        let version = version
            .parse::<i64>()
            .ok()
            .filter(|v| *v > 0)
            .map(Version::new)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid version: {version}")))?;

        Ok(Target { id, version })
    }
}
