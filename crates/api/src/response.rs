//! Uniform JSON response envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::{AggregateId, Version};
use domain::FieldError;
use serde::Serialize;

/// Body shared by every catalog endpoint.
///
/// Empty parts are omitted, so a successful delete renders as
/// `{"message": "Deleted Successfully", "data": {}, "successful": true}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize = serde_json::Value> {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,

    pub successful: bool,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            errors: Vec::new(),
            successful: true,
        }
    }
}

impl Envelope {
    pub fn failure(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            data: None,
            errors,
            successful: false,
        }
    }
}

/// Identity and version of a mutated aggregate.
#[derive(Debug, Serialize)]
pub struct Mutated {
    pub id: AggregateId,
    pub version: Version,
}

/// A successful catalog response.
pub struct Reply<T: Serialize>(pub StatusCode, pub Envelope<T>);

impl Reply<Mutated> {
    /// 201 with the new aggregate's id and version.
    pub fn created(id: AggregateId, version: Version) -> Self {
        Self(
            StatusCode::CREATED,
            Envelope::success("Created Successfully", Mutated { id, version }),
        )
    }

    /// 202 with the aggregate's id and new version.
    pub fn updated(id: AggregateId, version: Version) -> Self {
        Self(
            StatusCode::ACCEPTED,
            Envelope::success("Updated Successfully", Mutated { id, version }),
        )
    }
}

impl Reply<serde_json::Value> {
    pub fn deleted() -> Self {
        Self(
            StatusCode::ACCEPTED,
            Envelope::success("Deleted Successfully", serde_json::json!({})),
        )
    }

    pub fn accepted(message: impl Into<String>) -> Self {
        Self(
            StatusCode::ACCEPTED,
            Envelope::success(message, serde_json::json!({})),
        )
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
