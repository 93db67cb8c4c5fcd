//! Uniform JSON error envelope for the API.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devprofile_lib::ProfileError;
use serde::Serialize;

/// Error response body: `{status:"error", message[, details]}`
#[derive(Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("Route not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Profile(ProfileError::BadRequest(message.into()))
    }

    fn parts(self) -> (StatusCode, String, Option<Vec<String>>) {
        match self {
            ApiError::RouteNotFound => {
                (StatusCode::NOT_FOUND, "Route not found".to_string(), None)
            }
            ApiError::Profile(err) => match err {
                ProfileError::Validation(details) => (
                    StatusCode::BAD_REQUEST,
                    "Validation error".to_string(),
                    Some(details),
                ),
                ProfileError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
                ProfileError::NotFound => {
                    (StatusCode::NOT_FOUND, "Profile not found".to_string(), None)
                }
                ProfileError::Conflict(message) => (StatusCode::CONFLICT, message, None),
                internal => {
                    // Log full error chain for debugging, return generic message to client
                    tracing::error!("Internal error: {:?}", internal);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                        None,
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = self.parts();
        (
            status,
            Json(ErrorBody {
                status: "error",
                message,
                details,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // well-formed JSON with the wrong shape is a schema violation
            JsonRejection::JsonDataError(err) => {
                ApiError::Profile(ProfileError::Validation(vec![err.body_text()]))
            }
            other => ApiError::bad_request(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Response for panics caught by `CatchPanicLayer`.
pub fn panic_response(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    ApiError::Profile(ProfileError::Internal(anyhow::anyhow!("handler panicked"))).into_response()
}
