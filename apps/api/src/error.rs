//! # API Error Type
//!
//! The single place where failures become HTTP status codes.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                                   Status   Body                 │
//! │  ───────────────────────────────────────  ───────  ─────────────────── │
//! │  malformed JSON body / query string       400      "bad request"        │
//! │  InvalidId, InvalidDate, InvalidPrice     400      "bad request"        │
//! │  SubscriptionNotFound, UserNotFound       400      "bad request"        │
//! │  NoUpdateParameters, Store(..)            500      "internal server     │
//! │                                                     error"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The body never carries the error kind. The full error text rides along in
//! a [`RequestError`] response extension so the request logger can record it.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use subscriptions_core::SubscriptionError;

use crate::routes::MessageBody;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A domain or store failure from the facade, or a failed boundary check.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// The request body or query string could not be decoded.
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::Subscription(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Subscription(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

/// Error text attached to a failed response for logging only.
#[derive(Debug, Clone)]
pub struct RequestError(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_client_error() {
            "bad request"
        } else {
            "internal server error"
        };

        let mut response = (status, Json(MessageBody { message })).into_response();
        response
            .extensions_mut()
            .insert(RequestError(self.to_string()));
        response
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
