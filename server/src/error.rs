//! Request-level error type.
//!
//! Every failure a handler can hit ends up here and is rendered as an error
//! [`Envelope`] with a matching HTTP status. Internal details are logged and
//! replaced with a generic message before reaching the client.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::TokenError;
use crate::envelope::Envelope;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad credentials or a missing, invalid or expired token (401).
    #[error("{0}")]
    Auth(String),

    /// A required field is empty (422).
    #[error("{0}")]
    Validation(String),

    /// Unknown todo id (404).
    #[error("{0}")]
    NotFound(String),

    /// Request body is not the JSON we expect (400).
    #[error("{0}")]
    Decode(String),

    /// Server-side failure (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "an internal error occurred".to_string()
            }
            other => {
                tracing::debug!(error = %other, "request failed");
                other.to_string()
            }
        };

        (self.status(), Envelope::<()>::error(message)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyName => Self::Validation(err.to_string()),
            StoreError::NotFound(_) => Self::NotFound(err.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => Self::Internal(err.to_string()),
            other => Self::Auth(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Decode(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Decode(rejection.body_text())
    }
}
