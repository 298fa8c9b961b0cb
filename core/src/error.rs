//! Error types for the todo API client.
//!
//! # Design
//! `Unauthorized` and `NotFound` get dedicated variants because callers
//! routinely branch on them (log in again, drop a stale id). Every other
//! error envelope lands in `Rejected` with the HTTP status and the server's
//! `error_message`.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: bad credentials, or a missing/invalid/expired bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 404: the todo does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other error envelope, or a non-envelope error body.
    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
